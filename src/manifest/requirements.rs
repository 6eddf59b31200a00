//! Requirement-list parsing (`requirements.txt` style)
//!
//! Captures an exact version only for `==` pins; other specifiers keep the
//! name alone. Option lines (`-r`, `-e`, `--index-url`) and URL/VCS
//! requirements are skipped.

use super::ManifestError;
use crate::record::PackageRef;
use std::fs;
use std::path::Path;

pub(crate) fn parse(path: &Path) -> Result<Vec<PackageRef>, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.lines().filter_map(parse_requirement).collect())
}

/// Parse a single requirement line into a package reference.
///
/// Handles formats like:
/// - requests==2.31.0
/// - requests>=2.31.0
/// - requests[security]==2.31.0
/// - requests==2.31.0; python_version >= "3.8"
/// - somepkg @ https://example.com/pkg.whl
pub fn parse_requirement(line: &str) -> Option<PackageRef> {
    // Remove inline comments
    let line = line.split('#').next()?.trim();

    // Skip blank lines and options like -r, -e, --extra-index-url
    if line.is_empty() || line.starts_with('-') {
        return None;
    }

    // Remove environment markers (e.g., ; python_version >= "3.8")
    let line = line.split(';').next()?.trim();
    if line.is_empty() {
        return None;
    }

    // URL and VCS requirements carry no registry name
    if line.starts_with("git+")
        || line.starts_with("http://")
        || line.starts_with("https://")
        || line.starts_with("ssh://")
    {
        return None;
    }

    // Direct references: name @ url
    if let Some((name, _)) = line.split_once(" @ ") {
        let name = strip_extras(name);
        let name = name.trim();
        return if name.is_empty() {
            None
        } else {
            Some(PackageRef::new(name))
        };
    }

    let line = strip_extras(line);

    let version_patterns = ["==", "~=", ">=", "<=", ">", "<", "!="];
    for pattern in version_patterns {
        if let Some(idx) = line.find(pattern) {
            let name = line[..idx].trim();
            if name.is_empty() {
                return None;
            }
            // Only == gives an exact version; stop at comma for multi-specifiers
            if pattern == "==" {
                let version = line[idx + pattern.len()..]
                    .split(',')
                    .next()
                    .unwrap_or("")
                    .trim();
                if !version.is_empty() {
                    return Some(PackageRef::with_version(name, version));
                }
            }
            return Some(PackageRef::new(name));
        }
    }

    let name = line.split_whitespace().next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(PackageRef::new(name))
    }
}

/// Strip extras from a dependency name (e.g., "pkg[extra]" -> "pkg")
fn strip_extras(name: &str) -> String {
    if let Some(bracket_idx) = name.find('[') {
        if let Some(close_idx) = name.find(']') {
            format!("{}{}", &name[..bracket_idx], &name[close_idx + 1..])
        } else {
            name.to_string()
        }
    } else {
        name.to_string()
    }
}
