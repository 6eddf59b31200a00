//! Conda environment YAML parsing
//!
//! Reads the `dependencies:` sequence of an environment file. Entries are
//! either conda match specs (`samtools=1.19=h50ea8bc_0`, `bioconda::bwa`) or
//! a nested mapping whose `pip:` list holds requirement lines.

use super::{ManifestError, requirements};
use crate::record::PackageRef;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct EnvironmentFile {
    #[serde(default)]
    dependencies: Vec<DependencyEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyEntry {
    Spec(String),
    Nested(HashMap<String, Vec<String>>),
}

pub(crate) fn parse(path: &Path) -> Result<Vec<PackageRef>, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let env: EnvironmentFile =
        serde_yml::from_str(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    let mut packages = Vec::new();
    for entry in &env.dependencies {
        match entry {
            DependencyEntry::Spec(spec) => {
                if let Some(pkg) = parse_conda_spec(spec) {
                    packages.push(pkg);
                }
            }
            DependencyEntry::Nested(map) => {
                for (section, lines) in map {
                    if section == "pip" {
                        packages.extend(lines.iter().filter_map(|l| {
                            requirements::parse_requirement(l)
                        }));
                    }
                }
            }
        }
    }

    Ok(packages)
}

/// Parse a conda match spec into a package reference.
///
/// Accepts `name`, `name=version`, `name=version=build`, `name==version`,
/// and channel-prefixed forms (`bioconda::name`). Comparison specs
/// (`name>=1.0`) keep the name alone.
pub fn parse_conda_spec(raw: &str) -> Option<PackageRef> {
    let spec = raw.split('#').next()?.trim();
    if spec.is_empty() {
        return None;
    }

    // Drop the channel prefix
    let spec = match spec.split_once("::") {
        Some((_, rest)) => rest.trim(),
        None => spec,
    };

    let Some(idx) = spec.find(|c: char| matches!(c, '=' | '<' | '>' | '!' | '~' | ' ')) else {
        return valid_name(spec).then(|| PackageRef::new(spec));
    };

    let (name, constraint) = spec.split_at(idx);
    let name = name.trim();
    if !valid_name(name) {
        return None;
    }

    // Only = pins carry a version; the build string after a second = is dropped
    if !constraint.starts_with('=') {
        return Some(PackageRef::new(name));
    }
    let version = constraint
        .trim_start_matches('=')
        .split(['=', ','])
        .next()
        .unwrap_or("")
        .trim();
    if version.is_empty()
        || version.contains(|c: char| matches!(c, '<' | '>' | '!' | '~' | '*'))
    {
        Some(PackageRef::new(name))
    } else {
        Some(PackageRef::with_version(name, version))
    }
}

fn valid_name(s: &str) -> bool {
    !s.is_empty()
        && s.starts_with(|c: char| c.is_ascii_alphanumeric())
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
