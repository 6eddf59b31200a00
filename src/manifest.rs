//! Dependency manifest parsing
//!
//! Handles:
//! - requirement lists (`requirements.txt` style)
//! - conda environment YAML (`dependencies:` sequences with nested `pip:` lists)
//! - directories of workflow YAML, collected recursively
//!
//! Dispatch is by extension: `.yaml`/`.yml` files go through the environment
//! parser, anything else is treated as a requirement list.

mod environment;
mod requirements;

pub use environment::parse_conda_spec;
pub use requirements::parse_requirement;

use crate::record::PackageRef;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },
}

/// Extract package references from a single manifest file
pub fn parse_file(path: &Path) -> Result<Vec<PackageRef>, ManifestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let packages = match ext.as_str() {
        "yaml" | "yml" => environment::parse(path)?,
        _ => requirements::parse(path)?,
    };

    Ok(dedupe(packages))
}

/// Collect package references from every YAML file under a directory.
///
/// Files are visited in sorted order; a file that fails to parse is skipped
/// with a warning rather than aborting the run.
pub fn collect_from_dir(dir: &Path) -> Result<Vec<PackageRef>, ManifestError> {
    let mut yaml_files = Vec::new();
    collect_yaml_files(dir, &mut yaml_files)?;
    yaml_files.sort();

    let mut packages = Vec::new();
    for file in &yaml_files {
        match environment::parse(file) {
            Ok(parsed) => packages.extend(parsed),
            Err(e) => log::warn!("Skipping {}: {}", file.display(), e),
        }
    }

    Ok(dedupe(packages))
}

fn collect_yaml_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ManifestError> {
    let entries = fs::read_dir(dir).map_err(|source| ManifestError::ReadFile {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ManifestError::ReadFile {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_yaml_files(&path, out)?;
        } else {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            if ext == "yaml" || ext == "yml" {
                out.push(path);
            }
        }
    }

    Ok(())
}

/// Sort packages by name and drop duplicates, keeping the first version seen
fn dedupe(mut packages: Vec<PackageRef>) -> Vec<PackageRef> {
    packages.sort();
    packages.dedup_by(|a, b| a.name == b.name);
    packages
}
