//! PyPI registry integration
//!
//! Fetches package metadata from the PyPI JSON API. Project URLs are checked
//! for an explicit DOI or source-repository link first; the raw document is
//! then scanned so DOIs mentioned in the long description are still found.

use super::{RegistryError, fetch_page};
use crate::links::{self, CitableLink};
use serde::Deserialize;
use std::collections::HashMap;

/// PyPI JSON API response structure
#[derive(Deserialize)]
struct PypiMetadata {
    info: PackageInfo,
}

#[derive(Deserialize)]
struct PackageInfo {
    project_urls: Option<HashMap<String, String>>,
    home_page: Option<String>,
}

pub(crate) fn lookup(
    agent: &ureq::Agent,
    base: &str,
    package: &str,
) -> Result<Option<CitableLink>, RegistryError> {
    let url = format!("{}/pypi/{}/json", base, package);
    let body = fetch_page(agent, &url)?;

    if let Ok(metadata) = serde_json::from_str::<PypiMetadata>(&body)
        && let Some(link) = extract_link(&metadata)
    {
        return Ok(Some(link));
    }

    Ok(links::find_citable_link(&body))
}

/// Extract a citable link from PyPI metadata.
///
/// DOI links anywhere in project_urls win; repository URLs are then checked
/// in a priority order of common key names, with home_page as a last resort.
fn extract_link(metadata: &PypiMetadata) -> Option<CitableLink> {
    let source_keys = [
        "Source",
        "source",
        "Repository",
        "repository",
        "Source Code",
        "source code",
        "Code",
        "code",
        "GitHub",
        "github",
        "Homepage",
        "homepage",
    ];

    if let Some(project_urls) = &metadata.info.project_urls {
        for url in project_urls.values() {
            if links::is_doi_url(url) {
                return Some(CitableLink::Doi(url.clone()));
            }
        }

        for key in source_keys {
            if let Some(url) = project_urls.get(key)
                && links::is_github_repo(url)
            {
                return Some(CitableLink::Repository(url.clone()));
            }
        }

        for url in project_urls.values() {
            if links::is_github_repo(url) {
                return Some(CitableLink::Repository(url.clone()));
            }
        }
    }

    if let Some(home_page) = &metadata.info.home_page
        && links::is_github_repo(home_page)
    {
        return Some(CitableLink::Repository(home_page.clone()));
    }

    None
}
