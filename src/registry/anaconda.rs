//! Anaconda registry integration
//!
//! Queries the conda-forge channel's package page and scans it for a DOI or
//! repository link.

use super::{RegistryError, fetch_page};
use crate::links::{self, CitableLink};

pub(crate) fn lookup(
    agent: &ureq::Agent,
    base: &str,
    package: &str,
) -> Result<Option<CitableLink>, RegistryError> {
    let url = format!("{}/conda-forge/{}", base, package);
    let body = fetch_page(agent, &url)?;
    Ok(links::find_citable_link(&body))
}
