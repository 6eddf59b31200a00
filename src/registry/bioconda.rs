//! Bioconda registry integration
//!
//! Bioconda recipe pages carry an "identifiers" section that usually lists
//! the package's DOI; the rendered README is fetched and scanned as text.

use super::{RegistryError, fetch_page};
use crate::links::{self, CitableLink};

pub(crate) fn lookup(
    agent: &ureq::Agent,
    base: &str,
    package: &str,
) -> Result<Option<CitableLink>, RegistryError> {
    let url = format!("{}/recipes/{}/README.html", base, package);
    let body = fetch_page(agent, &url)?;
    Ok(links::find_citable_link(&body))
}
