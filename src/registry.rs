//! Package registry resolution
//!
//! Queries PyPI, then Bioconda, then Anaconda, in fixed order, until one of
//! them yields a DOI or source-repository URL. A failure at one registry is
//! logged at debug level and the chain moves on; all misses resolve to
//! `None`.

mod anaconda;
mod bioconda;
mod pypi;

use crate::links::CitableLink;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Request to {url} failed: {details}")]
    Fetch { url: String, details: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response from {url}: {details}")]
    Read { url: String, details: String },
}

/// Base URLs for the registries in the resolution chain.
///
/// `Default` points at the public services; tests inject a mock server.
#[derive(Debug, Clone)]
pub struct RegistryEndpoints {
    pub pypi: String,
    pub bioconda: String,
    pub anaconda: String,
}

impl Default for RegistryEndpoints {
    fn default() -> Self {
        Self {
            pypi: "https://pypi.org".to_string(),
            bioconda: "https://bioconda.github.io".to_string(),
            anaconda: "https://anaconda.org".to_string(),
        }
    }
}

type LookupFn = fn(&ureq::Agent, &str, &str) -> Result<Option<CitableLink>, RegistryError>;

/// Search the registries for a citable link for a package
pub fn search(
    agent: &ureq::Agent,
    endpoints: &RegistryEndpoints,
    package: &str,
) -> Option<CitableLink> {
    let lookups: [(&str, LookupFn, &str); 3] = [
        ("pypi", pypi::lookup, endpoints.pypi.as_str()),
        ("bioconda", bioconda::lookup, endpoints.bioconda.as_str()),
        ("anaconda", anaconda::lookup, endpoints.anaconda.as_str()),
    ];

    for (registry, lookup, base) in lookups {
        match lookup(agent, base, package) {
            Ok(Some(link)) => {
                log::debug!("{}: found {:?} via {}", package, link, registry);
                return Some(link);
            }
            Ok(None) => log::debug!("{}: no citable link on {}", package, registry),
            Err(e) => log::debug!("{}: {} lookup failed: {}", package, registry, e),
        }
    }

    None
}

pub(crate) fn fetch_page(
    agent: &ureq::Agent,
    url: &str,
) -> Result<String, RegistryError> {
    let response = agent.get(url).call().map_err(|e| RegistryError::Fetch {
        url: url.to_string(),
        details: e.to_string(),
    })?;

    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(RegistryError::Status {
            url: url.to_string(),
            status,
        });
    }

    response
        .into_body()
        .read_to_string()
        .map_err(|e| RegistryError::Read {
            url: url.to_string(),
            details: e.to_string(),
        })
}
