//! Per-package citation orchestration
//!
//! Ties the pieces together: config overrides short-circuit the registry
//! chain, DOI links resolve through doi.org, repository links fall back to
//! the GitHub API. Failures for individual packages are logged and skipped.

use crate::config::Config;
use crate::doi::{self, DoiError};
use crate::github::{GithubClient, GithubError};
use crate::links::CitableLink;
use crate::record::{CitationRecord, PackageRef};
use crate::registry::{self, RegistryEndpoints};
use std::time::Duration;
use thiserror::Error;

/// Pause between lookups when citing a whole directory of workflow YAML,
/// to stay polite to the registries
pub const DIRECTORY_LOOKUP_DELAY: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum CiteError {
    #[error("No citable source found for {package}")]
    NoSource { package: String },

    #[error(transparent)]
    Doi(#[from] DoiError),

    #[error(transparent)]
    Github(#[from] GithubError),
}

pub struct CitePipeline {
    agent: ureq::Agent,
    endpoints: RegistryEndpoints,
    github: GithubClient,
    config: Config,
}

impl CitePipeline {
    pub fn new(
        agent: ureq::Agent,
        endpoints: RegistryEndpoints,
        github: GithubClient,
        config: Config,
    ) -> Self {
        Self {
            agent,
            endpoints,
            github,
            config,
        }
    }

    /// Resolve a citable link into a citation record
    pub fn cite_link(&self, link: &CitableLink) -> Result<CitationRecord, CiteError> {
        match link {
            CitableLink::Doi(url) => Ok(doi::fetch_citation(&self.agent, url)?),
            CitableLink::Repository(url) => Ok(self.github.cite_repository(url)?),
        }
    }

    /// Resolve one package into a citation record
    pub fn cite_package(&self, package: &PackageRef) -> Result<CitationRecord, CiteError> {
        let link = self.link_for(package).ok_or_else(|| CiteError::NoSource {
            package: package.name.clone(),
        })?;
        Ok(self.cite_link(&link)?.with_package(&package.name))
    }

    /// Cite packages sequentially. A package that cannot be resolved is
    /// skipped with a warning; the run continues.
    pub fn cite_all(&self, packages: &[PackageRef], delay: Option<Duration>) -> Vec<CitationRecord> {
        let mut records = Vec::new();
        for (i, package) in packages.iter().enumerate() {
            if i > 0 && let Some(delay) = delay {
                std::thread::sleep(delay);
            }
            match self.cite_package(package) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("No citation for {}: {}", package, e),
            }
        }
        records
    }

    fn link_for(&self, package: &PackageRef) -> Option<CitableLink> {
        if let Some(override_cfg) = self.config.package_override(&package.name) {
            if let Some(doi) = &override_cfg.doi {
                return Some(CitableLink::Doi(doi.clone()));
            }
            if let Some(repo) = &override_cfg.repo {
                return Some(CitableLink::Repository(repo.clone()));
            }
        }

        registry::search(&self.agent, &self.endpoints, &package.name)
    }
}
