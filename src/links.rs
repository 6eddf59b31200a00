//! URL classification and page scanning for citable sources
//!
//! A citable link is either a DOI URL or a GitHub repository URL. The DOI
//! pattern is the one Crossref recommends for matching published DOIs.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static DOI_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://doi\.org/10\.\d{4,9}/[-._;()/:A-Za-z0-9]+").unwrap());

static GITHUB_REPO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://github\.com/[\w\-]+/[\w\-]+").unwrap());

static DOI_IN_PAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://)?(doi\.org/)?(10\.\d{4,9}/[-._;()/:A-Za-z0-9]+[0-9])").unwrap()
});

static GITHUB_IN_PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://github\.com/[\w\-]+/[\w\-]+").unwrap());

static REPO_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://github\.com/([\w\-]+)/([\w\-]+)").unwrap());

/// A URL that can be turned into a citation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitableLink {
    Doi(String),
    Repository(String),
}

impl CitableLink {
    pub fn url(&self) -> &str {
        match self {
            CitableLink::Doi(url) => url,
            CitableLink::Repository(url) => url,
        }
    }
}

/// Check whether a string is an absolute http(s) URL
pub fn is_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Check whether a URL is a DOI URL (`https://doi.org/10.xxxx/...`)
pub fn is_doi_url(s: &str) -> bool {
    DOI_URL_RE.is_match(s)
}

/// Check whether a URL points at a GitHub repository
pub fn is_github_repo(s: &str) -> bool {
    GITHUB_REPO_RE.is_match(s)
}

/// Classify a URL as a citable link, if it is one
pub fn classify(url: &str) -> Option<CitableLink> {
    if is_doi_url(url) {
        Some(CitableLink::Doi(url.to_string()))
    } else if is_github_repo(url) {
        Some(CitableLink::Repository(url.to_string()))
    } else {
        None
    }
}

/// Scan fetched page text for a citable link.
///
/// DOIs win over repository URLs; a bare `10.xxxx/...` DOI is normalized to
/// its `https://doi.org/` form.
pub fn find_citable_link(body: &str) -> Option<CitableLink> {
    if let Some(caps) = DOI_IN_PAGE_RE.captures(body) {
        let doi = caps.get(3).map(|m| m.as_str())?;
        return Some(CitableLink::Doi(format!("https://doi.org/{}", doi)));
    }
    GITHUB_IN_PAGE_RE
        .find(body)
        .map(|m| CitableLink::Repository(m.as_str().to_string()))
}

/// Split a GitHub repository URL into `(owner, repo)`
pub fn repo_slug(url: &str) -> Option<(String, String)> {
    let caps = REPO_SLUG_RE.captures(url)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
