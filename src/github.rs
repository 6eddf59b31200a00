//! GitHub repository fallback
//!
//! When no DOI is found for a package, the GitHub REST API supplies enough
//! metadata (contributors, license, last-update year) to synthesize a `@misc`
//! citation. Requests follow GitHub's documented rate-limit handling: 403/429
//! responses are retried after the period the response headers ask for, with
//! the wait capped at 60 seconds and at most 3 attempts per request.

use crate::links;
use crate::record::{CitationRecord, CitationSource};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

const GITHUB_API: &str = "https://api.github.com";
const MAX_RETRIES: usize = 3;
const MAX_WAIT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("Not a GitHub repository URL: {url}")]
    InvalidRepoUrl { url: String },

    #[error("Request to {url} failed: {details}")]
    Fetch { url: String, details: String },

    #[error("Failed to read response from {url}: {details}")]
    Read { url: String, details: String },

    #[error("Failed to parse response from {url}: {details}")]
    Parse { url: String, details: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Rate limit wait for {url} exceeds the 60s cap")]
    RateLimited { url: String },

    #[error("Unable to retrieve {url} after {MAX_RETRIES} attempts")]
    RetriesExhausted { url: String },
}

/// Minimal GitHub REST API client over the shared blocking agent
pub struct GithubClient {
    agent: ureq::Agent,
    api_base: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct RepoInfo {
    name: String,
    html_url: String,
    updated_at: String,
    license: Option<LicenseInfo>,
}

#[derive(Deserialize)]
struct LicenseInfo {
    spdx_id: Option<String>,
}

#[derive(Deserialize)]
struct Contributor {
    login: String,
    url: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Deserialize)]
struct UserProfile {
    login: String,
    name: Option<String>,
}

impl GithubClient {
    pub fn new(agent: ureq::Agent, token: Option<String>) -> Self {
        Self::with_api_base(agent, GITHUB_API, token)
    }

    /// Point the client at a different API host. Tests use a mock server.
    pub fn with_api_base(agent: ureq::Agent, api_base: &str, token: Option<String>) -> Self {
        Self {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Synthesize a `@misc` citation for a repository URL
    pub fn cite_repository(&self, repo_url: &str) -> Result<CitationRecord, GithubError> {
        let (owner, repo) = links::repo_slug(repo_url).ok_or_else(|| GithubError::InvalidRepoUrl {
            url: repo_url.to_string(),
        })?;

        let info: RepoInfo = self.get_json(&format!("{}/repos/{}/{}", self.api_base, owner, repo))?;
        let authors = self.repo_authors(&owner, &repo)?;

        let key = citation_key(&info.name);
        let mut record = CitationRecord::new(CitationSource::Repository, &key, "misc", &info.name)
            .with_authors(authors)
            .with_url(&info.html_url)
            .with_accessed(chrono::Local::now().date_naive());

        if let Some(year) = update_year(&info.updated_at) {
            record = record.with_year(year);
        }
        if let Some(license) = info.license.as_ref().and_then(license_note) {
            record = record.with_note(&license);
        }

        Ok(record)
    }

    /// Resolve the display names of a repository's contributors.
    ///
    /// Bot accounts are dropped; a contributor whose profile has no display
    /// name, or whose profile cannot be fetched, keeps the login.
    pub fn repo_authors(&self, owner: &str, repo: &str) -> Result<Vec<String>, GithubError> {
        let url = format!("{}/repos/{}/{}/contributors", self.api_base, owner, repo);
        let contributors: Vec<Contributor> = self.get_json(&url)?;

        let mut authors = Vec::new();
        for contributor in contributors {
            if is_bot(&contributor.login, &contributor.kind) {
                continue;
            }
            match self.get_json::<UserProfile>(&contributor.url) {
                Ok(profile) => authors.push(display_name(profile)),
                Err(e) => {
                    log::debug!("profile lookup for {} failed: {}", contributor.login, e);
                    authors.push(contributor.login);
                }
            }
        }

        Ok(authors)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        let body = self.get(url)?;
        serde_json::from_str(&body).map_err(|e| GithubError::Parse {
            url: url.to_string(),
            details: e.to_string(),
        })
    }

    fn get(&self, url: &str) -> Result<String, GithubError> {
        for attempt in 0..MAX_RETRIES {
            let mut request = self
                .agent
                .get(url)
                .header("Accept", "application/vnd.github+json");
            if let Some(token) = &self.token {
                let value = format!("token {}", token);
                request = request.header("Authorization", value.as_str());
            }

            let response = request.call().map_err(|e| GithubError::Fetch {
                url: url.to_string(),
                details: e.to_string(),
            })?;

            let status = response.status().as_u16();
            match status {
                200..=299 => {
                    return response
                        .into_body()
                        .read_to_string()
                        .map_err(|e| GithubError::Read {
                            url: url.to_string(),
                            details: e.to_string(),
                        });
                }
                403 | 429 => {
                    let headers = response.headers();
                    let retry_after = header_value(headers, "retry-after");
                    let remaining = header_value(headers, "x-ratelimit-remaining");
                    let reset = header_value(headers, "x-ratelimit-reset");
                    let now = SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .unwrap_or(Duration::ZERO)
                        .as_secs();

                    match retry_wait(
                        retry_after.as_deref(),
                        remaining.as_deref(),
                        reset.as_deref(),
                        now,
                        attempt,
                    ) {
                        Some(wait) => {
                            log::debug!(
                                "rate limited by {}, retrying in {}s",
                                url,
                                wait.as_secs()
                            );
                            thread::sleep(wait);
                        }
                        None => {
                            return Err(GithubError::RateLimited {
                                url: url.to_string(),
                            });
                        }
                    }
                }
                status => {
                    return Err(GithubError::Status {
                        url: url.to_string(),
                        status,
                    });
                }
            }
        }

        Err(GithubError::RetriesExhausted {
            url: url.to_string(),
        })
    }
}

fn header_value(headers: &ureq::http::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// How long to wait before retrying a rate-limited request.
///
/// Preference order: `retry-after` seconds, then the `x-ratelimit-reset`
/// timestamp when the quota is exhausted, then a fixed backoff. Returns None
/// when the wait would exceed the cap.
fn retry_wait(
    retry_after: Option<&str>,
    remaining: Option<&str>,
    reset: Option<&str>,
    now_epoch: u64,
    attempt: usize,
) -> Option<Duration> {
    if let Some(secs) = retry_after.and_then(|v| v.trim().parse::<u64>().ok()) {
        let wait = secs + 1;
        return (wait <= MAX_WAIT_SECS).then(|| Duration::from_secs(wait));
    }

    if remaining.map(|v| v.trim() == "0").unwrap_or(false) {
        let reset_epoch = reset.and_then(|v| v.trim().parse::<u64>().ok())?;
        let wait = reset_epoch.saturating_sub(now_epoch) + 1;
        return (wait <= MAX_WAIT_SECS).then(|| Duration::from_secs(wait));
    }

    let wait = MAX_WAIT_SECS * (attempt as u64 + 1);
    (wait <= MAX_WAIT_SECS).then(|| Duration::from_secs(wait))
}

fn is_bot(login: &str, kind: &str) -> bool {
    login.ends_with("[bot]") || kind == "Bot"
}

fn display_name(profile: UserProfile) -> String {
    match profile.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => profile.login,
    }
}

fn update_year(updated_at: &str) -> Option<i32> {
    updated_at.get(..4)?.parse().ok()
}

fn citation_key(repo_name: &str) -> String {
    repo_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn license_note(license: &LicenseInfo) -> Option<String> {
    let spdx = license.spdx_id.as_deref()?;
    if spdx.is_empty() || spdx == "NOASSERTION" {
        return None;
    }
    Some(format!("License: {}", spdx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_wait_honors_retry_after() {
        assert_eq!(
            retry_wait(Some("10"), None, None, 1000, 0),
            Some(Duration::from_secs(11))
        );
        // Waits above the cap abort
        assert_eq!(retry_wait(Some("120"), None, None, 1000, 0), None);
    }

    #[test]
    fn test_retry_wait_uses_ratelimit_reset() {
        assert_eq!(
            retry_wait(None, Some("0"), Some("1030"), 1000, 0),
            Some(Duration::from_secs(31))
        );
        assert_eq!(retry_wait(None, Some("0"), Some("2000"), 1000, 0), None);
        // Reset in the past still waits the minimum second
        assert_eq!(
            retry_wait(None, Some("0"), Some("900"), 1000, 0),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_retry_wait_fallback_backoff() {
        assert_eq!(
            retry_wait(None, None, None, 1000, 0),
            Some(Duration::from_secs(60))
        );
        assert_eq!(retry_wait(None, None, None, 1000, 1), None);
    }

    #[test]
    fn test_is_bot() {
        assert!(is_bot("dependabot[bot]", "Bot"));
        assert!(is_bot("renovate[bot]", "User"));
        assert!(is_bot("actions-user", "Bot"));
        assert!(!is_bot("lh3", "User"));
    }

    #[test]
    fn test_display_name_falls_back_to_login() {
        let named = UserProfile {
            login: "lh3".to_string(),
            name: Some("Heng Li".to_string()),
        };
        assert_eq!(display_name(named), "Heng Li");

        let unnamed = UserProfile {
            login: "lh3".to_string(),
            name: None,
        };
        assert_eq!(display_name(unnamed), "lh3");

        let blank = UserProfile {
            login: "lh3".to_string(),
            name: Some("  ".to_string()),
        };
        assert_eq!(display_name(blank), "lh3");
    }

    #[test]
    fn test_update_year() {
        assert_eq!(update_year("2023-11-02T10:44:54Z"), Some(2023));
        assert_eq!(update_year("bad"), None);
    }

    #[test]
    fn test_citation_key() {
        assert_eq!(citation_key("SAMtools"), "samtools");
        assert_eq!(citation_key("scikit-learn"), "scikitlearn");
    }

    #[test]
    fn test_license_note() {
        let mit = LicenseInfo {
            spdx_id: Some("MIT".to_string()),
        };
        assert_eq!(license_note(&mit), Some("License: MIT".to_string()));

        let none = LicenseInfo {
            spdx_id: Some("NOASSERTION".to_string()),
        };
        assert_eq!(license_note(&none), None);
    }
}
