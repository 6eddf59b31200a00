//! DOI resolution via doi.org content negotiation
//!
//! Requests the CSL JSON rendering of a DOI and maps it into a
//! `CitationRecord`. CSL item types are translated to the closest BibTeX
//! entry type; anything unrecognized becomes `misc`.

use crate::record::{CitationRecord, CitationSource};
use serde::Deserialize;
use thiserror::Error;

const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";

#[derive(Error, Debug)]
pub enum DoiError {
    #[error("Request to {url} failed: {details}")]
    Fetch { url: String, details: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response from {url}: {details}")]
    Read { url: String, details: String },

    #[error("Failed to parse citation metadata from {url}: {details}")]
    Parse { url: String, details: String },
}

/// CSL JSON item, as served by doi.org
#[derive(Deserialize)]
struct CslItem {
    title: Option<String>,
    #[serde(default)]
    author: Vec<CslAuthor>,
    issued: Option<CslDate>,
    #[serde(rename = "container-title")]
    container_title: Option<String>,
    publisher: Option<String>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
}

#[derive(Deserialize)]
struct CslAuthor {
    family: Option<String>,
    given: Option<String>,
    literal: Option<String>,
}

#[derive(Deserialize)]
struct CslDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<i32>>,
}

/// Fetch citation metadata for a DOI URL
pub fn fetch_citation(agent: &ureq::Agent, doi_url: &str) -> Result<CitationRecord, DoiError> {
    let response = agent
        .get(doi_url)
        .header("Accept", CSL_JSON)
        .call()
        .map_err(|e| DoiError::Fetch {
            url: doi_url.to_string(),
            details: e.to_string(),
        })?;

    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(DoiError::Status {
            url: doi_url.to_string(),
            status,
        });
    }

    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| DoiError::Read {
            url: doi_url.to_string(),
            details: e.to_string(),
        })?;

    let item: CslItem = serde_json::from_str(&body).map_err(|e| DoiError::Parse {
        url: doi_url.to_string(),
        details: e.to_string(),
    })?;

    Ok(record_from_csl(&item, doi_url))
}

fn record_from_csl(item: &CslItem, doi_url: &str) -> CitationRecord {
    let entry_type = entry_type(item.item_type.as_deref());
    let authors: Vec<String> = item.author.iter().filter_map(author_name).collect();
    let year = item
        .issued
        .as_ref()
        .and_then(|d| d.date_parts.first())
        .and_then(|parts| parts.first())
        .copied();
    let title = item.title.as_deref().unwrap_or("").to_string();
    let key = citation_key(&authors, year, item.doi.as_deref(), doi_url);

    let mut record = CitationRecord::new(CitationSource::Doi, &key, entry_type, &title)
        .with_authors(authors)
        .with_url(item.url.as_deref().unwrap_or(doi_url));

    if let Some(year) = year {
        record = record.with_year(year);
    }
    if let Some(journal) = item.container_title.as_deref().filter(|s| !s.is_empty()) {
        record = record.with_journal(journal);
    }
    if let Some(publisher) = item.publisher.as_deref().filter(|s| !s.is_empty()) {
        record = record.with_publisher(publisher);
    }
    if let Some(doi) = &item.doi {
        record = record.with_doi(doi);
    } else if let Some(doi) = doi_url.split("doi.org/").nth(1) {
        record = record.with_doi(doi);
    }

    record
}

/// Map a CSL item type to the closest BibTeX entry type
fn entry_type(csl_type: Option<&str>) -> &'static str {
    match csl_type {
        Some("article-journal") | Some("article") => "article",
        Some("paper-conference") => "inproceedings",
        Some("chapter") => "incollection",
        Some("book") | Some("monograph") => "book",
        Some("thesis") => "phdthesis",
        Some("report") => "techreport",
        _ => "misc",
    }
}

fn author_name(author: &CslAuthor) -> Option<String> {
    if let Some(literal) = &author.literal {
        return Some(literal.clone());
    }
    match (&author.given, &author.family) {
        (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
        (None, Some(family)) => Some(family.clone()),
        (Some(given), None) => Some(given.clone()),
        (None, None) => None,
    }
}

/// Derive a BibTeX key: first author's family name plus year, with the DOI
/// suffix as a fallback
fn citation_key(
    authors: &[String],
    year: Option<i32>,
    doi: Option<&str>,
    doi_url: &str,
) -> String {
    if let Some(first) = authors.first() {
        let surname: String = first
            .split_whitespace()
            .last()
            .unwrap_or(first)
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if !surname.is_empty() {
            return match year {
                Some(year) => format!("{}{}", surname, year),
                None => surname,
            };
        }
    }

    let suffix = doi
        .map(str::to_string)
        .or_else(|| doi_url.split("doi.org/").nth(1).map(str::to_string))
        .unwrap_or_else(|| doi_url.to_string());
    suffix
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
