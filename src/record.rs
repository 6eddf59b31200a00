//! Core data types: package references and citation records
//!
//! `PackageRef` is produced by the manifest parser and consumed once by the
//! resolver. `CitationRecord` is produced by the DOI or repository lookup and
//! consumed by the formatter. Records serialize to JSON and parse back into
//! equivalent values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A package extracted from a dependency manifest
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PackageRef {
    pub name: String,
    pub version: Option<String>,
}

impl PackageRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            version: None,
        }
    }

    pub fn with_version(name: &str, version: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            version: Some(version.to_string()),
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}=={}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Where the citation metadata came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationSource {
    Doi,
    Repository,
}

impl fmt::Display for CitationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationSource::Doi => write!(f, "doi"),
            CitationSource::Repository => write!(f, "repository"),
        }
    }
}

/// A resolved bibliography entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    /// Package the record was resolved for, if it came from a manifest
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub package: Option<String>,
    pub source: CitationSource,
    /// BibTeX citation key
    pub key: String,
    /// BibTeX entry type: article, book, inproceedings, misc, ...
    pub entry_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
    /// Retrieval date, rendered as `urldate` for repository citations
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub accessed: Option<NaiveDate>,
}

impl CitationRecord {
    pub fn new(source: CitationSource, key: &str, entry_type: &str, title: &str) -> Self {
        Self {
            package: None,
            source,
            key: key.to_string(),
            entry_type: entry_type.to_string(),
            title: title.to_string(),
            authors: Vec::new(),
            year: None,
            journal: None,
            publisher: None,
            doi: None,
            url: None,
            note: None,
            accessed: None,
        }
    }

    pub fn with_package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_journal(mut self, journal: &str) -> Self {
        self.journal = Some(journal.to_string());
        self
    }

    pub fn with_publisher(mut self, publisher: &str) -> Self {
        self.publisher = Some(publisher.to_string());
        self
    }

    pub fn with_doi(mut self, doi: &str) -> Self {
        self.doi = Some(doi.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn with_accessed(mut self, date: NaiveDate) -> Self {
        self.accessed = Some(date);
        self
    }
}
