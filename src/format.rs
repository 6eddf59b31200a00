//! Citation output formatting
//!
//! Renders resolved records as BibTeX entries or a pretty-printed JSON
//! array, to stdout or a file.

use crate::cli::OutputFormat;
use crate::record::CitationRecord;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

/// Render records in the requested format.
///
/// BibTeX output is empty when there are no records; JSON renders `[]`.
pub fn render(records: &[CitationRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Bibtex => render_bibtex(records),
        OutputFormat::Json => {
            // Records only hold plain data; serialization cannot fail
            serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

/// Write rendered output to a file, or stdout when no path is given
pub fn write_output(text: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text),
        None => {
            if !text.is_empty() {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
            }
            Ok(())
        }
    }
}

pub fn render_bibtex(records: &[CitationRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&render_entry(record));
        out.push('\n');
    }
    out
}

/// Render a single record as a BibTeX entry
pub fn render_entry(record: &CitationRecord) -> String {
    let mut entry = String::new();
    let _ = writeln!(entry, "@{}{{{},", record.entry_type, record.key);

    push_field(&mut entry, "title", &record.title);
    if !record.authors.is_empty() {
        push_field(&mut entry, "author", &record.authors.join(" and "));
    }
    if let Some(year) = record.year {
        push_field(&mut entry, "year", &year.to_string());
    }
    if let Some(journal) = &record.journal {
        push_field(&mut entry, "journal", journal);
    }
    if let Some(publisher) = &record.publisher {
        push_field(&mut entry, "publisher", publisher);
    }
    if let Some(doi) = &record.doi {
        push_field(&mut entry, "doi", doi);
    }
    if let Some(url) = &record.url {
        push_field(&mut entry, "url", url);
    }
    if let Some(note) = &record.note {
        push_field(&mut entry, "note", note);
    }
    if let Some(accessed) = record.accessed {
        push_field(&mut entry, "urldate", &accessed.format("%Y-%m-%d").to_string());
    }

    entry.push_str("}\n");
    entry
}

fn push_field(entry: &mut String, name: &str, value: &str) {
    let _ = writeln!(entry, "    {} = {{{}}},", name, escape_braces(value));
}

fn escape_braces(value: &str) -> String {
    value.replace('{', "\\{").replace('}', "\\}")
}
