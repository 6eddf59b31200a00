use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Generate citations for software listed as workflow dependencies
#[derive(Parser, Debug)]
#[command(name = "snakecite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// DOI URL, GitHub repository URL, manifest file, or directory of workflow YAML
    pub target: String,

    /// GitHub API token, raises the rate limit for repository lookups
    #[arg(short = 'g', long)]
    pub github_token: Option<String>,

    /// Output format for citations
    #[arg(short, long, default_value = "bibtex")]
    pub format: OutputFormat,

    /// Write citations to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Supported citation output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Bibtex,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Bibtex => write!(f, "bibtex"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bibtex" | "bib" => Ok(OutputFormat::Bibtex),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format '{}'. Supported: bibtex, json", s)),
        }
    }
}
