use clap::Parser;
use std::path::Path;
use std::time::Duration;

use snakecite::cli::Cli;
use snakecite::config::Config;
use snakecite::github::GithubClient;
use snakecite::registry::RegistryEndpoints;
use snakecite::resolve::{CitePipeline, DIRECTORY_LOOKUP_DELAY};
use snakecite::{format, http, links, manifest};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    // Token precedence: CLI flag, then environment, then config file
    let token = cli
        .github_token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .or_else(|| config.github_token.clone());

    let agent = http::agent(Duration::from_secs(config.timeout_secs));
    let github = GithubClient::new(agent.clone(), token);
    let pipeline = CitePipeline::new(agent, RegistryEndpoints::default(), github, config);

    let target = Path::new(&cli.target);
    let records = if links::is_url(&cli.target) {
        match links::classify(&cli.target) {
            Some(link) => vec![pipeline.cite_link(&link)?],
            None => {
                log::warn!(
                    "Unable to cite {}: not a DOI or GitHub repository URL",
                    cli.target
                );
                Vec::new()
            }
        }
    } else if target.is_file() {
        let packages = manifest::parse_file(target)?;
        pipeline.cite_all(&packages, None)
    } else if target.is_dir() {
        let packages = manifest::collect_from_dir(target)?;
        pipeline.cite_all(&packages, Some(DIRECTORY_LOOKUP_DELAY))
    } else {
        return Err(format!(
            "{} is unreachable. Target may be a malformed URL, a file that does not exist, \
             or a directory that does not exist.",
            cli.target
        )
        .into());
    };

    let text = format::render(&records, cli.format);
    format::write_output(&text, cli.output.as_deref())?;

    Ok(())
}
