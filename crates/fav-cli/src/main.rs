//! fav CLI - favicon and touch-icon discovery
//!
//! Thin wrapper over `fav_core`: parses flags, layers them over the
//! configuration file, runs one discovery pass and prints the result.

use std::fs::File;
use std::io::{self, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fav_core::{Finder, FinderConfig, Icon};
use tracing::debug;

mod cli;
mod logging;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output_format();

    logging::initialize_logging(&cli, format)?;

    let finder = build_finder(&cli)?;
    let icons = discover(&cli, &finder).await?;

    let mut stdout = io::stdout().lock();
    output::render(&icons, format, &mut stdout)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<FinderConfig> {
    match &cli.config {
        Some(path) => FinderConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => FinderConfig::load().context("loading default config"),
    }
}

fn build_finder(cli: &Cli) -> Result<Finder> {
    let config = load_config(cli)?;
    debug!(?config, "Resolved configuration");

    let mut builder = Finder::builder().config(&config);
    if cli.only_ico {
        builder = builder.only_ico();
    }
    if cli.only_png {
        builder = builder.only_png();
    }
    for mime in &cli.mime_types {
        builder = builder.only_mime_type(mime);
    }
    if cli.no_manifest {
        builder = builder.ignore_manifest();
    }
    if cli.no_well_known {
        builder = builder.ignore_well_known();
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(user_agent) = &cli.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }

    Ok(builder.build()?)
}

async fn discover(cli: &Cli, finder: &Finder) -> Result<Vec<Icon>> {
    let base_url = cli.base_url.as_deref();

    if let Some(path) = &cli.file {
        let reader: Box<dyn Read> = if path.as_os_str() == "-" {
            Box::new(io::stdin().lock())
        } else {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Box::new(file)
        };
        return finder
            .find_reader(reader, base_url)
            .await
            .with_context(|| format!("discovering icons in {}", path.display()));
    }

    // clap guarantees a URL when no file is given
    let url = cli.url.as_deref().unwrap_or_default();
    finder
        .find(url)
        .await
        .with_context(|| format!("discovering icons for {url}"))
}
