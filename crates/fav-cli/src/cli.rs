//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;
use is_terminal::IsTerminal;

use crate::output::OutputFormat;

/// Discover the favicons and touch icons a web page advertises.
///
/// Icons are collected from `<link>` declarations, the web-app manifest and
/// well-known paths such as `/favicon.ico`, then merged by URL.
#[derive(Parser, Clone, Debug)]
#[command(name = "fav")]
#[command(version)]
#[command(about = "fav - discover a site's favicons and touch icons", long_about = None)]
pub struct Cli {
    /// Page URL to fetch
    #[arg(
        value_name = "URL",
        required_unless_present = "file",
        conflicts_with = "file"
    )]
    pub url: Option<String>,

    /// Read HTML from a file instead of fetching a page (`-` for stdin)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Base URL for resolving links in `--file` input
    #[arg(long, value_name = "URL", requires = "file")]
    pub base_url: Option<String>,

    /// Only report ICO icons
    #[arg(long)]
    pub only_ico: bool,

    /// Only report PNG icons
    #[arg(long)]
    pub only_png: bool,

    /// Only report icons of this MIME type (repeatable)
    #[arg(long = "mime-type", value_name = "MIME")]
    pub mime_types: Vec<String>,

    /// Skip the web-app manifest
    #[arg(long)]
    pub no_manifest: bool,

    /// Skip probing well-known icon paths
    #[arg(long)]
    pub no_well_known: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// User-Agent header for outgoing requests
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Path to a configuration file
    #[arg(long, value_name = "FILE", env = "FAV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (defaults to text on a terminal, JSON when piped)
    #[arg(short = 'f', long, value_enum, env = "FAV_OUTPUT_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// Effective output format.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            if std::io::stdout().is_terminal() {
                OutputFormat::Text
            } else {
                OutputFormat::Json
            }
        })
    }
}
