//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;
use crate::output::OutputFormat;

/// Pick the log level for the given flags and output format.
///
/// JSON output drops to errors only so stderr stays quiet for scripts,
/// unless `--verbose` was passed explicitly.
pub fn log_level(cli: &Cli, format: OutputFormat) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || format == OutputFormat::Json {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Install the global tracing subscriber and apply color settings.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli, format: OutputFormat) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli, format))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || format == OutputFormat::Json {
        color_control::set_override(false);
    }
    Ok(())
}
