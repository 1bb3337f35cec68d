//! Rendering of discovered icons.
//!
//! Text output is one icon per line with aligned columns:
//!
//! ```text
//! https://example.com/favicon.ico        image/x-icon  -        markup
//! https://example.com/icons/192.png      image/png     192x192  manifest  maskable
//! ```
//!
//! JSON output is a pretty-printed array of icon objects.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use fav_core::{Icon, IconSource};

/// Output format options supported by the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable columns
    Text,
    /// Pretty-printed JSON array
    Json,
}

/// Write `icons` to `out` in the requested format.
pub fn render(icons: &[Icon], format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, icons)?;
            writeln!(out)?;
        },
        OutputFormat::Text => render_text(icons, out)?,
    }
    Ok(())
}

fn render_text(icons: &[Icon], out: &mut impl Write) -> Result<()> {
    if icons.is_empty() {
        writeln!(out, "{}", "No icons found".dimmed())?;
        return Ok(());
    }

    let rows: Vec<[String; 3]> = icons
        .iter()
        .map(|icon| {
            [
                icon.url.clone(),
                icon.effective_mime_type().unwrap_or_else(|| "-".to_string()),
                size_label(icon),
            ]
        })
        .collect();

    let widths = [0, 1, 2].map(|col| rows.iter().map(|r| r[col].len()).max().unwrap_or(0));

    for (icon, [url, mime, size]) in icons.iter().zip(&rows) {
        let mut line = format!(
            "{url:<w0$}  {mime:<w1$}  {size:<w2$}  {source}",
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            source = source_label(icon.source),
        );
        if let Some(purpose) = &icon.purpose {
            line.push_str("  ");
            line.push_str(purpose);
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn size_label(icon: &Icon) -> String {
    if icon.has_size() {
        format!("{}x{}", icon.width, icon.height)
    } else {
        "-".to_string()
    }
}

fn source_label(source: IconSource) -> colored::ColoredString {
    let label = source.to_string();
    match source {
        IconSource::Markup => label.green(),
        IconSource::Manifest => label.cyan(),
        IconSource::WellKnown => label.yellow(),
    }
}
