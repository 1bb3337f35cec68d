//! # fav-core
//!
//! Favicon and touch-icon discovery for web pages.
//!
//! Given a page URL, or HTML already in hand, this crate collects every icon
//! the site advertises and reports each one with its absolute URL, MIME type,
//! dimensions and provenance. Evidence comes from three places:
//!
//! - **Markup**: `<link rel="icon">`, `apple-touch-icon` and friends
//! - **Manifest**: the `icons` array of the web-app manifest
//! - **Well-known paths**: `/favicon.ico` and the apple touch-icon paths
//!
//! Candidates are merged by URL in that precedence order and then narrowed by
//! any configured filters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fav_core::{Finder, Result};
//!
//! # async fn run() -> Result<()> {
//! let finder = Finder::builder().only_png().build()?;
//! let icons = finder.find("https://github.com/").await?;
//!
//! for icon in &icons {
//!     println!("{} ({}, {}x{})", icon.url, icon.source, icon.width, icon.height);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Only the primary input can fail a run. A missing manifest or an
//! unreachable well-known path reduces the result instead:
//!
//! ```rust,no_run
//! use fav_core::{Error, Finder};
//!
//! # async fn run() -> fav_core::Result<()> {
//! match Finder::new()?.find("https://example.com/").await {
//!     Ok(icons) => println!("{} icons", icons.len()),
//!     Err(Error::InvalidUrl(msg)) => eprintln!("Bad URL: {msg}"),
//!     Err(e) if e.is_recoverable() => eprintln!("Try again later: {e}"),
//!     Err(e) => eprintln!("Failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

/// File-based discovery settings
pub mod config;
/// Markup, manifest and well-known discovery stages
pub mod discovery;
/// Error types and result aliases
pub mod error;
/// HTTP fetching and probing
pub mod fetcher;
/// Discovery orchestration
pub mod finder;
/// Core data types
pub mod types;
/// Reference resolution against a base URL
pub mod url_resolver;

// Re-export commonly used types
pub use config::FinderConfig;
pub use discovery::IconFilter;
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use finder::{Finder, FinderBuilder};
pub use types::*;
