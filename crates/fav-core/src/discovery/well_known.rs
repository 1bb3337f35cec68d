//! Probing of conventional icon locations.
//!
//! Browsers and platforms look for a handful of icons at fixed paths even
//! when a page declares nothing. Each path in [`WELL_KNOWN_PATHS`] is
//! resolved against the site root and checked independently; a path that
//! does not answer with a success status is silently left out.
//!
//! Probes run concurrently, bounded by a semaphore so a single run never
//! opens more than `max_concurrent` connections to the host. Results are
//! reported in table order regardless of completion order.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};
use url::Url;

use crate::url_resolver::resolve_reference;
use crate::{Fetcher, Icon, IconSource};

/// Conventional icon paths, probed in this order.
pub const WELL_KNOWN_PATHS: &[&str] = &[
    "/favicon.ico",
    "/apple-touch-icon.png",
    "/apple-touch-icon-precomposed.png",
];

/// Default cap on concurrent probes per discovery run.
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 4;

/// Resolve every well-known path against `base`.
///
/// Returns an empty list for bases that have no host (e.g. `data:` URLs).
pub fn well_known_urls(base: &Url) -> Vec<Url> {
    if !matches!(base.scheme(), "http" | "https") {
        return Vec::new();
    }
    WELL_KNOWN_PATHS
        .iter()
        .filter_map(|path| resolve_reference(path, Some(base)))
        .collect()
}

/// Probe every well-known path under `base` and return the ones that exist.
///
/// `max_concurrent` is clamped to at least one.
#[instrument(skip_all, fields(base = %base))]
pub async fn probe_well_known(fetcher: &Fetcher, base: &Url, max_concurrent: usize) -> Vec<Icon> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let probes = well_known_urls(base).into_iter().map(|url| {
        let semaphore = Arc::clone(&semaphore);
        async move {
            // acquire fails only on a closed semaphore; count it as unreachable
            let _permit = semaphore.acquire().await.ok()?;
            let hit = fetcher.probe(&url).await?;
            let mime_type = hit
                .content_type
                .as_deref()
                .filter(|ct| ct.trim_start().to_ascii_lowercase().starts_with("image/"));
            Some(Icon::new(&url, IconSource::WellKnown).with_mime_type(mime_type))
        }
    });

    let icons: Vec<Icon> = join_all(probes).await.into_iter().flatten().collect();
    debug!(found = icons.len(), "Probed well-known paths");
    icons
}
