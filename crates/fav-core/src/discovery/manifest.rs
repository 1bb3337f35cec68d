//! Icon extraction from web-app manifests.
//!
//! A manifest is a JSON object whose `icons` array lists descriptors of the
//! shape `{ "src": ..., "type"?: ..., "sizes"?: ..., "purpose"?: ... }`.
//! Parsing is deliberately lenient: anything that does not look like a
//! usable descriptor is skipped, and a missing or broken manifest simply
//! yields no icons.
//!
//! A descriptor declaring several sizes (`"sizes": "48x48 96x96"`) produces
//! one [`Icon`] per size, all sharing the same URL and MIME type.
//!
//! ```rust
//! use fav_core::discovery::manifest::parse_manifest;
//! use url::Url;
//!
//! let json = r#"{
//!   "name": "Example",
//!   "icons": [
//!     { "src": "icons/192.png", "type": "image/png", "sizes": "192x192" },
//!     { "src": "icons/any.png", "sizes": "48x48 96x96" }
//!   ]
//! }"#;
//!
//! let manifest_url = Url::parse("https://example.com/static/manifest.json").unwrap();
//! let icons = parse_manifest(json, Some(&manifest_url));
//!
//! assert_eq!(icons.len(), 3);
//! assert_eq!(icons[0].url, "https://example.com/static/icons/192.png");
//! assert_eq!(icons[2].width, 96);
//! ```

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::url_resolver::resolve_reference;
use crate::{Fetcher, Icon, IconSize, IconSource};

/// Manifest location assumed when the page declares none.
pub const DEFAULT_MANIFEST_PATH: &str = "/manifest.json";

/// One `icons` entry. Only `src` must be a string; optional members of the
/// wrong JSON type are treated as absent.
#[derive(Debug, Deserialize)]
struct ManifestIcon {
    src: String,
    #[serde(default, rename = "type")]
    mime_type: Value,
    #[serde(default)]
    sizes: Value,
    #[serde(default)]
    purpose: Value,
}

/// Fetch a manifest and extract its icons.
///
/// Unreachable or malformed manifests are expected (many sites have none)
/// and produce an empty list rather than an error.
#[instrument(skip_all, fields(manifest = %manifest_url))]
pub async fn fetch_manifest(fetcher: &Fetcher, manifest_url: &Url) -> Vec<Icon> {
    match fetcher.fetch_text(manifest_url).await {
        Ok(fetched) => parse_manifest(&fetched.content, Some(&fetched.final_url)),
        Err(err) => {
            debug!(error = %err, "Manifest unavailable");
            Vec::new()
        },
    }
}

/// Parse manifest JSON and extract its icons.
///
/// `src` values resolve against `manifest_url`. Pass the page base URL when
/// the manifest content was obtained without a location of its own.
pub fn parse_manifest(content: &str, manifest_url: Option<&Url>) -> Vec<Icon> {
    let root: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "Manifest is not valid JSON");
            return Vec::new();
        },
    };

    let Some(entries) = root.get("icons").and_then(Value::as_array) else {
        debug!("Manifest has no icons array");
        return Vec::new();
    };

    let mut icons = Vec::new();
    for entry in entries {
        let descriptor = match ManifestIcon::deserialize(entry) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                debug!(error = %err, "Skipping malformed manifest icon");
                continue;
            },
        };
        icons.extend(icons_from_descriptor(&descriptor, manifest_url));
    }

    debug!(icons = icons.len(), "Parsed manifest");
    icons
}

fn icons_from_descriptor(descriptor: &ManifestIcon, manifest_url: Option<&Url>) -> Vec<Icon> {
    let Some(url) = resolve_reference(&descriptor.src, manifest_url) else {
        return Vec::new();
    };

    let mut template =
        Icon::new(&url, IconSource::Manifest).with_mime_type(descriptor.mime_type.as_str());
    template.purpose = descriptor
        .purpose
        .as_str()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string);

    let sizes = descriptor
        .sizes
        .as_str()
        .map(IconSize::parse_list)
        .unwrap_or_default();

    if sizes.is_empty() {
        return vec![template];
    }

    sizes
        .into_iter()
        .map(|size| template.clone().with_size(size))
        .collect()
}
