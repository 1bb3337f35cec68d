//! Icon extraction from HTML `<link>` declarations.
//!
//! ## Quick Start
//!
//! ```rust
//! use fav_core::discovery::markup::parse_markup;
//! use url::Url;
//!
//! let html = r#"
//! <html><head>
//!   <link rel="icon" type="image/png" href="/favicon-32.png" sizes="32x32">
//!   <link rel="apple-touch-icon" href="touch.png">
//!   <link rel="manifest" href="/site.webmanifest">
//! </head></html>
//! "#;
//!
//! let base = Url::parse("https://example.com/app/").unwrap();
//! let scan = parse_markup(html, Some(&base));
//!
//! assert_eq!(scan.icons.len(), 2);
//! assert_eq!(scan.icons[0].width, 32);
//! assert_eq!(scan.icons[1].url, "https://example.com/app/touch.png");
//! assert_eq!(
//!     scan.manifest_url.unwrap().as_str(),
//!     "https://example.com/site.webmanifest"
//! );
//! ```

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::url_resolver::resolve_reference;
use crate::{Icon, IconSize, IconSource};

/// Normalized `rel` values that declare an icon.
pub const ICON_RELATIONS: &[&str] = &[
    "icon",
    "alternate icon",
    "shortcut icon",
    "apple-touch-icon",
    "apple-touch-icon-precomposed",
    // site-specific browser apps (https://fluidapp.com/)
    "fluid-icon",
];

/// Normalized `rel` value that declares a web-app manifest.
pub const MANIFEST_RELATION: &str = "manifest";

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel]").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static BASE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("base[href]").unwrap());

/// Everything the markup pass learned about a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupScan {
    /// Icons declared by `<link>` elements, in document order.
    pub icons: Vec<Icon>,
    /// Manifest declared by `<link rel="manifest">`, if any resolved.
    pub manifest_url: Option<Url>,
    /// Base URL in effect for the document (`<base href>` applied).
    pub base_url: Option<Url>,
}

/// Parse HTML text and scan it. See [`extract_markup`].
pub fn parse_markup(html: &str, base: Option<&Url>) -> MarkupScan {
    let document = Html::parse_document(html);
    extract_markup(&document, base)
}

/// Scan a parsed document for icon and manifest declarations.
///
/// The first `<base href>` that resolves to an http(s) URL replaces `base`
/// for every link in the document. Links whose `href` cannot be resolved are
/// dropped individually. When several manifests are declared the last
/// resolvable one wins.
pub fn extract_markup(document: &Html, base: Option<&Url>) -> MarkupScan {
    let base_url = document_base(document, base);
    let base = base_url.as_ref();

    let mut icons = Vec::new();
    let mut manifest_url = None;

    for element in document.select(&LINK_SELECTOR) {
        let rel = normalize_rel(element.value().attr("rel").unwrap_or_default());

        if ICON_RELATIONS.contains(&rel.as_str()) {
            if let Some(icon) = icon_from_link(element, base) {
                icons.push(icon);
            }
        } else if rel == MANIFEST_RELATION {
            let href = element.value().attr("href").unwrap_or_default();
            if let Some(url) = resolve_reference(href, base) {
                manifest_url = Some(url);
            }
        }
    }

    debug!(
        icons = icons.len(),
        manifest = manifest_url.as_ref().map(Url::as_str),
        "Scanned markup"
    );

    MarkupScan {
        icons,
        manifest_url,
        base_url,
    }
}

fn document_base(document: &Html, base: Option<&Url>) -> Option<Url> {
    let declared = document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| resolve_reference(href, base))
        .filter(|url| matches!(url.scheme(), "http" | "https"));

    declared.or_else(|| base.cloned())
}

fn icon_from_link(element: ElementRef<'_>, base: Option<&Url>) -> Option<Icon> {
    let attrs = element.value();
    let url = resolve_reference(attrs.attr("href").unwrap_or_default(), base)?;

    let mut icon = Icon::new(&url, IconSource::Markup).with_mime_type(attrs.attr("type"));
    if let Some(size) = attrs
        .attr("sizes")
        .and_then(|sizes| IconSize::parse_list(sizes).into_iter().next())
    {
        icon = icon.with_size(size);
    }
    Some(icon)
}

/// Lower-case a `rel` value and collapse internal whitespace.
fn normalize_rel(rel: &str) -> String {
    rel.split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/section/page.html").unwrap()
    }

    #[test]
    fn test_extracts_every_icon_relation() {
        let html = r#"
            <link rel="icon" href="/a.png">
            <link rel="alternate icon" href="/b.ico">
            <link rel="shortcut icon" href="/c.ico">
            <link rel="apple-touch-icon" href="/d.png">
            <link rel="apple-touch-icon-precomposed" href="/e.png">
            <link rel="fluid-icon" href="/f.png">
            <link rel="stylesheet" href="/style.css">
            <link rel="preload" href="/font.woff2">
        "#;
        let scan = parse_markup(html, Some(&base()));
        let paths: Vec<_> = scan
            .icons
            .iter()
            .map(|i| Url::parse(&i.url).unwrap().path().to_string())
            .collect();
        assert_eq!(paths, ["/a.png", "/b.ico", "/c.ico", "/d.png", "/e.png", "/f.png"]);
        assert!(scan.icons.iter().all(|i| i.source == IconSource::Markup));
    }

    #[test]
    fn test_three_icon_links_yield_three_icons() {
        let html = r#"<head>
            <link rel="icon" href="/favicon-16.png" sizes="16x16">
            <link rel="icon" href="/favicon-32.png" sizes="32x32">
            <link rel="icon" href="/favicon.svg" type="image/svg+xml">
        </head>"#;
        assert_eq!(parse_markup(html, Some(&base())).icons.len(), 3);
    }

    #[test]
    fn test_rel_is_case_and_whitespace_insensitive() {
        let html = r#"<link rel="  Shortcut   ICON " href="/x.ico">"#;
        let scan = parse_markup(html, Some(&base()));
        assert_eq!(scan.icons.len(), 1);
    }

    #[test]
    fn test_copies_type_and_sizes() {
        let html = r#"<link rel="icon" type="image/png" sizes="any 48x48 96x96" href="i.png">"#;
        let icon = &parse_markup(html, Some(&base())).icons[0];
        assert_eq!(icon.url, "https://www.example.com/section/i.png");
        assert_eq!(icon.mime_type.as_deref(), Some("image/png"));
        assert_eq!((icon.width, icon.height), (48, 48));
    }

    #[test]
    fn test_drops_links_without_usable_href() {
        let html = r#"
            <link rel="icon">
            <link rel="icon" href="">
            <link rel="icon" href="javascript:alert(1)">
            <link rel="icon" href="/ok.png">
        "#;
        let scan = parse_markup(html, Some(&base()));
        assert_eq!(scan.icons.len(), 1);
    }

    #[test]
    fn test_relative_links_without_base_are_dropped() {
        let html = r#"
            <link rel="icon" href="/relative.png">
            <link rel="icon" href="https://cdn.example.com/abs.png">
        "#;
        let scan = parse_markup(html, None);
        assert_eq!(scan.icons.len(), 1);
        assert_eq!(scan.icons[0].url, "https://cdn.example.com/abs.png");
        assert!(scan.base_url.is_none());
    }

    #[test]
    fn test_manifest_link_last_resolvable_wins() {
        let html = r#"
            <link rel="manifest" href="/first.json">
            <link rel="manifest" href="/second.json">
            <link rel="manifest" href="">
        "#;
        let scan = parse_markup(html, Some(&base()));
        assert_eq!(
            scan.manifest_url.unwrap().as_str(),
            "https://www.example.com/second.json"
        );
        assert!(scan.icons.is_empty());
    }

    #[test]
    fn test_no_manifest_link() {
        let scan = parse_markup(r#"<link rel="icon" href="/a.png">"#, Some(&base()));
        assert!(scan.manifest_url.is_none());
    }

    #[test]
    fn test_base_element_overrides_base_url() {
        let html = r#"
            <head>
              <base href="https://static.example.net/assets/">
              <link rel="icon" href="icon.png">
              <link rel="manifest" href="app.webmanifest">
            </head>
        "#;
        let scan = parse_markup(html, Some(&base()));
        assert_eq!(scan.icons[0].url, "https://static.example.net/assets/icon.png");
        assert_eq!(
            scan.base_url.unwrap().as_str(),
            "https://static.example.net/assets/"
        );
        assert_eq!(
            scan.manifest_url.unwrap().as_str(),
            "https://static.example.net/assets/app.webmanifest"
        );
    }

    #[test]
    fn test_relative_base_element_resolves_against_page() {
        let html = r#"<base href="/v2/"><link rel="icon" href="i.ico">"#;
        let scan = parse_markup(html, Some(&base()));
        assert_eq!(scan.icons[0].url, "https://www.example.com/v2/i.ico");
    }

    #[test]
    fn test_preserves_document_order_including_body_links() {
        let html = r#"
            <head><link rel="apple-touch-icon" href="/touch.png"></head>
            <body><link rel="icon" href="/late.ico"></body>
        "#;
        let scan = parse_markup(html, Some(&base()));
        assert!(scan.icons[0].url.ends_with("/touch.png"));
        assert!(scan.icons[1].url.ends_with("/late.ico"));
    }
}
