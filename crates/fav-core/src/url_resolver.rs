//! Reference resolution against a page or manifest base URL.
//!
//! Resolution follows RFC 3986 via [`Url::join`], so scheme-relative
//! (`//cdn.example.com/icon.png`), absolute-path (`/favicon.ico`), relative
//! (`img/icon.png`, `../icon.png`) and absolute references all behave the
//! way a browser resolves them. Failures are reported as `None`; a single
//! bad reference never aborts discovery.

use tracing::debug;
use url::Url;

use crate::{Error, Result};

/// Schemes an icon reference may resolve to.
const ICON_SCHEMES: &[&str] = &["http", "https", "data"];

/// Resolve `reference` against an optional base URL.
///
/// Returns `None` when the reference is empty, malformed, cannot be resolved
/// (a relative reference with no base), or resolves to a scheme that cannot
/// carry an icon such as `javascript:` or `mailto:`.
///
/// ```rust
/// use fav_core::url_resolver::resolve_reference;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/post.html").unwrap();
/// let icon = resolve_reference("../img/icon.png", Some(&base)).unwrap();
/// assert_eq!(icon.as_str(), "https://example.com/img/icon.png");
///
/// let cdn = resolve_reference("//cdn.example.net/i.png", Some(&base)).unwrap();
/// assert_eq!(cdn.as_str(), "https://cdn.example.net/i.png");
///
/// assert!(resolve_reference("   ", Some(&base)).is_none());
/// assert!(resolve_reference("/favicon.ico", None).is_none());
/// ```
pub fn resolve_reference(reference: &str, base: Option<&Url>) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(reference),
        None => Url::parse(reference),
    };

    match resolved {
        Ok(url) if ICON_SCHEMES.contains(&url.scheme()) => Some(url),
        Ok(url) => {
            debug!(reference, scheme = url.scheme(), "Dropping reference with unsupported scheme");
            None
        },
        Err(err) => {
            debug!(reference, error = %err, "Dropping unresolvable reference");
            None
        },
    }
}

/// Parse a caller-supplied page or base URL.
///
/// Unlike [`resolve_reference`] this is fallible: an unusable base URL is a
/// caller error, not a local discovery failure. Only `http` and `https` are
/// accepted.
pub fn parse_base_url(input: &str) -> Result<Url> {
    let input = input.trim();
    let url = Url::parse(input).map_err(|err| Error::InvalidUrl(format!("'{input}': {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::InvalidUrl(format!(
            "'{input}': unsupported scheme '{other}' (expected http or https)"
        ))),
    }
}
