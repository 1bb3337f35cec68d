//! Caller-specified icon filters.
//!
//! Filters form an allow-list: with no filters every icon is kept, otherwise
//! an icon is kept when at least one filter matches it. Matching is
//! conservative; an icon whose type cannot be determined (no declared MIME
//! type and no recognizable extension) never matches.

use serde::{Deserialize, Serialize};

use crate::types::normalize_mime;
use crate::{Icon, ImageFormat};

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconFilter {
    /// Effective MIME type equals this value (case-insensitive, parameters ignored).
    MimeType(String),
    /// Effective MIME type is any alias of this format.
    Format(ImageFormat),
}

impl IconFilter {
    /// Build a MIME-type filter, normalizing the value.
    pub fn mime_type(mime: &str) -> Self {
        Self::MimeType(normalize_mime(mime))
    }

    /// Whether `icon` satisfies this predicate.
    ///
    /// ```rust
    /// use fav_core::{Icon, IconFilter, IconSource, ImageFormat};
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/favicon.ico").unwrap();
    /// let icon = Icon::new(&url, IconSource::WellKnown);
    ///
    /// assert!(IconFilter::Format(ImageFormat::Ico).matches(&icon));
    /// assert!(IconFilter::mime_type("image/x-icon").matches(&icon));
    /// assert!(!IconFilter::Format(ImageFormat::Png).matches(&icon));
    /// ```
    pub fn matches(&self, icon: &Icon) -> bool {
        let Some(effective) = icon.effective_mime_type() else {
            return false;
        };

        match self {
            Self::MimeType(mime) => normalize_mime(mime) == effective,
            Self::Format(format) => ImageFormat::from_mime_type(&effective) == Some(*format),
        }
    }
}

/// Keep the icons accepted by any of `filters`, preserving order.
pub fn apply_filters(icons: Vec<Icon>, filters: &[IconFilter]) -> Vec<Icon> {
    if filters.is_empty() {
        return icons;
    }
    icons
        .into_iter()
        .filter(|icon| filters.iter().any(|f| f.matches(icon)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::IconSource;
    use url::Url;

    fn icon(path: &str, mime: Option<&str>) -> Icon {
        let url = Url::parse("https://example.com/").unwrap().join(path).unwrap();
        Icon::new(&url, IconSource::Markup).with_mime_type(mime)
    }

    /// One ICO, five PNGs (declared or by extension) and one JPEG.
    fn mixed() -> Vec<Icon> {
        vec![
            icon("/favicon.ico", None),
            icon("/a.png", None),
            icon("/b.png", Some("image/png")),
            icon("/c", Some("image/png")),
            icon("/d.PNG", None),
            icon("/e.png?v=2", None),
            icon("/photo.jpg", None),
        ]
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        assert_eq!(apply_filters(mixed(), &[]).len(), 7);
    }

    #[test]
    fn test_png_mime_filter_on_mixed_set() {
        let kept = apply_filters(mixed(), &[IconFilter::mime_type("image/png")]);
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn test_format_filters_on_mixed_set() {
        assert_eq!(
            apply_filters(mixed(), &[IconFilter::Format(ImageFormat::Png)]).len(),
            5
        );
        assert_eq!(
            apply_filters(mixed(), &[IconFilter::Format(ImageFormat::Ico)]).len(),
            1
        );
        assert_eq!(
            apply_filters(mixed(), &[IconFilter::mime_type("image/jpeg")]).len(),
            1
        );
    }

    #[test]
    fn test_filters_are_an_allow_list() {
        let kept = apply_filters(
            mixed(),
            &[
                IconFilter::Format(ImageFormat::Ico),
                IconFilter::mime_type("image/jpeg"),
            ],
        );
        assert_eq!(kept.len(), 2);
        assert!(kept[0].url.ends_with("favicon.ico"));
        assert!(kept[1].url.ends_with("photo.jpg"));
    }

    #[test]
    fn test_ico_aliases_match_format_filter() {
        let declared = icon("/icon", Some("image/vnd.microsoft.icon"));
        assert!(IconFilter::Format(ImageFormat::Ico).matches(&declared));
        assert!(!IconFilter::mime_type("image/x-icon").matches(&declared));
    }

    #[test]
    fn test_unknown_type_is_excluded() {
        let unknown = icon("/icon", None);
        assert!(!IconFilter::Format(ImageFormat::Png).matches(&unknown));
        assert!(!IconFilter::mime_type("image/png").matches(&unknown));
        assert!(apply_filters(vec![unknown], &[IconFilter::mime_type("image/png")]).is_empty());
    }

    #[test]
    fn test_declared_type_beats_extension() {
        let mislabeled = icon("/favicon.ico", Some("image/png"));
        assert!(IconFilter::Format(ImageFormat::Png).matches(&mislabeled));
        assert!(!IconFilter::Format(ImageFormat::Ico).matches(&mislabeled));
    }

    #[test]
    fn test_mime_filter_is_case_insensitive() {
        let i = icon("/x.svg", None);
        assert!(IconFilter::MimeType("IMAGE/SVG+XML".to_string()).matches(&i));
    }
}
