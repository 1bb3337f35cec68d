use serde::{Deserialize, Serialize};
use url::Url;

/// A discovered icon candidate.
///
/// `url` is always an absolute URL; candidates whose reference could not be
/// resolved never become an `Icon`. A `width`/`height` of `0` means the size
/// was not declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Absolute URL of the icon resource.
    pub url: String,
    /// MIME type, when declared by markup, manifest, or probe response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Declared width in pixels (`0` when unknown).
    #[serde(default)]
    pub width: u32,
    /// Declared height in pixels (`0` when unknown).
    #[serde(default)]
    pub height: u32,
    /// Evidence source that first produced this icon.
    pub source: IconSource,
    /// Web-app manifest `purpose` (e.g. `maskable`), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl Icon {
    /// Create an icon with no metadata besides its URL and origin.
    pub fn new(url: &Url, source: IconSource) -> Self {
        Self {
            url: url.to_string(),
            mime_type: None,
            width: 0,
            height: 0,
            source,
            purpose: None,
        }
    }

    /// Set the declared MIME type. Blank values are ignored.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: Option<&str>) -> Self {
        self.mime_type = mime_type
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string);
        self
    }

    /// Set the declared dimensions.
    #[must_use]
    pub const fn with_size(mut self, size: IconSize) -> Self {
        self.width = size.width;
        self.height = size.height;
        self
    }

    /// Returns `true` when either dimension was declared.
    pub const fn has_size(&self) -> bool {
        self.width != 0 || self.height != 0
    }

    /// Declared dimensions as an [`IconSize`].
    pub const fn size(&self) -> IconSize {
        IconSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Lower-cased file extension of the URL path, without the dot.
    ///
    /// ```rust
    /// use fav_core::{Icon, IconSource};
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/static/Favicon.ICO?v=2").unwrap();
    /// let icon = Icon::new(&url, IconSource::Markup);
    /// assert_eq!(icon.file_extension().as_deref(), Some("ico"));
    /// ```
    pub fn file_extension(&self) -> Option<String> {
        let parsed = Url::parse(&self.url).ok()?;
        if parsed.cannot_be_a_base() {
            return None;
        }
        let file_name = parsed.path_segments()?.next_back()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Declared MIME type, or the one implied by the URL.
    ///
    /// `data:` URLs carry their own media type; other URLs fall back to the
    /// file extension. Returns `None` when neither source is conclusive.
    pub fn effective_mime_type(&self) -> Option<String> {
        if let Some(declared) = &self.mime_type {
            return Some(normalize_mime(declared));
        }
        if let Some(media_type) = data_url_media_type(&self.url) {
            return Some(media_type);
        }
        self.file_extension()
            .and_then(|ext| ImageFormat::from_extension(&ext))
            .map(|format| format.mime_type().to_string())
    }
}

/// Lower-case a MIME type and drop any parameters (`; charset=...`).
pub(crate) fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn data_url_media_type(url: &str) -> Option<String> {
    let rest = url.strip_prefix("data:")?;
    let header = rest.split(',').next()?;
    let media_type = normalize_mime(header);
    (!media_type.is_empty()).then_some(media_type)
}

/// Where an icon candidate was discovered.
///
/// Declaration order is also the merge precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconSource {
    /// A `<link rel="...icon...">` element.
    Markup,
    /// The `icons` array of a web-app manifest.
    Manifest,
    /// A conventional path such as `/favicon.ico` that answered successfully.
    WellKnown,
}

impl std::fmt::Display for IconSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Markup => "markup",
            Self::Manifest => "manifest",
            Self::WellKnown => "well-known",
        };
        f.write_str(label)
    }
}

/// Declared pixel dimensions of an icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl IconSize {
    /// Parse a single `WIDTHxHEIGHT` token (the `x` is case-insensitive).
    ///
    /// Returns `None` for `any`, zero dimensions and anything non-numeric.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        let (w, h) = token.split_once('x')?;
        let width = w.parse::<u32>().ok()?;
        let height = h.parse::<u32>().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Parse a whitespace-separated `sizes` value, skipping unusable tokens.
    ///
    /// ```rust
    /// use fav_core::IconSize;
    ///
    /// let sizes = IconSize::parse_list("16x16 32X32 any");
    /// assert_eq!(sizes.len(), 2);
    /// assert_eq!(sizes[1].width, 32);
    /// ```
    pub fn parse_list(value: &str) -> Vec<Self> {
        value.split_whitespace().filter_map(Self::parse).collect()
    }
}

/// Image formats recognized by filters and extension-based MIME inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Windows icon (`.ico`).
    Ico,
    /// Portable Network Graphics.
    Png,
    /// JPEG.
    Jpeg,
    /// GIF.
    Gif,
    /// Scalable Vector Graphics.
    Svg,
    /// WebP.
    Webp,
    /// Windows bitmap.
    Bmp,
}

impl ImageFormat {
    /// Canonical MIME type.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Ico => "image/x-icon",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    /// Every MIME type that denotes this format in the wild.
    pub const fn mime_aliases(self) -> &'static [&'static str] {
        match self {
            Self::Ico => &["image/x-icon", "image/vnd.microsoft.icon", "image/ico"],
            Self::Png => &["image/png", "image/x-png"],
            Self::Jpeg => &["image/jpeg", "image/jpg", "image/pjpeg"],
            Self::Gif => &["image/gif"],
            Self::Svg => &["image/svg+xml"],
            Self::Webp => &["image/webp"],
            Self::Bmp => &["image/bmp", "image/x-ms-bmp"],
        }
    }

    /// Map a (lower-case) file extension to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ico" => Some(Self::Ico),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "svg" => Some(Self::Svg),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Map a MIME type (any alias, parameters ignored) to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let mime = normalize_mime(mime);
        [
            Self::Ico,
            Self::Png,
            Self::Jpeg,
            Self::Gif,
            Self::Svg,
            Self::Webp,
            Self::Bmp,
        ]
        .into_iter()
        .find(|format| format.mime_aliases().contains(&mime.as_str()))
    }
}
