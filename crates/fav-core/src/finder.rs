//! Discovery orchestration.
//!
//! A [`Finder`] holds immutable configuration and a shared HTTP client. Each
//! call to [`Finder::find`], [`Finder::find_html`] or [`Finder::find_reader`]
//! runs one discovery pass:
//!
//! 1. scan the page markup for `<link>` icons and a manifest declaration
//! 2. fetch the manifest and probe well-known paths, concurrently
//! 3. merge the three candidate lists in precedence order
//! 4. apply the configured filters
//!
//! Only problems with the primary input abort a run. Manifest and probe
//! failures shrink the result instead.

use std::io::Read;
use std::time::Duration;

use tracing::{debug, info, instrument};
use url::Url;

use crate::discovery::aggregate::merge_candidates;
use crate::discovery::filter::{IconFilter, apply_filters};
use crate::discovery::manifest::{DEFAULT_MANIFEST_PATH, fetch_manifest};
use crate::discovery::markup::parse_markup;
use crate::discovery::well_known::{DEFAULT_MAX_CONCURRENT_PROBES, probe_well_known};
use crate::fetcher::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::url_resolver::{parse_base_url, resolve_reference};
use crate::{Error, Fetcher, FinderConfig, Icon, ImageFormat, Result};

/// Favicon discovery entry point.
///
/// `Finder` is cheap to clone and safe to share across tasks; concurrent
/// runs share only the HTTP connection pool.
///
/// ```rust,no_run
/// use fav_core::Finder;
///
/// # async fn example() -> fav_core::Result<()> {
/// let finder = Finder::builder().only_png().ignore_well_known().build()?;
/// for icon in finder.find("https://www.rust-lang.org/").await? {
///     println!("{} {}x{}", icon.url, icon.width, icon.height);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Finder {
    fetcher: Fetcher,
    ignore_manifest: bool,
    ignore_well_known: bool,
    max_concurrent_probes: usize,
    filters: Vec<IconFilter>,
}

impl Finder {
    /// A finder with default settings and no filters.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring a finder.
    pub fn builder() -> FinderBuilder {
        FinderBuilder::default()
    }

    /// Filters applied to every run.
    pub fn filters(&self) -> &[IconFilter] {
        &self.filters
    }

    /// Fetch a page and discover its icons.
    ///
    /// Relative references resolve against the final URL after redirects.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `url` is not an absolute http(s) URL
    /// - [`Error::NotFound`], [`Error::Network`], [`Error::Timeout`] if the page fetch fails
    /// - [`Error::Parse`] if the response body is not text
    #[instrument(skip_all, fields(url = %url))]
    pub async fn find(&self, url: &str) -> Result<Vec<Icon>> {
        let page_url = parse_base_url(url)?;
        let page = self.fetcher.fetch_page(&page_url).await?;
        if let Some(content_type) = &page.content_type {
            debug!(%content_type, final_url = %page.final_url, "Fetched primary page");
        }

        let html = decode_document(&page.body)?;
        Ok(ParseContext::new(self, Some(page.final_url))
            .discover(&html)
            .await)
    }

    /// Discover icons in HTML the caller already has.
    ///
    /// `base_url` is required for relative links, the manifest and the
    /// well-known probes to resolve, unless the document carries an absolute
    /// `<base href>`.
    ///
    /// Text containing NUL characters is rejected with [`Error::Parse`], as
    /// for the other entry points.
    #[instrument(skip_all, fields(base_url = base_url.unwrap_or("")))]
    pub async fn find_html(&self, html: &str, base_url: Option<&str>) -> Result<Vec<Icon>> {
        let base = base_url.map(parse_base_url).transpose()?;
        reject_binary(html.as_bytes())?;
        Ok(ParseContext::new(self, base).discover(html).await)
    }

    /// Read HTML from `reader` and discover its icons. See [`Finder::find_html`].
    pub async fn find_reader<R: Read>(
        &self,
        mut reader: R,
        base_url: Option<&str>,
    ) -> Result<Vec<Icon>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let html = decode_document(&bytes)?;
        self.find_html(&html, base_url).await
    }
}

/// Builder for [`Finder`].
#[derive(Debug, Clone, Default)]
pub struct FinderBuilder {
    client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    max_concurrent_probes: Option<usize>,
    ignore_manifest: bool,
    ignore_well_known: bool,
    filters: Vec<IconFilter>,
}

impl FinderBuilder {
    /// Keep only ICO icons.
    #[must_use]
    pub fn only_ico(self) -> Self {
        self.filter(IconFilter::Format(ImageFormat::Ico))
    }

    /// Keep only PNG icons.
    #[must_use]
    pub fn only_png(self) -> Self {
        self.filter(IconFilter::Format(ImageFormat::Png))
    }

    /// Keep only icons of the given MIME type.
    #[must_use]
    pub fn only_mime_type(self, mime_type: &str) -> Self {
        self.filter(IconFilter::mime_type(mime_type))
    }

    /// Add a filter. Icons matching any filter are kept.
    #[must_use]
    pub fn filter(mut self, filter: IconFilter) -> Self {
        if !self.filters.contains(&filter) {
            self.filters.push(filter);
        }
        self
    }

    /// Do not fetch the web-app manifest.
    #[must_use]
    pub const fn ignore_manifest(mut self) -> Self {
        self.ignore_manifest = true;
        self
    }

    /// Do not probe well-known paths.
    #[must_use]
    pub const fn ignore_well_known(mut self) -> Self {
        self.ignore_well_known = true;
        self
    }

    /// Use a caller-supplied HTTP client. Its own timeout and user agent
    /// apply; [`timeout`](Self::timeout) and [`user_agent`](Self::user_agent)
    /// are then ignored.
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Per-request timeout for the built-in client.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `User-Agent` for the built-in client.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Maximum number of well-known probes in flight at once.
    #[must_use]
    pub const fn max_concurrent_probes(mut self, limit: usize) -> Self {
        self.max_concurrent_probes = Some(limit);
        self
    }

    /// Apply settings from a [`FinderConfig`].
    ///
    /// Ignore flags and filters accumulate with ones already set; scalar
    /// settings overwrite.
    #[must_use]
    pub fn config(mut self, config: &FinderConfig) -> Self {
        self.timeout = Some(config.timeout());
        self.user_agent = Some(config.user_agent.clone());
        self.max_concurrent_probes = Some(config.max_concurrent_probes);
        self.ignore_manifest |= config.ignore_manifest;
        self.ignore_well_known |= config.ignore_well_known;
        config
            .filters()
            .into_iter()
            .fold(self, FinderBuilder::filter)
    }

    /// Build the finder.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] for a zero timeout or probe limit
    /// - [`Error::Network`] if the built-in HTTP client cannot be constructed
    pub fn build(self) -> Result<Finder> {
        let max_concurrent_probes = self
            .max_concurrent_probes
            .unwrap_or(DEFAULT_MAX_CONCURRENT_PROBES);
        if max_concurrent_probes == 0 {
            return Err(Error::Config(
                "max_concurrent_probes must be greater than zero".into(),
            ));
        }

        let fetcher = match self.client {
            Some(client) => Fetcher::from_client(client),
            None => {
                let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
                if timeout.is_zero() {
                    return Err(Error::Config("timeout must be greater than zero".into()));
                }
                let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
                Fetcher::with_settings(timeout, user_agent)?
            },
        };

        Ok(Finder {
            fetcher,
            ignore_manifest: self.ignore_manifest,
            ignore_well_known: self.ignore_well_known,
            max_concurrent_probes,
            filters: self.filters,
        })
    }
}

/// State owned by a single discovery run.
struct ParseContext<'a> {
    finder: &'a Finder,
    base_url: Option<Url>,
}

impl<'a> ParseContext<'a> {
    const fn new(finder: &'a Finder, base_url: Option<Url>) -> Self {
        Self { finder, base_url }
    }

    async fn discover(self, html: &str) -> Vec<Icon> {
        let finder = self.finder;
        let scan = parse_markup(html, self.base_url.as_ref());

        // Site-level locations follow the page, not a <base> pointing elsewhere.
        let site_base = self.base_url.as_ref().or(scan.base_url.as_ref());

        let manifest_url = scan.manifest_url.clone().or_else(|| {
            site_base.and_then(|base| resolve_reference(DEFAULT_MANIFEST_PATH, Some(base)))
        });

        let manifest = async {
            match &manifest_url {
                Some(url) if !finder.ignore_manifest => fetch_manifest(&finder.fetcher, url).await,
                _ => Vec::new(),
            }
        };
        let well_known = async {
            match site_base {
                Some(base) if !finder.ignore_well_known => {
                    probe_well_known(&finder.fetcher, base, finder.max_concurrent_probes).await
                },
                _ => Vec::new(),
            }
        };

        let (manifest, well_known) = tokio::join!(manifest, well_known);
        debug!(
            markup = scan.icons.len(),
            manifest = manifest.len(),
            well_known = well_known.len(),
            "Collected candidates"
        );

        let merged = merge_candidates(scan.icons, manifest, well_known);
        let icons = apply_filters(merged, &finder.filters);
        info!("Discovered {} icons", icons.len());
        icons
    }
}

/// Turn raw page bytes into text for the HTML parser.
///
/// Content containing NUL bytes is treated as binary and rejected. Other
/// invalid UTF-8 is decoded lossily, since legacy single-byte encodings are
/// common and link attributes are almost always ASCII.
fn decode_document(bytes: &[u8]) -> Result<String> {
    reject_binary(bytes)?;
    let text = String::from_utf8_lossy(bytes);
    Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
}

fn reject_binary(bytes: &[u8]) -> Result<()> {
    if bytes.contains(&0) {
        return Err(Error::Parse(
            "content contains binary data and cannot be parsed as HTML".into(),
        ));
    }
    Ok(())
}
