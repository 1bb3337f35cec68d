use crate::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("favscout/", env!("CARGO_PKG_VERSION"));

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";
const MANIFEST_ACCEPT: &str = "application/manifest+json,application/json;q=0.9,*/*;q=0.8";

/// HTTP access shared by every fetch of a discovery run.
///
/// Wraps a [`reqwest::Client`], which is internally reference-counted, so
/// cloning a `Fetcher` is cheap and all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with the default timeout and user agent
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_settings(timeout, DEFAULT_USER_AGENT)
    }

    /// Creates a new fetcher with a custom timeout and user agent
    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Wraps a caller-supplied client; its timeout and redirect policy apply as-is
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches the primary page. Any failure here is fatal for the run.
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, HTML_ACCEPT)
            .send()
            .await
            .map_err(|err| map_request_error(err, url))?;

        let response = check_status(response, url)?;
        let final_url = response.url().clone();
        let content_type = header_value(&response);
        let body = response
            .bytes()
            .await
            .map_err(|err| map_request_error(err, url))?
            .to_vec();

        info!("Fetched {} bytes from {}", body.len(), final_url);

        Ok(FetchedPage {
            final_url,
            content_type,
            body,
        })
    }

    /// Fetches a manifest document as text, keeping its final location
    pub async fn fetch_text(&self, url: &Url) -> Result<FetchedText> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, MANIFEST_ACCEPT)
            .send()
            .await
            .map_err(|err| map_request_error(err, url))?;

        let response = check_status(response, url)?;
        let final_url = response.url().clone();
        let content = response
            .text()
            .await
            .map_err(|err| map_request_error(err, url))?;

        debug!("Fetched {} bytes from {}", content.len(), final_url);
        Ok(FetchedText { final_url, content })
    }

    /// Checks whether a resource exists.
    ///
    /// Sends a HEAD request; servers that reject HEAD with 405 or 501 get one
    /// GET for the same URL instead. Any final 2xx status (after redirects)
    /// counts as existing. Transport errors, timeouts and other statuses
    /// yield `None`.
    pub async fn probe(&self, url: &Url) -> Option<ProbeHit> {
        let response = match self.client.head(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, %url, "HEAD probe failed");
                return None;
            },
        };

        let response = match response.status() {
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
                debug!(status = %response.status(), %url, "HEAD not supported; falling back to GET");
                match self.client.get(url.clone()).send().await {
                    Ok(response) => response,
                    Err(err) => {
                        debug!(error = %err, %url, "GET probe failed");
                        return None;
                    },
                }
            },
            _ => response,
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, %url, "Probe rejected candidate URL");
            return None;
        }

        Some(ProbeHit {
            content_type: header_value(&response),
        })
    }
}

/// A successfully fetched primary page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects; relative links resolve against it
    pub final_url: Url,
    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
    /// Raw response body
    pub body: Vec<u8>,
}

/// A successfully fetched text document.
#[derive(Debug, Clone)]
pub struct FetchedText {
    /// URL after following redirects; relative references resolve against it
    pub final_url: Url,
    /// Decoded response body
    pub content: String,
}

/// Evidence that a probed resource exists.
#[derive(Debug, Clone)]
pub struct ProbeHit {
    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
}

fn header_value(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

fn check_status(response: Response, url: &Url) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Map 404 to a clearer NotFound error
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(format!("no resource at '{url}' (HTTP 404)")));
    }

    response.error_for_status().map_err(Error::Network)
}

fn map_request_error(err: reqwest::Error, url: &Url) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("request to '{url}' timed out"))
    } else {
        Error::Network(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn url_for(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{p}", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_fetcher_creation() {
        assert!(Fetcher::new().is_ok(), "Fetcher creation should succeed");
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body_and_content_type() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html></html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new()?;
        let page = fetcher.fetch_page(&url_for(&server, "/index.html")).await?;

        assert_eq!(page.body, b"<html></html>");
        assert_eq!(
            page.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(page.final_url.path(), "/index.html");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_page_follows_redirects() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/new/home.html", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new/home.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let page = Fetcher::new()?
            .fetch_page(&url_for(&server, "/old"))
            .await?;
        assert_eq!(page.final_url.path(), "/new/home.html");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_text_reports_final_url() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/m.json"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/assets/pwa/manifest.json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/assets/pwa/manifest.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .mount(&server)
            .await;

        let fetched = Fetcher::new()?
            .fetch_text(&url_for(&server, "/m.json"))
            .await?;
        assert_eq!(fetched.final_url.path(), "/assets/pwa/manifest.json");
        assert_eq!(fetched.content, "{}");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_page_404_is_not_found() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = Fetcher::new()?
            .fetch_page(&url_for(&server, "/missing"))
            .await;
        match result {
            Err(Error::NotFound(msg)) => assert!(msg.contains("/missing")),
            other => panic!("expected NotFound, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_page_500_is_network_error() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = Fetcher::new()?.fetch_page(&url_for(&server, "/")).await;
        assert!(matches!(result, Err(Error::Network(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_page_timeout() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::with_timeout(Duration::from_millis(100))?;
        let result = fetcher.fetch_page(&url_for(&server, "/")).await;
        assert!(matches!(result, Err(Error::Timeout(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_head_success() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/favicon.ico"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/x-icon"))
            .mount(&server)
            .await;

        let hit = Fetcher::new()?
            .probe(&url_for(&server, "/favicon.ico"))
            .await
            .unwrap();
        assert_eq!(hit.content_type.as_deref(), Some("image/x-icon"));
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_missing() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let hit = Fetcher::new()?
            .probe(&url_for(&server, "/favicon.ico"))
            .await;
        assert!(hit.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_get_when_head_rejected() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/favicon.ico"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0_u8, 0, 1, 0]))
            .expect(1)
            .mount(&server)
            .await;

        let hit = Fetcher::new()?
            .probe(&url_for(&server, "/favicon.ico"))
            .await;
        assert!(hit.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_probe_timeout_is_absence() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let fetcher = Fetcher::with_timeout(Duration::from_millis(100))?;
        assert!(fetcher.probe(&url_for(&server, "/favicon.ico")).await.is_none());
        Ok(())
    }
}
