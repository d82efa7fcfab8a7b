use crate::parser;
use crate::types::{AggregatorError, FetchConfig, ParsedFeed, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Per-request knobs passed down to the HTTP primitive.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub user_agent: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET primitive used by the feed fetcher and the article scraper.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse>;
}

/// reqwest-backed [`HttpClient`].
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &options.user_agent)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AggregatorError::Timeout { url: url.to_string() }
                } else {
                    AggregatorError::Http(e)
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

pub struct Fetcher {
    client: Arc<dyn HttpClient>,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = ReqwestClient::new(&config)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    pub fn with_client(client: Arc<dyn HttpClient>, config: FetchConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a feed body with the descriptive client identifier.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let options = RequestOptions {
            user_agent: self.config.user_agent.clone(),
            timeout: self.config.timeout(),
        };
        self.get_checked(url, &options).await
    }

    /// Fetch an HTML page with the browser-like identifier.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let options = RequestOptions {
            user_agent: self.config.page_user_agent.clone(),
            timeout: self.config.timeout(),
        };
        self.get_checked(url, &options).await
    }

    async fn get_checked(&self, url: &str, options: &RequestOptions) -> Result<String> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AggregatorError::Unsupported {
                url: url.to_string(),
                reason: format!("scheme {} cannot be fetched", parsed.scheme()),
            });
        }

        let start_time = Instant::now();
        debug!("Fetching {}", url);

        // Enforce the timeout here too so injected clients are bounded as well.
        let response = tokio::time::timeout(options.timeout, self.client.get(url, options))
            .await
            .map_err(|_| AggregatorError::Timeout { url: url.to_string() })??;

        if !response.is_success() {
            return Err(AggregatorError::HttpStatus {
                status: response.status,
                url: url.to_string(),
            });
        }

        let size_mb = response.body.len() / (1024 * 1024);
        if size_mb > self.config.max_feed_size_mb {
            return Err(AggregatorError::FeedTooLarge { size_mb });
        }

        debug!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            response.body.len(),
            start_time.elapsed().as_millis()
        );
        Ok(response.body)
    }

    /// Fetch and parse a feed. Failures are logged and collapse to `None`.
    pub async fn parse_url(&self, url: &str) -> Option<ParsedFeed> {
        self.parse_url_with_timeout(url, self.config.timeout()).await
    }

    pub async fn parse_url_with_timeout(&self, url: &str, timeout: Duration) -> Option<ParsedFeed> {
        match tokio::time::timeout(timeout, self.try_parse_url(url)).await {
            Ok(Ok(feed)) => {
                info!("Parsed feed {} with {} items", url, feed.items.len());
                Some(feed)
            }
            Ok(Err(e)) => {
                warn!(url, error = %e, "Failed to parse feed");
                None
            }
            Err(_) => {
                warn!(url, "Timed out fetching feed");
                None
            }
        }
    }

    async fn try_parse_url(&self, url: &str) -> Result<ParsedFeed> {
        let content = self.fetch_text(url).await?;
        if !parser::is_valid_feed_content(&content) {
            return Err(AggregatorError::Parse(format!("{} did not return a feed document", url)));
        }
        parser::parse_feed(&content, url)
    }
}
