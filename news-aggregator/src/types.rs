use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use interfaces::defs::{
    CompletionModel, Platform, PostTypeRating, SourceConfig, SourceProvider, SourceType, Story, VoiceAnalysis,
    VoiceProfile, GENERAL_TOPIC, TOPIC_BOOST,
};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Identifier sent with feed requests.
    pub user_agent: String,
    /// Browser-like identifier sent when scraping article pages.
    pub page_user_agent: String,
    pub timeout_seconds: u64,
    /// Per-attempt timeout for RSS bridge mirrors.
    pub bridge_timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "DailyPost/1.0".to_string(),
            page_user_agent: "Mozilla/5.0 (compatible; DailyPost/1.0)".to_string(),
            timeout_seconds: 10,
            bridge_timeout_seconds: 5,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_secs(self.bridge_timeout_seconds)
    }
}

/// Knobs shared by the source adapters.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Replace short RSS summaries with a scraped page description.
    pub enrich_sparse_summaries: bool,
    /// Summaries shorter than this (in chars) count as sparse.
    pub sparse_summary_chars: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            enrich_sparse_summaries: false,
            sparse_summary_chars: 80,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub max_stories: usize,
    /// Upper bound on one aggregation run. `None` waits for every source.
    pub deadline: Option<Duration>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_stories: 30,
            deadline: Some(Duration::from_secs(60)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFeed {
    pub title: String,
    pub description: String,
    pub link: String,
    pub items: Vec<RawFeedItem>,
}

/// One feed entry before it is turned into a [`Story`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeedItem {
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    /// Raw HTML body, when the feed carries one.
    pub content: String,
    /// Plain-text summary.
    pub content_snippet: String,
    pub creator: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unsupported source {url}: {reason}")]
    Unsupported { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
