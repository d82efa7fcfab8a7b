pub mod linkedin;
pub mod reddit;
pub mod rss_feed;
pub mod x_feed;

pub use linkedin::LinkedInSource;
pub use reddit::RedditSource;
pub use rss_feed::RssFeedSource;
pub use x_feed::XFeedSource;

use crate::fetcher::Fetcher;
use crate::topics::TopicClassifier;
use crate::types::{AdapterConfig, SourceType};
use std::sync::Arc;

/// Shared, read-only collaborators handed to every adapter.
#[derive(Clone)]
pub struct SourceContext {
    pub fetcher: Arc<Fetcher>,
    pub classifier: Arc<TopicClassifier>,
    pub config: AdapterConfig,
}

impl SourceContext {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self {
            fetcher,
            classifier: Arc::new(TopicClassifier::default()),
            config: AdapterConfig::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: TopicClassifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }
}

/// Guess the source kind from what a user pasted into settings.
pub fn detect_source_type(url: &str) -> SourceType {
    let url = url.trim();
    if reddit::is_reddit_url(url) {
        SourceType::Reddit
    } else if linkedin::is_linkedin_url(url) {
        SourceType::Linkedin
    } else if x_feed::is_x_url(url) {
        SourceType::X
    } else {
        SourceType::Rss
    }
}

/// The configured display name, when it is more than whitespace.
pub(crate) fn configured_label(display_name: Option<&str>) -> Option<String> {
    display_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
