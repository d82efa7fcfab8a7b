//! X/Twitter accounts, read through public RSS bridges since the official
//! API is paid. Nitter mirrors are tried first, RSSHub after them.

use crate::parser::{self, ParsedFeed, UNTITLED};
use crate::sources::{configured_label, SourceContext};
use crate::traits::SourceAdapter;
use crate::types::{SourceType, Story};
use crate::utils::text;
use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

pub const NITTER_INSTANCES: &[&str] = &[
    "nitter.privacydev.net",
    "nitter.poast.org",
    "nitter.net",
    "nitter.cz",
];

pub const RSSHUB_INSTANCES: &[&str] = &["rsshub.app"];

const WINDOW_HOURS: i64 = 72;
const MAX_ITEMS: usize = 10;
const CONTENT_CHARS: usize = 1000;
const SUMMARY_CHARS: usize = 500;
const TITLE_CHARS: usize = 100;

static RE_PROFILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[/.])(?:twitter|x)\.com/@?([A-Za-z0-9_]+)").unwrap()
});
static RE_HANDLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@?[A-Za-z0-9_]+$").unwrap());
static RE_X_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.|mobile\.)?(?:twitter\.com|x\.com)(?:[/?#]|$)").unwrap()
});
static RE_LINK_HOST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://([^/]+)").unwrap());

/// Account handle from a profile URL or a bare `@handle`.
pub fn extract_x_username(url: &str) -> Option<String> {
    let url = url.trim();
    if let Some(caps) = RE_PROFILE.captures(url) {
        return Some(caps[1].to_string());
    }
    if RE_HANDLE.is_match(url) {
        return Some(url.trim_start_matches('@').to_string());
    }
    None
}

pub fn is_x_url(url: &str) -> bool {
    let url = url.trim();
    RE_X_HOST.is_match(url) || RE_HANDLE.is_match(url)
}

pub fn is_retweet(content: &str) -> bool {
    content.starts_with("RT @") || content.starts_with("RT:")
}

/// A quote tweet carries its own words ahead of the `RT @` marker.
pub fn has_commentary(title: &str) -> bool {
    title.find("RT @").is_some_and(|idx| idx > 5)
}

/// First line of the tweet, shortened with `...` past 100 chars.
pub fn tweet_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    text::truncate_with_ellipsis(first_line, TITLE_CHARS)
}

/// Point bridge links back at x.com so stories do not depend on a mirror.
pub fn canonical_tweet_url(link: &str) -> String {
    let Some(caps) = RE_LINK_HOST.captures(link) else {
        return link.to_string();
    };
    let host = caps[1].to_lowercase();
    if !NITTER_INSTANCES.contains(&host.as_str()) {
        return link.to_string();
    }

    let path = &link[caps.get(0).map_or(0, |m| m.end())..];
    let path = path.split('#').next().unwrap_or_default();
    format!("https://x.com{}", path)
}

pub struct XFeedSource {
    ctx: SourceContext,
    nitter_instances: Vec<String>,
    rsshub_instances: Vec<String>,
}

impl XFeedSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self {
            ctx,
            nitter_instances: NITTER_INSTANCES.iter().map(|s| s.to_string()).collect(),
            rsshub_instances: RSSHUB_INSTANCES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the mirror lists, e.g. to point at a self-hosted bridge.
    pub fn with_instances(mut self, nitter: Vec<String>, rsshub: Vec<String>) -> Self {
        self.nitter_instances = nitter;
        self.rsshub_instances = rsshub;
        self
    }

    /// Candidate bridge URLs for a handle, in the order they are tried.
    pub fn bridge_urls(&self, username: &str) -> Vec<String> {
        let nitter = self
            .nitter_instances
            .iter()
            .map(|instance| format!("https://{}/{}/rss", instance, username));
        let rsshub = self
            .rsshub_instances
            .iter()
            .map(|instance| format!("https://{}/twitter/user/{}", instance, username));
        nitter.chain(rsshub).collect()
    }

    async fn fetch_from_bridges(&self, username: &str) -> Option<ParsedFeed> {
        let timeout = self.ctx.fetcher.config().bridge_timeout();

        for url in self.bridge_urls(username) {
            match self.ctx.fetcher.parse_url_with_timeout(&url, timeout).await {
                Some(feed) if !feed.items.is_empty() => {
                    info!("Fetched X feed for @{} from {}", username, url);
                    return Some(feed);
                }
                _ => debug!("Bridge {} failed for @{}, trying next", url, username),
            }
        }

        None
    }
}

#[async_trait]
impl SourceAdapter for XFeedSource {
    fn source_type(&self) -> SourceType {
        SourceType::X
    }

    async fn fetch_stories(
        &self,
        source_url: &str,
        display_name: Option<&str>,
        priority: i32,
    ) -> Vec<Story> {
        let Some(username) = extract_x_username(source_url) else {
            warn!("Could not extract username from X URL: {}", source_url);
            return Vec::new();
        };

        let Some(parsed) = self.fetch_from_bridges(&username).await else {
            warn!("All RSS bridges failed for @{}", username);
            return Vec::new();
        };

        let label = configured_label(display_name).unwrap_or_else(|| format!("@{}", username));
        let recent = parser::filter_recent(&parsed.items, WINDOW_HOURS, Utc::now());

        let mut stories = Vec::new();
        for item in recent.into_iter().take(MAX_ITEMS) {
            let raw = if item.content.is_empty() {
                &item.content_snippet
            } else {
                &item.content
            };
            let content = text::truncate_chars(&text::html_to_lines(raw), CONTENT_CHARS);
            if content.is_empty() {
                continue;
            }

            let item_title = if item.title == UNTITLED { "" } else { item.title.as_str() };
            let head = if item_title.is_empty() { content.as_str() } else { item_title };
            if is_retweet(head) && !has_commentary(item_title) {
                debug!("Skipping retweet from @{}: {}", username, item.link);
                continue;
            }

            stories.push(Story {
                title: tweet_title(&content),
                summary: text::truncate_chars(&text::collapse_whitespace(&content), SUMMARY_CHARS),
                url: canonical_tweet_url(&item.link),
                published_at: item.published_at,
                source_label: label.clone(),
                topic: Some(self.ctx.classifier.classify(&content)),
                priority,
            });
        }

        info!("Pulled {} stories for @{}", stories.len(), username);
        stories
    }
}
