//! Reddit serves RSS for any listing when `.rss` is appended to the path:
//! subreddits (`/r/technology.rss`), users (`/user/name.rss`), searches
//! (`/search.rss?q=AI`) and multis (`/r/tech+programming.rss`).

use crate::parser::{self, UNKNOWN_FEED_TITLE};
use crate::sources::{configured_label, SourceContext};
use crate::traits::SourceAdapter;
use crate::types::{SourceType, Story};
use crate::utils::text;
use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

const WINDOW_HOURS: i64 = 48;
const MAX_ITEMS: usize = 15;
const SUMMARY_CHARS: usize = 500;
const CANONICAL_HOST: &str = "https://www.reddit.com";

static RE_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:https?://)?(?:www\.|old\.)?reddit\.com").unwrap());
static RE_SUBREDDIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)reddit\.com/r/([^/?.\s]+)").unwrap());
static RE_USER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)reddit\.com/(?:user|u)/([^/?.\s]+)").unwrap());
static RE_SEARCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)reddit\.com/search").unwrap());
static RE_LEADING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[\w\s]+\]\s*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedditTargetKind {
    Subreddit,
    User,
    Search,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditTarget {
    pub kind: RedditTargetKind,
    pub name: String,
}

pub fn is_reddit_url(url: &str) -> bool {
    RE_HOST.is_match(url.trim())
}

/// Rewrite any Reddit listing URL to its RSS form on the canonical host.
/// Applying it twice gives the same result as applying it once.
pub fn to_reddit_rss_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let canonical = RE_HOST.replace(trimmed, CANONICAL_HOST);

    let (path, query) = match canonical.split_once('?') {
        Some((path, query)) => (path.trim_end_matches('/'), Some(query)),
        None => (canonical.as_ref(), None),
    };

    let path = if path.ends_with(".rss") {
        path.to_string()
    } else {
        format!("{}.rss", path)
    };

    match query {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    }
}

/// Work out what a Reddit URL points at, for labelling.
pub fn parse_reddit_url(url: &str) -> RedditTarget {
    if let Some(caps) = RE_SUBREDDIT.captures(url) {
        return RedditTarget {
            kind: RedditTargetKind::Subreddit,
            name: format!("r/{}", &caps[1]),
        };
    }
    if let Some(caps) = RE_USER.captures(url) {
        return RedditTarget {
            kind: RedditTargetKind::User,
            name: format!("u/{}", &caps[1]),
        };
    }
    if RE_SEARCH.is_match(url) {
        return RedditTarget {
            kind: RedditTargetKind::Search,
            name: "Reddit Search".to_string(),
        };
    }
    RedditTarget {
        kind: RedditTargetKind::Other,
        name: "Reddit".to_string(),
    }
}

/// Drop one leading `[OC]`-style tag and tidy whitespace.
pub fn clean_reddit_title(title: &str) -> String {
    let cleaned = text::collapse_whitespace(&RE_LEADING_TAG.replace(title.trim(), ""));
    if cleaned.is_empty() {
        text::collapse_whitespace(title)
    } else {
        cleaned
    }
}

pub struct RedditSource {
    ctx: SourceContext,
}

impl RedditSource {
    pub fn new(ctx: SourceContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl SourceAdapter for RedditSource {
    fn source_type(&self) -> SourceType {
        SourceType::Reddit
    }

    async fn fetch_stories(
        &self,
        source_url: &str,
        display_name: Option<&str>,
        priority: i32,
    ) -> Vec<Story> {
        let rss_url = to_reddit_rss_url(source_url);
        info!("Pulling Reddit feed: {}", rss_url);

        let Some(parsed) = self.ctx.fetcher.parse_url(&rss_url).await else {
            warn!("Failed to parse Reddit feed: {}", rss_url);
            return Vec::new();
        };

        let target = parse_reddit_url(source_url);
        let label = configured_label(display_name).unwrap_or_else(|| {
            if target.kind == RedditTargetKind::Other && parsed.title != UNKNOWN_FEED_TITLE {
                parsed.title.clone()
            } else {
                target.name.clone()
            }
        });

        let recent = parser::filter_recent(&parsed.items, WINDOW_HOURS, Utc::now());

        recent
            .into_iter()
            .take(MAX_ITEMS)
            .map(|item| {
                // Reddit puts the rendered post HTML in the body.
                let raw = if item.content.is_empty() {
                    &item.content_snippet
                } else {
                    &item.content
                };
                let summary = text::truncate_chars(&text::strip_html(raw), SUMMARY_CHARS);
                let title = clean_reddit_title(&item.title);
                let topic = self
                    .ctx
                    .classifier
                    .classify(&format!("{} {}", title, summary));

                Story {
                    title,
                    summary,
                    url: item.link,
                    published_at: item.published_at,
                    source_label: label.clone(),
                    topic: Some(topic),
                    priority,
                }
            })
            .collect()
    }
}
