use crate::types::{AggregatorError, Result};
use crate::utils::text;
use chrono::{DateTime, Duration, Utc};
use feed_rs::parser;
use std::collections::HashSet;
use tracing::debug;

pub use crate::types::{ParsedFeed, RawFeedItem};

const SNIPPET_CHARS: usize = 300;

/// Title given to feeds that do not name themselves.
pub const UNKNOWN_FEED_TITLE: &str = "Unknown Feed";
/// Title given to entries without one.
pub const UNTITLED: &str = "Untitled";

/// Parse an RSS/Atom/JSON feed document. Missing per-item fields get safe
/// defaults; a malformed document fails as a whole.
pub fn parse_feed(content: &str, feed_url: &str) -> Result<ParsedFeed> {
    debug!("Parsing feed content ({} bytes)", content.len());

    let feed = parser::parse(content.as_bytes())
        .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed {}: {}", feed_url, e)))?;

    let fetched_at = Utc::now();

    let title = feed
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_FEED_TITLE.to_string());
    let description = feed.description.map(|d| d.content).unwrap_or_default();
    let link = feed
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_else(|| feed_url.to_string());

    let items = feed
        .entries
        .into_iter()
        .map(|entry| parse_entry(entry, fetched_at))
        .collect();

    Ok(ParsedFeed {
        title,
        description,
        link,
        items,
    })
}

fn parse_entry(entry: feed_rs::model::Entry, fetched_at: DateTime<Utc>) -> RawFeedItem {
    let title = entry
        .title
        .map(|t| text::collapse_whitespace(&t.content))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();

    let published_at = entry.published.or(entry.updated).unwrap_or(fetched_at);

    let content = entry
        .content
        .and_then(|c| c.body)
        .unwrap_or_default();

    let summary = entry.summary.map(|s| s.content).unwrap_or_default();

    // Prefer the feed's own summary; fall back to the head of the body.
    let content_snippet = if !summary.trim().is_empty() {
        text::strip_html(&summary)
    } else {
        text::truncate_chars(&text::strip_html(&content), SNIPPET_CHARS)
    };

    // Keep the summary around as content when the feed has no body.
    let content = if content.is_empty() { summary } else { content };

    let creator = entry.authors.first().map(|a| a.name.clone());
    let categories = entry.categories.into_iter().map(|c| c.term).collect();

    RawFeedItem {
        title,
        link,
        published_at,
        content,
        content_snippet,
        creator,
        categories,
    }
}

/// Keep items published at or after `now - hours`.
pub fn filter_recent(items: &[RawFeedItem], hours: i64, now: DateTime<Utc>) -> Vec<RawFeedItem> {
    let cutoff = now - Duration::hours(hours);
    items
        .iter()
        .filter(|item| item.published_at >= cutoff)
        .cloned()
        .collect()
}

/// Drop repeats of (case-insensitive title, exact link). First one wins.
pub fn deduplicate_items(items: &[RawFeedItem]) -> Vec<RawFeedItem> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique_items = Vec::with_capacity(items.len());

    for item in items {
        if seen.insert((item.title.trim().to_lowercase(), item.link.clone())) {
            unique_items.push(item.clone());
        } else {
            debug!("Removing duplicate item: {} ({})", item.title, item.link);
        }
    }

    unique_items
}

/// Cheap sniff for whether a body looks like a syndication document.
pub fn is_valid_feed_content(content: &str) -> bool {
    let content_lower = content.to_lowercase();
    content_lower.contains("<rss")
        || content_lower.contains("<feed")
        || content_lower.contains("<rdf:rdf")
        || content_lower.contains("<channel")
        || (content_lower.trim_start().starts_with('{') && content_lower.contains("jsonfeed"))
}
