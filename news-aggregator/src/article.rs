use crate::fetcher::Fetcher;
use crate::utils::{text, time};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use ::scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const MAX_CONTENT_CHARS: usize = 5000;

/// Subtrees that never hold article text.
const NOISE_SELECTORS: &str = "script, style, noscript, nav, footer, header, aside, .advertisement, .ad, .sidebar";

/// Candidate content containers, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".content",
    "main",
];

const KEY_PHRASES: &[&str] = &[
    "announced",
    "launched",
    "raised",
    "revealed",
    "discovered",
    "developed",
    "according to",
];

static RE_SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static RE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"".*""#).unwrap());

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrapedArticle {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
}

impl ScrapedArticle {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_date.as_deref().and_then(time::parse_datetime)
    }
}

/// Fetches arbitrary article pages and pulls readable fields out of them.
pub struct ArticleScraper {
    fetcher: Arc<Fetcher>,
}

impl ArticleScraper {
    pub fn new(fetcher: Arc<Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Returns `None` on any fetch failure, including non-2xx responses.
    pub async fn scrape(&self, url: &str) -> Option<ScrapedArticle> {
        match self.fetcher.fetch_page(url).await {
            Ok(html) => {
                let article = extract_article(&html);
                debug!(
                    "Scraped {}: title={:?}, {} content chars",
                    url,
                    article.title,
                    article.content.chars().count()
                );
                Some(article)
            }
            Err(e) => {
                warn!(url, error = %e, "Failed to scrape article");
                None
            }
        }
    }
}

/// Pure extraction over an HTML document.
pub fn extract_article(html: &str) -> ScrapedArticle {
    let mut document = Html::parse_document(html);
    remove_noise(&mut document);

    let title = first_text(&document, "h1")
        .or_else(|| meta_content(&document, "meta[property=\"og:title\"]"))
        .or_else(|| first_text(&document, "title"))
        .unwrap_or_default();

    let content = CONTENT_SELECTORS
        .iter()
        .find_map(|css| first_text(&document, css))
        .or_else(|| first_text(&document, "body"))
        .unwrap_or_default();
    let content = text::truncate_chars(&content, MAX_CONTENT_CHARS);

    let author = meta_content(&document, "meta[name=\"author\"]")
        .or_else(|| first_text(&document, "[rel=\"author\"]"))
        .or_else(|| first_text(&document, ".author"));

    let published_date = meta_content(&document, "meta[property=\"article:published_time\"]")
        .or_else(|| attr_value(&document, "time[datetime]", "datetime"))
        .or_else(|| meta_content(&document, "meta[name=\"date\"]"));

    let description = meta_content(&document, "meta[property=\"og:description\"]")
        .or_else(|| meta_content(&document, "meta[name=\"description\"]"));

    ScrapedArticle {
        title,
        content,
        author,
        published_date,
        description,
    }
}

fn remove_noise(document: &mut Html) {
    let Ok(selector) = Selector::parse(NOISE_SELECTORS) else {
        return;
    };
    let noisy: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in noisy {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    text::collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

fn attr_value(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    attr_value(document, css, "content")
}

fn sentences(content: &str) -> impl Iterator<Item = &str> {
    RE_SENTENCE_END.split(content).map(str::trim)
}

/// Pick the sentences most likely to carry facts: numbers, quotes, key verbs.
pub fn extract_key_points(content: &str, max_points: usize) -> Vec<String> {
    let mut scored: Vec<(&str, u32)> = sentences(content)
        .filter(|s| s.len() > 30 && s.len() < 300)
        .map(|sentence| {
            let lower = sentence.to_lowercase();
            let mut score = 0;
            if sentence.chars().any(|c| c.is_ascii_digit()) {
                score += 2;
            }
            if RE_QUOTED.is_match(sentence) {
                score += 1;
            }
            if KEY_PHRASES.iter().any(|p| lower.contains(p)) {
                score += 2;
            }
            if sentence.len() > 50 && sentence.len() < 150 {
                score += 1;
            }
            (sentence, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(max_points)
        .map(|(s, _)| s.to_string())
        .collect()
}

/// Leading sentences of `content` that fit in `max_length` bytes.
pub fn generate_summary(content: &str, max_length: usize) -> String {
    let mut summary = String::new();
    for sentence in sentences(content).filter(|s| s.len() > 20) {
        if summary.len() + sentence.len() > max_length {
            break;
        }
        summary.push_str(sentence);
        summary.push_str(". ");
    }
    summary.trim().to_string()
}
