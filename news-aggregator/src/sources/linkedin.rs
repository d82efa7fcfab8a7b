//! LinkedIn is mostly behind a login. Newsletters publish RSS and Pulse
//! articles render publicly; company pages and profiles are not readable.

use crate::article::ArticleScraper;
use crate::parser::{self, UNKNOWN_FEED_TITLE};
use crate::sources::{configured_label, SourceContext};
use crate::traits::SourceAdapter;
use crate::types::{SourceType, Story};
use crate::utils::text;
use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{info, warn};

const NEWSLETTER_WINDOW_HOURS: i64 = 168;
const MAX_ITEMS: usize = 10;
const SUMMARY_CHARS: usize = 500;

static RE_LINKEDIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://(?:www\.)?linkedin\.com").unwrap());
static RE_NEWSLETTER_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/newsletters/([^/?#]+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedInUrlType {
    Newsletter,
    Article,
    Company,
    Profile,
    Unknown,
}

impl fmt::Display for LinkedInUrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkedInUrlType::Newsletter => "newsletter",
            LinkedInUrlType::Article => "article",
            LinkedInUrlType::Company => "company",
            LinkedInUrlType::Profile => "profile",
            LinkedInUrlType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

pub fn is_linkedin_url(url: &str) -> bool {
    RE_LINKEDIN.is_match(url.trim())
}

pub fn linkedin_url_type(url: &str) -> LinkedInUrlType {
    let lowered = url.to_lowercase();
    if lowered.contains("linkedin.com/newsletters/") {
        LinkedInUrlType::Newsletter
    } else if lowered.contains("linkedin.com/pulse/") {
        LinkedInUrlType::Article
    } else if lowered.contains("linkedin.com/company/") {
        LinkedInUrlType::Company
    } else if lowered.contains("linkedin.com/in/") {
        LinkedInUrlType::Profile
    } else {
        LinkedInUrlType::Unknown
    }
}

/// Newsletters expose their feed at `/newsletters/<slug>/feed`.
pub fn to_linkedin_newsletter_rss(url: &str) -> Option<String> {
    RE_NEWSLETTER_SLUG
        .captures(url)
        .map(|caps| format!("https://www.linkedin.com/newsletters/{}/feed", &caps[1]))
}

/// Whether a LinkedIn URL is readable without a login, with the reason if not.
pub fn can_scrape_linkedin_url(url: &str) -> Result<(), String> {
    match linkedin_url_type(url) {
        LinkedInUrlType::Newsletter | LinkedInUrlType::Article => Ok(()),
        LinkedInUrlType::Company => Err("Company pages require LinkedIn authentication".to_string()),
        LinkedInUrlType::Profile => Err("Profile pages require LinkedIn authentication".to_string()),
        LinkedInUrlType::Unknown => Err("URL type not recognized".to_string()),
    }
}

pub struct LinkedInSource {
    ctx: SourceContext,
    scraper: ArticleScraper,
}

impl LinkedInSource {
    pub fn new(ctx: SourceContext) -> Self {
        let scraper = ArticleScraper::new(ctx.fetcher.clone());
        Self { ctx, scraper }
    }

    async fn newsletter_stories(
        &self,
        source_url: &str,
        display_name: Option<&str>,
        priority: i32,
    ) -> Vec<Story> {
        let Some(rss_url) = to_linkedin_newsletter_rss(source_url) else {
            warn!("Could not convert LinkedIn newsletter URL to RSS: {}", source_url);
            return Vec::new();
        };

        let Some(parsed) = self.ctx.fetcher.parse_url(&rss_url).await else {
            warn!("Failed to parse LinkedIn newsletter feed: {}", rss_url);
            return Vec::new();
        };

        let label = configured_label(display_name).unwrap_or_else(|| {
            if parsed.title != UNKNOWN_FEED_TITLE {
                parsed.title.clone()
            } else {
                "LinkedIn Newsletter".to_string()
            }
        });

        parser::filter_recent(&parsed.items, NEWSLETTER_WINDOW_HOURS, Utc::now())
            .into_iter()
            .take(MAX_ITEMS)
            .map(|item| {
                let raw = if item.content_snippet.is_empty() {
                    &item.content
                } else {
                    &item.content_snippet
                };
                let summary = text::truncate_chars(&text::strip_html(raw), SUMMARY_CHARS);
                let topic = self
                    .ctx
                    .classifier
                    .classify(&format!("{} {}", item.title, summary));

                Story {
                    title: item.title,
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

    async fn article_story(
        &self,
        source_url: &str,
        display_name: Option<&str>,
        priority: i32,
    ) -> Option<Story> {
        let scraped = self.scraper.scrape(source_url).await?;
        if scraped.title.trim().is_empty() {
            warn!("LinkedIn article has no title: {}", source_url);
            return None;
        }

        let summary = scraped
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| text::truncate_chars(&scraped.content, SUMMARY_CHARS));
        let published_at = scraped.published_at().unwrap_or_else(Utc::now);
        let label = configured_label(display_name)
            .or_else(|| scraped.author.clone().filter(|a| !a.trim().is_empty()))
            .unwrap_or_else(|| "LinkedIn".to_string());
        let topic = self
            .ctx
            .classifier
            .classify(&format!("{} {}", scraped.title, scraped.content));

        Some(Story {
            title: scraped.title,
            summary,
            url: source_url.to_string(),
            published_at,
            source_label: label,
            topic: Some(topic),
            priority,
        })
    }
}

#[async_trait]
impl SourceAdapter for LinkedInSource {
    fn source_type(&self) -> SourceType {
        SourceType::Linkedin
    }

    async fn fetch_stories(
        &self,
        source_url: &str,
        display_name: Option<&str>,
        priority: i32,
    ) -> Vec<Story> {
        let url_type = linkedin_url_type(source_url);
        info!("Pulling LinkedIn {}: {}", url_type, source_url);

        match url_type {
            LinkedInUrlType::Newsletter => {
                self.newsletter_stories(source_url, display_name, priority).await
            }
            LinkedInUrlType::Article => self
                .article_story(source_url, display_name, priority)
                .await
                .into_iter()
                .collect(),
            LinkedInUrlType::Company | LinkedInUrlType::Profile | LinkedInUrlType::Unknown => {
                if let Err(reason) = can_scrape_linkedin_url(source_url) {
                    warn!(url = source_url, %url_type, "Unsupported LinkedIn source: {}", reason);
                }
                Vec::new()
            }
        }
    }
}
