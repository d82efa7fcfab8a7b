use crate::article::{self, ArticleScraper};
use crate::parser::{self, RawFeedItem};
use crate::sources::{configured_label, SourceContext};
use crate::traits::SourceAdapter;
use crate::types::{SourceType, Story};
use crate::utils::text;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info};

const WINDOW_HOURS: i64 = 48;
const MAX_ITEMS: usize = 10;
const SUMMARY_CHARS: usize = 300;

/// Generic RSS/Atom feed source. The configured URL is fetched as-is.
pub struct RssFeedSource {
    ctx: SourceContext,
    scraper: ArticleScraper,
}

impl RssFeedSource {
    pub fn new(ctx: SourceContext) -> Self {
        let scraper = ArticleScraper::new(ctx.fetcher.clone());
        Self { ctx, scraper }
    }

    fn to_story(&self, item: RawFeedItem, label: &str, priority: i32) -> Story {
        let snippet = if item.content_snippet.is_empty() {
            text::strip_html(&item.content)
        } else {
            text::strip_html(&item.content_snippet)
        };
        let topic = self
            .ctx
            .classifier
            .classify(&format!("{} {}", item.title, snippet));

        Story {
            title: item.title,
            summary: text::truncate_chars(&snippet, SUMMARY_CHARS),
            url: item.link,
            published_at: item.published_at,
            source_label: label.to_string(),
            topic: Some(topic),
            priority,
        }
    }

    /// Swap sparse summaries for the linked page's description.
    async fn enrich_sparse_summaries(&self, stories: &mut [Story]) {
        let min_chars = self.ctx.config.sparse_summary_chars;
        let sparse: Vec<usize> = stories
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.url.is_empty() && s.summary.chars().count() < min_chars)
            .map(|(i, _)| i)
            .collect();
        if sparse.is_empty() {
            return;
        }

        debug!("Enriching {} sparse summaries", sparse.len());
        let scraped = join_all(sparse.iter().map(|&i| self.scraper.scrape(&stories[i].url))).await;

        for (i, page) in sparse.into_iter().zip(scraped) {
            let Some(page) = page else { continue };
            let enriched = page
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| article::generate_summary(&page.content, SUMMARY_CHARS));
            if enriched.chars().count() > stories[i].summary.chars().count() {
                stories[i].summary = text::truncate_chars(&text::strip_html(&enriched), SUMMARY_CHARS);
            }
        }
    }
}

#[async_trait]
impl SourceAdapter for RssFeedSource {
    fn source_type(&self) -> SourceType {
        SourceType::Rss
    }

    async fn fetch_stories(
        &self,
        source_url: &str,
        display_name: Option<&str>,
        priority: i32,
    ) -> Vec<Story> {
        info!("Pulling RSS feed: {}", source_url);

        let Some(parsed) = self.ctx.fetcher.parse_url(source_url).await else {
            return Vec::new();
        };

        let label = configured_label(display_name).unwrap_or_else(|| parsed.title.clone());
        let recent = parser::filter_recent(&parsed.items, WINDOW_HOURS, Utc::now());

        let mut stories: Vec<Story> = parser::deduplicate_items(&recent)
            .into_iter()
            .take(MAX_ITEMS)
            .map(|item| self.to_story(item, &label, priority))
            .collect();

        if self.ctx.config.enrich_sparse_summaries {
            self.enrich_sparse_summaries(&mut stories).await;
        }

        info!("Pulled {} stories from RSS feed {}", stories.len(), source_url);
        stories
    }
}
