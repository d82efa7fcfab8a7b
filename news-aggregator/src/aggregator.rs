use crate::config::Settings;
use crate::fetcher::Fetcher;
use crate::selector;
use crate::sources::{LinkedInSource, RedditSource, RssFeedSource, SourceContext, XFeedSource};
use crate::traits::SourceAdapter;
use crate::types::{AggregatorConfig, SourceConfig, SourceProvider, SourceType, Story};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// One adapter per source kind.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<SourceType, Arc<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four built-in adapters sharing one fetcher and classifier.
    pub fn with_defaults(ctx: SourceContext) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RssFeedSource::new(ctx.clone())));
        registry.register(Arc::new(RedditSource::new(ctx.clone())));
        registry.register(Arc::new(XFeedSource::new(ctx.clone())));
        registry.register(Arc::new(LinkedInSource::new(ctx)));
        registry
    }

    /// Install an adapter, replacing any previous one for the same kind.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.insert(adapter.source_type(), adapter)
    }

    pub fn get(&self, source_type: SourceType) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(&source_type).cloned()
    }
}

pub struct NewsAggregator {
    registry: Arc<AdapterRegistry>,
    provider: Arc<dyn SourceProvider>,
    config: AggregatorConfig,
}

impl NewsAggregator {
    pub fn new(
        registry: AdapterRegistry,
        provider: Arc<dyn SourceProvider>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            provider,
            config,
        }
    }

    /// Default adapters over `fetcher`.
    pub fn with_fetcher(
        fetcher: Arc<Fetcher>,
        provider: Arc<dyn SourceProvider>,
        config: AggregatorConfig,
    ) -> Self {
        Self::new(
            AdapterRegistry::with_defaults(SourceContext::new(fetcher)),
            provider,
            config,
        )
    }

    /// Default adapters over `fetcher`, tuned by environment settings.
    pub fn with_settings(
        fetcher: Arc<Fetcher>,
        provider: Arc<dyn SourceProvider>,
        settings: &Settings,
    ) -> Self {
        let ctx = SourceContext::new(fetcher).with_config(settings.adapters.clone());
        Self::new(
            AdapterRegistry::with_defaults(ctx),
            provider,
            settings.aggregator.clone(),
        )
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Today's ranked stories for one user. Never fails: a provider error is
    /// logged and yields an empty list.
    pub async fn aggregate(&self, user_id: Uuid) -> Vec<Story> {
        match self.provider.sources_for_user(user_id).await {
            Ok(sources) => self.aggregate_sources(&sources).await,
            Err(e) => {
                error!(%user_id, error = %e, "Failed to load sources");
                Vec::new()
            }
        }
    }

    /// [`aggregate`](Self::aggregate), then boosted towards `topics`.
    pub async fn aggregate_for_topics(&self, user_id: Uuid, topics: &[String]) -> Vec<Story> {
        let stories = self.aggregate(user_id).await;
        selector::boost_for_topics(&stories, topics)
    }

    pub async fn aggregate_sources(&self, sources: &[SourceConfig]) -> Vec<Story> {
        let active: Vec<SourceConfig> = sources.iter().filter(|s| s.is_active).cloned().collect();
        if active.is_empty() {
            info!("No active sources, nothing to aggregate");
            return Vec::new();
        }

        info!("Aggregating {} active sources", active.len());

        let mut tasks = JoinSet::new();
        for source in active {
            let Some(adapter) = self.registry.get(source.source_type) else {
                warn!("No adapter registered for {} source {}", source.source_type, source.url);
                continue;
            };
            tasks.spawn(async move {
                let stories = adapter
                    .fetch_stories(&source.url, source.display_name.as_deref(), source.priority)
                    .await;
                (source, stories)
            });
        }

        let collected = self.collect(&mut tasks).await;
        let total = collected.len();
        let stories = finalize(collected, self.config.max_stories);

        info!("Aggregated {} stories ({} before dedup and cap)", stories.len(), total);
        stories
    }

    /// Drain finished tasks in completion order until the set is empty or
    /// the deadline passes.
    async fn collect(&self, tasks: &mut JoinSet<(SourceConfig, Vec<Story>)>) -> Vec<Story> {
        let deadline = self.config.deadline.map(|d| Instant::now() + d);
        let mut stories = Vec::new();

        loop {
            let next = match deadline {
                Some(at) => match tokio::time::timeout_at(at, tasks.join_next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!("Aggregation deadline reached, abandoning {} sources", tasks.len());
                        tasks.abort_all();
                        break;
                    }
                },
                None => tasks.join_next().await,
            };

            match next {
                Some(Ok((source, fetched))) => {
                    debug!("{} source {} yielded {} stories", source.source_type, source.url, fetched.len());
                    stories.extend(fetched);
                }
                Some(Err(e)) => error!("Source task failed: {}", e),
                None => break,
            }
        }

        stories
    }
}

/// Dedup, rank, cap.
pub fn finalize(stories: Vec<Story>, max_stories: usize) -> Vec<Story> {
    let mut ranked = rank_stories(dedup_by_title(stories));
    ranked.truncate(max_stories);
    ranked
}

/// Keep the first story for each case-insensitive, trimmed title.
pub fn dedup_by_title(stories: Vec<Story>) -> Vec<Story> {
    let mut seen = HashSet::new();
    stories
        .into_iter()
        .filter(|story| seen.insert(story.title_key()))
        .collect()
}

/// Priority descending, then newest first. Stable, so full ties keep
/// their incoming order.
pub fn rank_stories(mut stories: Vec<Story>) -> Vec<Story> {
    stories.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    stories
}
