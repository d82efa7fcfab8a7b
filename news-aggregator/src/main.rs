use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use news_aggregator::{
    categorize_topic, detect_source_type, selector, AnthropicAdapter, ArticleScraper,
    DraftGenerator, Fetcher, LlmAdapter, MemorySourceStore, MockLlmAdapter, NewsAggregator,
    PgSourceStore, Settings, SourceProvider, Story, VoiceProfile,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-source news aggregation and story ranking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate stories from a JSON list of sources
    Aggregate {
        #[arg(long)]
        sources: PathBuf,
        /// Comma-separated topics to boost
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Aggregate a stored user's sources (needs DATABASE_URL)
    User {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the source type a URL would be stored as
    Detect { url: String },
    /// Print the topic label for a piece of text
    Categorize {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Scrape one article page
    Scrape { url: String },
    /// Aggregate, select for a voice profile and draft posts
    Draft {
        #[arg(long)]
        sources: PathBuf,
        /// Voice profile JSON
        #[arg(long)]
        profile: PathBuf,
        #[arg(long, default_value_t = selector::DEFAULT_SELECTION)]
        count: usize,
        /// Use the offline mock model instead of Anthropic
        #[arg(long)]
        mock: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("reading settings from the environment")?;

    match cli.command {
        Command::Aggregate { sources, topics, json } => {
            let user_id = Uuid::new_v4();
            let store = MemorySourceStore::load_json(&sources, user_id)
                .await
                .with_context(|| format!("loading sources from {}", sources.display()))?;
            let aggregator = build_aggregator(&settings, Arc::new(store))?;
            let stories = run(&aggregator, user_id, &topics).await;
            print_stories(&stories, json)?;
        }
        Command::User { user_id, topics, json } => {
            let Some(database_url) = settings.database_url.as_deref() else {
                bail!("DATABASE_URL must be set for the user command");
            };
            let store = PgSourceStore::connect(database_url)
                .await
                .context("connecting to Postgres")?;
            let aggregator = build_aggregator(&settings, Arc::new(store))?;
            let stories = run(&aggregator, user_id, &topics).await;
            print_stories(&stories, json)?;
        }
        Command::Detect { url } => {
            println!("{}", detect_source_type(&url));
        }
        Command::Categorize { text } => {
            println!("{}", categorize_topic(&text.join(" ")));
        }
        Command::Scrape { url } => {
            let fetcher = Arc::new(Fetcher::new(settings.fetch.clone())?);
            let Some(article) = ArticleScraper::new(fetcher).scrape(&url).await else {
                bail!("could not scrape {}", url);
            };
            println!("{}", serde_json::to_string_pretty(&article)?);
        }
        Command::Draft { sources, profile, count, mock } => {
            let user_id = Uuid::new_v4();
            let store = MemorySourceStore::load_json(&sources, user_id).await?;
            let profile: VoiceProfile = serde_json::from_str(
                &tokio::fs::read_to_string(&profile)
                    .await
                    .with_context(|| format!("reading {}", profile.display()))?,
            )?;

            let model: Arc<dyn LlmAdapter> = if mock {
                Arc::new(MockLlmAdapter::new("cli"))
            } else {
                let Some(key) = settings.anthropic_api_key.clone() else {
                    bail!("ANTHROPIC_API_KEY must be set, or pass --mock");
                };
                Arc::new(AnthropicAdapter::new(key, settings.anthropic_model.clone())?)
            };

            let aggregator = build_aggregator(&settings, Arc::new(store))?;
            let stories = aggregator.aggregate(user_id).await;
            let selected = selector::select_for_profile(&stories, &profile, count);
            info!("Selected {} of {} stories for drafting", selected.len(), stories.len());

            let drafts = DraftGenerator::new(model).drafts_for(&selected, &profile).await;
            println!("{}", serde_json::to_string_pretty(&drafts)?);
        }
    }

    Ok(())
}

fn build_aggregator(
    settings: &Settings,
    provider: Arc<dyn SourceProvider>,
) -> anyhow::Result<NewsAggregator> {
    let fetcher = Arc::new(Fetcher::new(settings.fetch.clone())?);
    Ok(NewsAggregator::with_settings(fetcher, provider, settings))
}

async fn run(aggregator: &NewsAggregator, user_id: Uuid, topics: &[String]) -> Vec<Story> {
    let stories = if topics.is_empty() {
        aggregator.aggregate(user_id).await
    } else {
        aggregator.aggregate_for_topics(user_id, topics).await
    };
    if stories.is_empty() {
        warn!("No stories aggregated");
    }
    stories
}

fn print_stories(stories: &[Story], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stories)?);
        return Ok(());
    }

    for (i, story) in stories.iter().enumerate() {
        println!(
            "{:>2}. [p{} | {}] {}\n    {} | {}\n    {}",
            i + 1,
            story.priority,
            story.topic_or_general(),
            story.title,
            story.source_label,
            story.published_at.format("%Y-%m-%d %H:%M"),
            story.url
        );
    }
    Ok(())
}
