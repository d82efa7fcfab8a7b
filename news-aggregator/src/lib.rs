pub mod aggregator;
pub mod article;
pub mod config;
pub mod drafts;
pub mod fetcher;
pub mod llm_adapter;
pub mod parser;
pub mod prompts;
pub mod selector;
pub mod sources;
pub mod store;
pub mod topics;
pub mod traits;
pub mod types;
pub mod utils;

pub use types::*;
pub use aggregator::{AdapterRegistry, NewsAggregator};
pub use article::{ArticleScraper, ScrapedArticle};
pub use config::Settings;
pub use drafts::{DraftGenerator, Engagement, PostDraft};
pub use fetcher::{Fetcher, HttpClient, HttpResponse, ReqwestClient, RequestOptions};
pub use llm_adapter::{AnthropicAdapter, LlmAdapter, MockLlmAdapter};
pub use sources::{detect_source_type, SourceContext};
pub use store::{MemorySourceStore, PgSourceStore};
pub use topics::{categorize_topic, TopicClassifier};
pub use traits::SourceAdapter;
