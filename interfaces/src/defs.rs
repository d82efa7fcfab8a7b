use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Amount added to a story's priority when it matches one of the user's topics.
pub const TOPIC_BOOST: i32 = 2;

/// Label used when no topic keyword matches.
pub const GENERAL_TOPIC: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source_label: String,
    pub topic: Option<String>,
    pub priority: i32,
}

impl Story {
    /// Key used for cross-source deduplication.
    pub fn title_key(&self) -> String {
        self.title.trim().to_lowercase()
    }

    pub fn topic_or_general(&self) -> &str {
        self.topic.as_deref().unwrap_or(GENERAL_TOPIC)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Rss,
    Reddit,
    X,
    Linkedin,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Rss => "rss",
            SourceType::Reddit => "reddit",
            SourceType::X => "x",
            SourceType::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = anyhow::Error;

    // Older rows in the sources table use the `*_account` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rss" => Ok(SourceType::Rss),
            "reddit" => Ok(SourceType::Reddit),
            "x" | "x_account" | "twitter" => Ok(SourceType::X),
            "linkedin" | "linkedin_account" => Ok(SourceType::Linkedin),
            other => Err(anyhow::anyhow!("unknown source type: {other}")),
        }
    }
}

fn default_priority() -> i32 {
    3
}

fn default_active() -> bool {
    true
}

/// A user's configured news source. Owned by the settings layer; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub source_type: SourceType,
    pub url: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl SourceConfig {
    pub fn new(source_type: SourceType, url: impl Into<String>, priority: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_type,
            url: url.into(),
            display_name: None,
            priority,
            is_active: true,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    X,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linkedin => f.write_str("linkedin"),
            Platform::X => f.write_str("x"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAnalysis {
    pub avg_sentence_length: Option<f64>,
    pub vocabulary_level: Option<String>,
    pub question_usage: Option<String>,
    pub humor_level: Option<String>,
    pub structure_preference: Option<String>,
    pub emoji_usage: Option<String>,
    #[serde(default)]
    pub common_phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTypeRating {
    #[serde(rename = "type")]
    pub post_type: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub job_description: Option<String>,
    #[serde(default)]
    pub primary_topics: Vec<String>,
    #[serde(default)]
    pub avoid_topics: Vec<String>,
    pub tone_primary: Option<String>,
    pub tone_secondary: Option<String>,
    #[serde(default)]
    pub post_type_ratings: Vec<PostTypeRating>,
    pub voice_analysis: Option<VoiceAnalysis>,
}

/// Supplies the snapshot of a user's sources for one aggregation run.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn sources_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<SourceConfig>>;
}

/// Opaque text-completion service: prompt in, text out.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn model_name(&self) -> String;

    async fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> anyhow::Result<String>;
}
