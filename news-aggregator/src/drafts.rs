use crate::llm_adapter::LlmAdapter;
use crate::prompts;
use crate::types::{AggregatorError, Platform, Result, Story, VoiceProfile};
use crate::utils::text;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Max chars kept when the X reply is not the requested JSON.
const TWEET_CHARS: usize = 280;

static RE_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\d+\s+(lessons|tips|ways|reasons|things|steps)").unwrap());
static RE_HOT_TAKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)everyone('s| is)|unpopular opinion|controversial|here's the thing").unwrap()
});
static RE_DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)data|study|research|report|%|percent|statistics").unwrap());
static RE_STORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)years ago|my journey|i remember|story time|when i").unwrap());
static RE_ADVICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)advice|lesson|learned|mistake|don't|should|must").unwrap());
static RE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engagement {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub platform: Platform,
    pub content: String,
    pub thread_breakdown: Option<Vec<String>>,
    pub topic: String,
    pub post_type: String,
    pub tone: String,
    pub engagement: Engagement,
    pub source_story_url: String,
    pub source_story_title: String,
}

/// The JSON shape the X prompt asks for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XReply {
    #[serde(default)]
    pub is_thread: bool,
    pub content: String,
    #[serde(default)]
    pub thread_breakdown: Option<Vec<String>>,
}

/// Parse the model's X reply, tolerating a surrounding code fence.
pub fn parse_x_reply(response: &str) -> Option<XReply> {
    let trimmed = response.trim();
    let body = RE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    serde_json::from_str::<XReply>(body)
        .ok()
        .filter(|reply| !reply.content.trim().is_empty())
}

/// Guess which kind of post the model wrote. First matching rule wins.
pub fn infer_post_type(content: &str) -> &'static str {
    if content.matches('?').count() >= 2 {
        "poll"
    } else if RE_LIST.is_match(content) {
        "curated_list"
    } else if RE_HOT_TAKE.is_match(content) {
        "hot_take"
    } else if RE_DATA.is_match(content) {
        "data_analysis"
    } else if RE_STORY.is_match(content) {
        "personal_story"
    } else if RE_ADVICE.is_match(content) {
        "founder_advice"
    } else {
        "news_commentary"
    }
}

/// Rough engagement guess from length, hooks and topic fit.
pub fn predict_engagement(content: &str, topic: &str, profile: &VoiceProfile) -> Engagement {
    let mut score = 0.0_f32;
    let len = content.chars().count();

    if len > 1200 && len < 2000 {
        score += 1.0;
    }
    if content.contains('?') {
        score += 1.0;
    }

    let topic_lower = topic.to_lowercase();
    let on_topic = profile.primary_topics.iter().any(|t| {
        let t = t.to_lowercase();
        !t.is_empty() && (topic_lower.contains(&t) || t.contains(&topic_lower))
    });
    if on_topic {
        score += 1.0;
    }

    let first_line = content.lines().next().unwrap_or_default().chars().count();
    if first_line > 20 && first_line < 100 {
        score += 1.0;
    }
    if content.contains('#') {
        score += 0.5;
    }
    if content.split('\n').count() > 3 {
        score += 0.5;
    }

    if score >= 4.0 {
        Engagement::High
    } else if score >= 2.5 {
        Engagement::Medium
    } else {
        Engagement::Low
    }
}

/// Drafts LinkedIn and X posts for selected stories.
pub struct DraftGenerator {
    model: Arc<dyn LlmAdapter>,
}

impl DraftGenerator {
    pub fn new(model: Arc<dyn LlmAdapter>) -> Self {
        Self { model }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.model
            .complete(prompt, None)
            .await
            .map_err(|e| AggregatorError::Llm(e.to_string()))
    }

    pub async fn linkedin_draft(&self, story: &Story, profile: &VoiceProfile) -> Result<PostDraft> {
        let prompt = prompts::build_linkedin_prompt(story, profile);
        let content = self.complete(&prompt).await?;
        let topic = story.topic_or_general().to_string();

        Ok(PostDraft {
            platform: Platform::Linkedin,
            post_type: infer_post_type(&content).to_string(),
            tone: profile
                .tone_primary
                .clone()
                .unwrap_or_else(|| "professional".to_string()),
            engagement: predict_engagement(&content, &topic, profile),
            thread_breakdown: None,
            content,
            topic,
            source_story_url: story.url.clone(),
            source_story_title: story.title.clone(),
        })
    }

    /// Unparseable replies degrade to a single quick take of the raw text.
    pub async fn x_draft(&self, story: &Story, profile: &VoiceProfile) -> Result<PostDraft> {
        let prompt = prompts::build_x_prompt(story, profile);
        let response = self.complete(&prompt).await?;
        let topic = story.topic_or_general().to_string();

        let (content, thread_breakdown, post_type, engagement) = match parse_x_reply(&response) {
            Some(reply) => {
                let engagement = predict_engagement(&reply.content, &topic, profile);
                if reply.is_thread {
                    (reply.content, reply.thread_breakdown, "thread", engagement)
                } else {
                    (reply.content, None, "quick_take", engagement)
                }
            }
            None => {
                warn!("X reply for {:?} was not JSON, keeping raw text", story.title);
                (
                    text::truncate_chars(response.trim(), TWEET_CHARS),
                    None,
                    "quick_take",
                    Engagement::Medium,
                )
            }
        };

        Ok(PostDraft {
            platform: Platform::X,
            content,
            thread_breakdown,
            topic,
            post_type: post_type.to_string(),
            tone: "conversational".to_string(),
            engagement,
            source_story_url: story.url.clone(),
            source_story_title: story.title.clone(),
        })
    }

    /// Both platforms for every story, in story order. A failed draft is
    /// logged and skipped.
    pub async fn drafts_for(&self, stories: &[Story], profile: &VoiceProfile) -> Vec<PostDraft> {
        let mut drafts = Vec::with_capacity(stories.len() * 2);

        for (i, story) in stories.iter().enumerate() {
            match self.linkedin_draft(story, profile).await {
                Ok(draft) => drafts.push(draft),
                Err(e) => warn!("Failed to draft LinkedIn post for story {}: {}", i, e),
            }
            match self.x_draft(story, profile).await {
                Ok(draft) => drafts.push(draft),
                Err(e) => warn!("Failed to draft X post for story {}: {}", i, e),
            }
        }

        info!("Drafted {} posts from {} stories with {}", drafts.len(), stories.len(), self.model.model_name());
        drafts
    }

    /// A post about a free-form topic rather than a story.
    pub async fn quick_post(&self, topic: &str, profile: &VoiceProfile, platform: Platform) -> Result<String> {
        let prompt = prompts::build_quick_post_prompt(topic, profile, platform);
        self.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_type_rules_apply_in_order() {
        assert_eq!(infer_post_type("Is it? Or is it? Vote"), "poll");
        assert_eq!(infer_post_type("5 lessons from shipping hardware"), "curated_list");
        assert_eq!(infer_post_type("Unpopular opinion: the research is overrated"), "hot_take");
        assert_eq!(infer_post_type("A new study shows 40% growth"), "data_analysis");
        assert_eq!(infer_post_type("Ten years ago I started a lab"), "personal_story");
        assert_eq!(infer_post_type("You must ship faster"), "founder_advice");
        assert_eq!(infer_post_type("Big launch today at the expo"), "news_commentary");
    }

    #[test]
    fn x_reply_accepts_fenced_json() {
        let reply = parse_x_reply("```json\n{\"isThread\": false, \"content\": \"hello\"}\n```").unwrap();
        assert_eq!(reply.content, "hello");
        assert!(!reply.is_thread);
    }

    #[test]
    fn x_reply_rejects_prose() {
        assert!(parse_x_reply("Here is your tweet: hello").is_none());
        assert!(parse_x_reply("{\"isThread\": true, \"content\": \"  \"}").is_none());
    }

    #[test]
    fn engagement_rewards_hooks_and_topic_fit() {
        let profile = VoiceProfile {
            primary_topics: vec!["AI".to_string()],
            ..Default::default()
        };
        let content = "Why are robots learning so fast now?\nline\nline\nline #ai";
        assert_eq!(predict_engagement(content, "AI/ML", &profile), Engagement::High);
        assert_eq!(predict_engagement("ok", "Space", &profile), Engagement::Low);
    }
}
