//! Prompt text for the drafting model. Pure string builders over a
//! [`Story`] and the user's [`VoiceProfile`].

use crate::types::{Platform, Story, VoiceAnalysis, VoiceProfile, GENERAL_TOPIC};

const DEFAULT_VOICE: &str = "Write in a professional yet approachable tone.";
const DEFAULT_BACKGROUND: &str = "A professional in their field";
const DEFAULT_POST_TYPES: &str = "news_commentary, hot_take";
const NO_EM_DASH: &str =
    "NEVER use em dashes (\u{2014}) anywhere in the content. Use commas, periods, or other punctuation instead.";

/// Turn measured writing habits into short style instructions.
pub fn build_voice_guidelines(analysis: Option<&VoiceAnalysis>) -> String {
    let Some(analysis) = analysis else {
        return DEFAULT_VOICE.to_string();
    };

    let mut guidelines: Vec<String> = Vec::new();

    if let Some(length) = analysis.avg_sentence_length.filter(|l| *l > 0.0) {
        let line = if length < 12.0 {
            "Use short, punchy sentences."
        } else if length > 20.0 {
            "Use longer, more complex sentences."
        } else {
            "Use moderate sentence lengths."
        };
        guidelines.push(line.to_string());
    }

    match analysis.vocabulary_level.as_deref() {
        Some("advanced") => guidelines.push("Use sophisticated vocabulary and industry jargon.".into()),
        Some("simple") => guidelines.push("Use simple, accessible language.".into()),
        _ => {}
    }

    if analysis.question_usage.as_deref() == Some("high") {
        guidelines.push("Include rhetorical questions to engage readers.".into());
    }

    match analysis.humor_level.as_deref() {
        Some("frequent") => guidelines.push("Include wit and humor where appropriate.".into()),
        Some("subtle") => guidelines.push("Add subtle humor or clever observations.".into()),
        _ => {}
    }

    match analysis.structure_preference.as_deref() {
        Some("bullets") => guidelines.push("Use bullet points and lists for structure.".into()),
        Some("paragraphs") => guidelines.push("Use flowing paragraphs rather than lists.".into()),
        _ => {}
    }

    match analysis.emoji_usage.as_deref() {
        Some("frequent") => guidelines.push("Include relevant emojis.".into()),
        Some("none") => guidelines.push("Avoid using emojis.".into()),
        _ => {}
    }

    if !analysis.common_phrases.is_empty() {
        guidelines.push(format!(
            "Consider using phrases like: {}",
            analysis.common_phrases.join(", ")
        ));
    }

    if guidelines.is_empty() {
        return DEFAULT_VOICE.to_string();
    }
    guidelines.join(" ")
}

fn background(profile: &VoiceProfile) -> &str {
    profile
        .job_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_BACKGROUND)
}

/// Post types the user rated 4 or 5.
fn preferred_post_types(profile: &VoiceProfile) -> String {
    let preferred: Vec<&str> = profile
        .post_type_ratings
        .iter()
        .filter(|r| r.rating >= 4)
        .map(|r| r.post_type.as_str())
        .collect();
    if preferred.is_empty() {
        DEFAULT_POST_TYPES.to_string()
    } else {
        preferred.join(", ")
    }
}

pub fn build_linkedin_prompt(story: &Story, profile: &VoiceProfile) -> String {
    let voice = build_voice_guidelines(profile.voice_analysis.as_ref());
    let tone_primary = profile.tone_primary.as_deref().unwrap_or("professional");
    let tone_secondary = profile.tone_secondary.as_deref().unwrap_or("conversational");

    format!(
        r#"You are writing a LinkedIn post for someone with this background:
"{background}"

VOICE PROFILE:
- Topics of interest: {topics}
- Topics to avoid: {avoid}
- Tone preferences: Primary: {tone_primary}, Secondary: {tone_secondary}
- Preferred post types: {post_types}
- Voice guidelines: {voice}

NEWS STORY TO COMMENT ON:
Title: {title}
Summary: {summary}
URL: {url}
Topic: {topic}

LINKEDIN BEST PRACTICES:
- Length: 1300-2000 characters (optimal for engagement)
- Hook: First 2 lines must grab attention (appears before "see more")
- Formatting: Use line breaks every 1-2 sentences for readability
- Hashtags: Include 3-5 relevant hashtags at the end
- Engagement: End with a question or call-to-action

REQUIREMENTS:
1. Write in this person's authentic voice (match their patterns and style)
2. Choose ONE post type from their preferences
3. Match their tone blend
4. Include specific insights from the story (don't just summarize)
5. Add YOUR perspective: what's the implication? What's the insight?
6. Make it engaging for professionals in this space
7. Do NOT use the phrase "hot take" or explicitly label the post type
8. {no_em_dash}

Generate a LinkedIn post that sounds like THEM, not generic AI writing. Return ONLY the post content, no explanations."#,
        background = background(profile),
        topics = profile.primary_topics.join(", "),
        avoid = profile.avoid_topics.join(", "),
        post_types = preferred_post_types(profile),
        title = story.title,
        summary = story.summary,
        url = story.url,
        topic = story.topic.as_deref().unwrap_or(GENERAL_TOPIC),
        no_em_dash = NO_EM_DASH,
    )
}

/// Asks for a JSON reply: `{"isThread", "content", "threadBreakdown"}`.
pub fn build_x_prompt(story: &Story, profile: &VoiceProfile) -> String {
    let voice = build_voice_guidelines(profile.voice_analysis.as_ref());
    let tone = profile.tone_primary.as_deref().unwrap_or("conversational");

    format!(
        r#"You are writing X (Twitter) content for someone with this background:
"{background}"

VOICE PROFILE:
- Topics of interest: {topics}
- Topics to avoid: {avoid}
- Tone: {tone}
- Voice guidelines: {voice}

NEWS STORY:
Title: {title}
Summary: {summary}
URL: {url}

X BEST PRACTICES:
- Standalone tweet: 100-250 characters, punchy and direct
- Thread: 5-10 tweets max, first tweet must work standalone
- Formatting: Short sentences, line breaks for impact
- For threads: Use "1/7" format numbering
- Ending: Strong CTA or provocative question

REQUIREMENTS:
1. Decide: standalone tweet OR thread based on story complexity
2. If thread: Hook in first tweet, expand in subsequent tweets
3. Be punchier and faster-paced than LinkedIn
4. Can be more provocative/contrarian
5. Match their voice but adapt for X's culture
6. {no_em_dash}

Return JSON:
{{
  "isThread": boolean,
  "content": "full text for standalone OR first tweet",
  "threadBreakdown": ["tweet 1", "tweet 2", ...] (only if thread, include all tweets)
}}

Return ONLY valid JSON, no other text."#,
        background = background(profile),
        topics = profile.primary_topics.join(", "),
        avoid = profile.avoid_topics.join(", "),
        title = story.title,
        summary = story.summary,
        url = story.url,
        no_em_dash = NO_EM_DASH,
    )
}

/// Free-form post about a topic the user typed in, not tied to a story.
pub fn build_quick_post_prompt(topic: &str, profile: &VoiceProfile, platform: Platform) -> String {
    let voice = build_voice_guidelines(profile.voice_analysis.as_ref());
    let background = profile
        .job_description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("A professional");

    let (target, platform_guidelines, return_shape) = match platform {
        Platform::Linkedin => (
            "a LinkedIn post",
            "Write a professional LinkedIn post (1300-2000 characters). Use line breaks, include 3-5 hashtags, end with engagement hook.",
            "",
        ),
        Platform::X => (
            "an X post",
            "Write for X/Twitter. Keep it punchy (under 280 characters for single tweet, or create a thread for complex topics).",
            " as JSON with isThread, content, and threadBreakdown fields",
        ),
    };

    format!(
        r#"You are writing {target} for:
"{background}"

TOPIC/IDEA: {topic}

VOICE GUIDELINES: {voice}

PLATFORM GUIDELINES: {platform_guidelines}

IMPORTANT: {no_em_dash}

Write content that sounds authentic to this person's voice. Return only the post content{return_shape}."#,
        no_em_dash = NO_EM_DASH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostTypeRating;
    use chrono::Utc;

    fn story() -> Story {
        Story {
            title: "Chipmaker unveils 2nm node".to_string(),
            summary: "A new process node promises big efficiency gains.".to_string(),
            url: "https://example.com/chips".to_string(),
            published_at: Utc::now(),
            source_label: "Example".to_string(),
            topic: None,
            priority: 3,
        }
    }

    #[test]
    fn missing_analysis_uses_default_voice() {
        assert_eq!(build_voice_guidelines(None), DEFAULT_VOICE);
    }

    #[test]
    fn voice_guidelines_follow_analysis() {
        let analysis = VoiceAnalysis {
            avg_sentence_length: Some(8.0),
            emoji_usage: Some("none".to_string()),
            common_phrases: vec!["ship it".to_string()],
            ..Default::default()
        };
        let text = build_voice_guidelines(Some(&analysis));
        assert!(text.starts_with("Use short, punchy sentences."));
        assert!(text.contains("Avoid using emojis."));
        assert!(text.contains("Consider using phrases like: ship it"));
    }

    #[test]
    fn linkedin_prompt_carries_story_and_preferences() {
        let profile = VoiceProfile {
            job_description: Some("Hardware founder".to_string()),
            post_type_ratings: vec![
                PostTypeRating { post_type: "hot_take".to_string(), rating: 5 },
                PostTypeRating { post_type: "poll".to_string(), rating: 2 },
            ],
            ..Default::default()
        };
        let prompt = build_linkedin_prompt(&story(), &profile);
        assert!(prompt.contains("\"Hardware founder\""));
        assert!(prompt.contains("Title: Chipmaker unveils 2nm node"));
        assert!(prompt.contains("Topic: General"));
        assert!(prompt.contains("Preferred post types: hot_take\n"));
    }

    #[test]
    fn x_prompt_requests_json() {
        let prompt = build_x_prompt(&story(), &VoiceProfile::default());
        assert!(prompt.contains("\"isThread\": boolean"));
        assert!(prompt.contains(DEFAULT_BACKGROUND));
    }

    #[test]
    fn quick_prompt_varies_by_platform() {
        let profile = VoiceProfile::default();
        let linkedin = build_quick_post_prompt("robot arms", &profile, Platform::Linkedin);
        let x = build_quick_post_prompt("robot arms", &profile, Platform::X);
        assert!(linkedin.contains("a LinkedIn post"));
        assert!(!linkedin.contains("as JSON"));
        assert!(x.contains("an X post"));
        assert!(x.ends_with("threadBreakdown fields."));
    }
}
