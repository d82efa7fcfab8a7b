use chrono::Utc;
use interfaces::{SourceConfig, SourceType, Story, VoiceProfile, GENERAL_TOPIC};

#[test]
fn test_source_type_parses_legacy_names() {
    assert_eq!("rss".parse::<SourceType>().unwrap(), SourceType::Rss);
    assert_eq!(" Reddit ".parse::<SourceType>().unwrap(), SourceType::Reddit);
    assert_eq!("x_account".parse::<SourceType>().unwrap(), SourceType::X);
    assert_eq!("twitter".parse::<SourceType>().unwrap(), SourceType::X);
    assert_eq!("linkedin_account".parse::<SourceType>().unwrap(), SourceType::Linkedin);
    assert!("mastodon".parse::<SourceType>().is_err());

    assert_eq!(SourceType::Linkedin.to_string(), "linkedin");
    assert_eq!(serde_json::to_string(&SourceType::X).unwrap(), "\"x\"");
}

#[test]
fn test_source_config_defaults() {
    let config: SourceConfig =
        serde_json::from_str(r#"{"source_type": "rss", "url": "https://a.test/feed"}"#).unwrap();

    assert_eq!(config.priority, 3);
    assert!(config.is_active);
    assert!(config.display_name.is_none());

    let other: SourceConfig =
        serde_json::from_str(r#"{"source_type": "rss", "url": "https://a.test/feed"}"#).unwrap();
    assert_ne!(config.id, other.id);
}

#[test]
fn test_story_keys() {
    let story = Story {
        title: "  Big Launch Today ".to_string(),
        summary: String::new(),
        url: "https://a.test/1".to_string(),
        published_at: Utc::now(),
        source_label: "A".to_string(),
        topic: None,
        priority: 3,
    };

    assert_eq!(story.title_key(), "big launch today");
    assert_eq!(story.topic_or_general(), GENERAL_TOPIC);
}

#[test]
fn test_voice_profile_reads_camel_case() {
    let profile: VoiceProfile = serde_json::from_str(
        r#"{
            "jobDescription": "Robotics founder",
            "primaryTopics": ["robotics"],
            "tonePrimary": "direct",
            "postTypeRatings": [{"type": "hot_take", "rating": 4}],
            "voiceAnalysis": {"avgSentenceLength": 12.5, "commonPhrases": ["ship it"]}
        }"#,
    )
    .unwrap();

    assert_eq!(profile.primary_topics, vec!["robotics"]);
    assert!(profile.avoid_topics.is_empty());
    assert_eq!(profile.post_type_ratings[0].post_type, "hot_take");
    let analysis = profile.voice_analysis.unwrap();
    assert_eq!(analysis.avg_sentence_length, Some(12.5));
    assert_eq!(analysis.common_phrases, vec!["ship it"]);
}
