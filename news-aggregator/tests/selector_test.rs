mod common;

use chrono::{Duration, Utc};
use common::init_tracing;
use news_aggregator::selector::{boost_for_topics, filter_avoided, select_for_profile};
use news_aggregator::{
    DraftGenerator, Engagement, MockLlmAdapter, Platform, Story, VoiceProfile, TOPIC_BOOST,
};
use std::sync::Arc;
use tracing::info;

fn story(title: &str, topic: &str, priority: i32) -> Story {
    Story {
        title: title.to_string(),
        summary: format!("Summary of {}", title.to_lowercase()),
        url: format!("https://s.test/{}", title.len()),
        published_at: Utc::now() - Duration::hours(1),
        source_label: "S".to_string(),
        topic: Some(topic.to_string()),
        priority,
    }
}

#[tokio::test]
async fn test_boost_matches_topic_or_title() {
    let stories = vec![
        story("Funding roundup", "Funding", 4),
        story("Drones over the city", "Autonomous Systems", 3),
        story("Quantum chip news", "Semiconductors", 3),
    ];

    let boosted = boost_for_topics(&stories, &["autonomous".to_string(), "QUANTUM".to_string()]);

    let order: Vec<_> = boosted.iter().map(|s| (s.title.as_str(), s.priority)).collect();
    assert_eq!(
        order,
        vec![
            ("Drones over the city", 3 + TOPIC_BOOST),
            ("Quantum chip news", 3 + TOPIC_BOOST),
            ("Funding roundup", 4),
        ]
    );
    // Input is untouched.
    assert_eq!(stories[1].priority, 3);
}

#[tokio::test]
async fn test_boost_ignores_blank_topics_and_keeps_ties() {
    let stories = vec![
        story("First", "General", 3),
        story("Second", "General", 3),
    ];

    let boosted = boost_for_topics(&stories, &["".to_string(), "   ".to_string()]);
    assert_eq!(boosted, stories);
    assert!(boost_for_topics(&[], &["ai".to_string()]).is_empty());
}

#[tokio::test]
async fn test_boost_never_lowers_priority() {
    let stories = vec![
        story("Quantum at the limit", "Quantum", i32::MAX - 1),
        story("Quantum basics", "Quantum", -4),
        story("Unrelated", "General", 1),
    ];

    let boosted = boost_for_topics(&stories, &["quantum".to_string()]);

    assert_eq!(boosted[0].priority, i32::MAX);
    for original in &stories {
        let after = boosted.iter().find(|s| s.title == original.title).unwrap();
        assert!(after.priority >= original.priority);
    }
    assert_eq!(boosted.iter().find(|s| s.title == "Quantum basics").unwrap().priority, -2);
}

#[tokio::test]
async fn test_filter_avoided_checks_title_and_summary() {
    let stories = vec![
        story("Crypto crash", "Funding", 3),
        story("Rocket launch", "Space", 3),
        story("Chip fab opens", "Semiconductors", 3),
    ];

    let kept = filter_avoided(stories.clone(), &["crypto".to_string(), "FAB".to_string()]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title, "Rocket launch");

    assert_eq!(filter_avoided(stories.clone(), &[]).len(), 3);
}

#[tokio::test]
async fn test_select_for_profile() {
    let stories: Vec<Story> = (0..12)
        .map(|i| story(&format!("Story {}", i), "General", 3))
        .chain([story("Space elevator", "Space", 3), story("Politics today", "General", 9)])
        .collect();
    let profile = VoiceProfile {
        primary_topics: vec!["space".to_string()],
        avoid_topics: vec!["politics".to_string()],
        ..Default::default()
    };

    let selected = select_for_profile(&stories, &profile, 8);

    assert_eq!(selected.len(), 8);
    assert_eq!(selected[0].title, "Space elevator");
    assert!(!selected.iter().any(|s| s.title.contains("Politics")));
}

#[tokio::test]
async fn test_drafts_for_both_platforms() {
    init_tracing();

    let model = Arc::new(MockLlmAdapter::new("test").with_responses([
        "Big news for robotics.\n\nWhat do you think?\n\n#robots #ai".to_string(),
        r#"{"isThread": true, "content": "1/3 Robots are here", "threadBreakdown": ["1/3 Robots are here", "2/3 More", "3/3 Done"]}"#.to_string(),
    ]));
    let generator = DraftGenerator::new(model.clone());
    let profile = VoiceProfile {
        tone_primary: Some("bold".to_string()),
        ..Default::default()
    };
    let stories = vec![story("Robot arms get cheaper", "Robotics", 3)];

    let drafts = generator.drafts_for(&stories, &profile).await;

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].platform, Platform::Linkedin);
    assert_eq!(drafts[0].tone, "bold");
    assert_eq!(drafts[0].topic, "Robotics");
    assert_eq!(drafts[1].platform, Platform::X);
    assert_eq!(drafts[1].post_type, "thread");
    assert_eq!(drafts[1].thread_breakdown.as_ref().map(Vec::len), Some(3));
    assert_eq!(drafts[1].source_story_title, "Robot arms get cheaper");

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("Title: Robot arms get cheaper"));
    info!("Drafted {:?}", drafts.iter().map(|d| &d.post_type).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_x_draft_falls_back_to_raw_text() {
    init_tracing();

    let rambling = format!("Sure! Here's a tweet: {}", "robots ".repeat(60));
    let model = Arc::new(MockLlmAdapter::new("test").with_responses([rambling]));
    let generator = DraftGenerator::new(model);

    let draft = generator
        .x_draft(&story("Robots", "Robotics", 3), &VoiceProfile::default())
        .await
        .unwrap();

    assert_eq!(draft.post_type, "quick_take");
    assert_eq!(draft.content.chars().count(), 280);
    assert!(draft.thread_breakdown.is_none());
    assert_eq!(draft.engagement, Engagement::Medium);
}

#[tokio::test]
async fn test_failed_drafts_are_skipped() {
    init_tracing();

    let model = Arc::new(MockLlmAdapter::new("flaky").failing_on("Title: Cursed story"));
    let generator = DraftGenerator::new(model);
    let stories = vec![
        story("Cursed story", "General", 3),
        story("Fine story", "General", 3),
    ];

    let drafts = generator.drafts_for(&stories, &VoiceProfile::default()).await;

    assert_eq!(drafts.len(), 2);
    assert!(drafts.iter().all(|d| d.source_story_title == "Fine story"));
}

#[tokio::test]
async fn test_quick_post_uses_platform_prompt() {
    let model = Arc::new(MockLlmAdapter::new("quick"));
    let generator = DraftGenerator::new(model.clone());

    let reply = generator
        .quick_post("humanoid robots", &VoiceProfile::default(), Platform::X)
        .await
        .unwrap();

    assert_eq!(reply, "[quick] You are writing an X post for:");
    assert!(model.prompts()[0].contains("TOPIC/IDEA: humanoid robots"));
}
