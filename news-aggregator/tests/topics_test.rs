mod common;

use common::init_tracing;
use news_aggregator::topics::{TopicClassifier, TopicRule, DEFAULT_TOPICS};
use news_aggregator::{categorize_topic, GENERAL_TOPIC};
use tracing::info;

#[tokio::test]
async fn test_categorize_known_headlines() {
    init_tracing();

    assert_eq!(categorize_topic("New breakthrough in quantum error correction"), "Quantum");
    assert_eq!(categorize_topic("SpaceX catches the booster again"), "Space");
    assert_eq!(categorize_topic("Startup raised $40 million seed"), "Funding");
    info!("Classified {} topic rows", DEFAULT_TOPICS.len());
}

#[tokio::test]
async fn test_ai_compounds_are_ai() {
    assert_eq!(categorize_topic("ChatGPT usage doubles"), "AI/ML");
    assert_eq!(categorize_topic("OpenAI signs new deal"), "AI/ML");
    assert_eq!(categorize_topic("GenAI startups"), "AI/ML");
    assert_eq!(categorize_topic("Inside the new LLMs"), "AI/ML");
}

#[tokio::test]
async fn test_table_order_breaks_ties() {
    // Matches both AI/ML and Quantum; AI/ML comes first in the table.
    assert_eq!(categorize_topic("Quantum machine learning takes off"), "AI/ML");
    // Matches both Space and Funding.
    assert_eq!(categorize_topic("Satellite maker raised a Series B"), "Space");
}

#[tokio::test]
async fn test_short_keywords_need_word_boundaries() {
    assert_eq!(categorize_topic("He said the committee met"), GENERAL_TOPIC);
    assert_eq!(categorize_topic("Every vote counted"), GENERAL_TOPIC);
    assert_eq!(categorize_topic(""), GENERAL_TOPIC);
}

#[tokio::test]
async fn test_classifier_is_data_driven() {
    let classifier = TopicClassifier::new(vec![
        TopicRule::new("Rust", &["cargo", "borrow checker"]),
        TopicRule::new("Go", &["goroutine"]),
    ])
    .with_default_label("Misc");

    assert_eq!(classifier.classify("Cargo workspaces explained"), "Rust");
    assert_eq!(classifier.classify("Goroutines and the BORROW CHECKER"), "Rust");
    assert_eq!(classifier.classify("Nothing relevant"), "Misc");
    assert_eq!(classifier.rules().len(), 2);
}
