use crate::types::GENERAL_TOPIC;

/// Ordered topic table. Earlier rows win when several could match.
pub const DEFAULT_TOPICS: &[(&str, &[&str])] = &[
    (
        "AI/ML",
        &[
            "ai",
            "chatgpt",
            "openai",
            "genai",
            "artificial intelligence",
            "machine learning",
            "ml",
            "neural",
            "gpt",
            "llm",
            "deep learning",
            "foundation model",
        ],
    ),
    ("Robotics", &["robot", "robotics", "automation", "humanoid", "manipulation"]),
    (
        "Space",
        &["space", "satellite", "rocket", "nasa", "spacex", "orbit", "launch", "starship"],
    ),
    (
        "Climate Tech",
        &[
            "climate",
            "carbon",
            "clean energy",
            "solar",
            "wind",
            "battery",
            "ev",
            "sustainability",
            "fusion",
            "nuclear",
        ],
    ),
    (
        "Biotech",
        &[
            "biotech",
            "biology",
            "genomic",
            "crispr",
            "pharmaceutical",
            "synthetic biology",
            "life science",
        ],
    ),
    (
        "Quantum",
        &["quantum", "qubit", "superposition", "entanglement", "quantum computing"],
    ),
    (
        "Semiconductors",
        &["chip", "semiconductor", "nvidia", "processor", "gpu", "asic", "fab"],
    ),
    (
        "Autonomous Systems",
        &["autonomous", "drone", "self-driving", "av", "lidar"],
    ),
    (
        "Cybersecurity",
        &["cyber", "security", "hack", "breach", "ransomware", "malware"],
    ),
    (
        "Funding",
        &["funding", "raised", "series", "investment", "venture", "vc", "million", "billion"],
    ),
    (
        "Deep Tech",
        &["deep tech", "hard tech", "frontier", "breakthrough", "science"],
    ),
];

/// Keywords this short must be whole words; longer ones match anywhere.
const SHORT_KEYWORD_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TopicRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl TopicRule {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// `text` must already be lowercased.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| keyword_matches(text, k))
    }
}

/// First-match keyword classifier over an ordered rule list.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    rules: Vec<TopicRule>,
    default_label: String,
}

impl TopicClassifier {
    pub fn new(rules: Vec<TopicRule>) -> Self {
        Self {
            rules,
            default_label: GENERAL_TOPIC.to_string(),
        }
    }

    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        Self::new(
            table
                .iter()
                .map(|(label, keywords)| TopicRule::new(*label, keywords))
                .collect(),
        )
    }

    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    pub fn rules(&self) -> &[TopicRule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.label.clone())
            .unwrap_or_else(|| self.default_label.clone())
    }
}

impl Default for TopicClassifier {
    fn default() -> Self {
        Self::from_table(DEFAULT_TOPICS)
    }
}

/// Classify `text` against [`DEFAULT_TOPICS`].
pub fn categorize_topic(text: &str) -> String {
    TopicClassifier::default().classify(text)
}

fn keyword_matches(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    if keyword.chars().count() > SHORT_KEYWORD_CHARS {
        return text.contains(keyword);
    }

    text.match_indices(keyword).any(|(start, _)| {
        let starts_on_boundary = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        if !starts_on_boundary {
            return false;
        }

        let mut rest = text[start + keyword.len()..].chars();
        match rest.next() {
            None => true,
            Some('s') => rest.next().map_or(true, |c| !c.is_alphanumeric()),
            Some(c) => !c.is_alphanumeric(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keywords_need_whole_words() {
        let rule = TopicRule::new("AI/ML", &["ai"]);
        assert!(rule.matches("new ai model"));
        assert!(rule.matches("ais are everywhere"));
        assert!(!rule.matches("he said hello"));
        assert!(!rule.matches("maintain"));
    }

    #[test]
    fn long_keywords_match_anywhere() {
        let rule = TopicRule::new("Robotics", &["robot"]);
        assert!(rule.matches("robots take over"));
        assert!(rule.matches("cobots and microrobots"));
        assert!(!rule.matches("rob ot"));
    }

    #[test]
    fn custom_default_label() {
        let classifier = TopicClassifier::new(vec![]).with_default_label("Other");
        assert_eq!(classifier.classify("anything"), "Other");
    }
}
