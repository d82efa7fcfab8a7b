use crate::types::{Story, VoiceProfile, TOPIC_BOOST};
use crate::utils::text::contains_ignore_case;

/// How many stories a daily generation run drafts from.
pub const DEFAULT_SELECTION: usize = 8;

/// Raise stories that mention any of `topics` (in their topic label or
/// title) by [`TOPIC_BOOST`], then re-sort by priority alone. Blank topics
/// never match.
pub fn boost_for_topics(stories: &[Story], topics: &[String]) -> Vec<Story> {
    let topics: Vec<&str> = topics
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    let mut boosted: Vec<Story> = stories
        .iter()
        .map(|story| {
            let mut story = story.clone();
            let hit = topics.iter().any(|topic| {
                story
                    .topic
                    .as_deref()
                    .is_some_and(|label| contains_ignore_case(label, topic))
                    || contains_ignore_case(&story.title, topic)
            });
            if hit {
                story.priority = story.priority.saturating_add(TOPIC_BOOST);
            }
            story
        })
        .collect();

    boosted.sort_by(|a, b| b.priority.cmp(&a.priority));
    boosted
}

/// Drop stories whose title or summary mentions an avoided topic.
pub fn filter_avoided(stories: Vec<Story>, avoid_topics: &[String]) -> Vec<Story> {
    let avoid: Vec<&str> = avoid_topics
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if avoid.is_empty() {
        return stories;
    }

    stories
        .into_iter()
        .filter(|story| {
            !avoid.iter().any(|topic| {
                contains_ignore_case(&story.title, topic) || contains_ignore_case(&story.summary, topic)
            })
        })
        .collect()
}

/// Boost towards the profile's primary topics, drop avoided ones, keep `n`.
pub fn select_for_profile(stories: &[Story], profile: &VoiceProfile, n: usize) -> Vec<Story> {
    let candidates = if profile.primary_topics.is_empty() {
        stories.to_vec()
    } else {
        boost_for_topics(stories, &profile.primary_topics)
    };

    let mut selected = filter_avoided(candidates, &profile.avoid_topics);
    selected.truncate(n);
    selected
}
