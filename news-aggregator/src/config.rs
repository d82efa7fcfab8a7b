use crate::types::{AdapterConfig, AggregatorConfig, AggregatorError, FetchConfig, Result};
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings assembled from the environment on top of the defaults.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub database_url: Option<String>,
    pub fetch: FetchConfig,
    pub adapters: AdapterConfig,
    pub aggregator: AggregatorConfig,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or blank keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        settings.database_url = get("DATABASE_URL");
        settings.anthropic_api_key = get("ANTHROPIC_API_KEY");
        settings.anthropic_model = get("ANTHROPIC_MODEL");

        if let Some(agent) = get("NEWS_USER_AGENT") {
            settings.fetch.user_agent = agent;
        }
        if let Some(secs) = parse_key::<u64>(&get, "NEWS_FETCH_TIMEOUT_SECS")? {
            settings.fetch.timeout_seconds = secs;
        }
        if let Some(secs) = parse_key::<u64>(&get, "NEWS_BRIDGE_TIMEOUT_SECS")? {
            settings.fetch.bridge_timeout_seconds = secs;
        }
        if let Some(secs) = parse_key::<u64>(&get, "NEWS_DEADLINE_SECS")? {
            settings.aggregator.deadline = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(max) = parse_key::<usize>(&get, "NEWS_MAX_STORIES")? {
            settings.aggregator.max_stories = max;
        }
        if let Some(enrich) = get("NEWS_ENRICH_SUMMARIES") {
            settings.adapters.enrich_sparse_summaries = parse_flag(&enrich)?;
        }

        Ok(settings)
    }
}

fn parse_key<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AggregatorError::General(format!("{}={:?}: {}", key, raw, e)))
        })
        .transpose()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AggregatorError::General(format!(
            "NEWS_ENRICH_SUMMARIES={:?} is not a boolean",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.aggregator.max_stories, 30);
        assert_eq!(settings.aggregator.deadline, Some(Duration::from_secs(60)));
        assert_eq!(settings.fetch.user_agent, "DailyPost/1.0");
        assert!(settings.database_url.is_none());
    }

    #[test]
    fn overrides_apply_and_zero_disables_deadline() {
        let settings = Settings::from_lookup(lookup(&[
            ("NEWS_DEADLINE_SECS", "0"),
            ("NEWS_MAX_STORIES", "12"),
            ("NEWS_ENRICH_SUMMARIES", "yes"),
            ("NEWS_BRIDGE_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(settings.aggregator.deadline, None);
        assert_eq!(settings.aggregator.max_stories, 12);
        assert!(settings.adapters.enrich_sparse_summaries);
        assert_eq!(settings.fetch.bridge_timeout_seconds, 2);
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert!(Settings::from_lookup(lookup(&[("NEWS_MAX_STORIES", "lots")])).is_err());
    }
}
