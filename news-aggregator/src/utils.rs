/// Text processing utilities
pub mod text {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
    static RE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
    static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    static RE_INLINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());

    /// Collapse every run of whitespace into a single space and trim.
    pub fn collapse_whitespace(text: &str) -> String {
        RE_WS.replace_all(text, " ").trim().to_string()
    }

    /// Extract clean single-line text from an HTML fragment.
    pub fn strip_html(html: &str) -> String {
        let without_tags = RE_TAGS.replace_all(html, " ");
        let decoded = html_escape::decode_html_entities(&without_tags);
        collapse_whitespace(&decoded.replace('\u{a0}', " "))
    }

    /// Like [`strip_html`] but keeps `<br>` and newlines as line breaks.
    pub fn html_to_lines(html: &str) -> String {
        let with_breaks = RE_BREAKS.replace_all(html, "\n");
        let without_tags = RE_TAGS.replace_all(&with_breaks, "");
        let decoded = html_escape::decode_html_entities(&without_tags).replace('\u{a0}', " ");

        decoded
            .lines()
            .map(|line| RE_INLINE_WS.replace_all(line, " ").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Truncate to at most `max_chars` characters, never splitting a char.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => text[..byte_idx].to_string(),
            None => text.to_string(),
        }
    }

    /// Truncate to `max_chars`, replacing the tail with `...` when cut.
    pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let keep = max_chars.saturating_sub(3);
        format!("{}...", truncate_chars(text, keep))
    }

    /// Lowercase-contains check used by the topic filters.
    pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Time utilities
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    /// Parse the date formats seen in feeds and article metadata.
    pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
