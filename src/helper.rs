use chrono::{DateTime, Utc};

/// Removes markup tag spans from a content string, leaving plain text.
///
/// Anything between `<` and the next `>` is dropped. A `<` with no closing
/// bracket is ordinary text and kept as-is.
pub fn strip_markup(markup: &str) -> String {
    let mut plain = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        plain.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                plain.push_str(&rest[open..]);
                return plain;
            }
        }
    }
    plain.push_str(rest);
    plain
}

/// Builds the plain-text preview shown on note cards: markup stripped,
/// truncated to `max_len` characters with a `...` suffix.
pub fn content_preview(content: &str, max_len: usize) -> String {
    let plain = strip_markup(content);
    if plain.chars().count() <= max_len {
        plain
    } else {
        let truncated: String = plain.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

/// Formats a timestamp as a human-readable distance from now, falling back
/// to a calendar date once the note is more than a few weeks old.
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();
    let weeks = days / 7;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{} minute{} ago", minutes, if minutes == 1 { "" } else { "s" })
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if days < 7 {
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if weeks < 4 {
        format!("{} week{} ago", weeks, if weeks == 1 { "" } else { "s" })
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

// Helper method for parsing comma-separated tag input
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use yare::parameterized;

    use super::*;

    #[parameterized(
        plain = { "no tags here", "no tags here" },
        single_pair = { "<b>bold</b> text", "bold text" },
        nested = { "<ul><li>item</li></ul>", "item" },
        attribute = { "<p align=\"center\">centered</p>", "centered" },
        unclosed = { "a < b", "a < b" },
        empty = { "", "" },
    )]
    fn strip_markup_cases(input: &str, expected: &str) {
        assert_eq!(strip_markup(input), expected);
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        let content = "<b>".to_string() + &"x".repeat(200) + "</b>";
        let preview = content_preview(&content, 150);
        assert_eq!(preview.chars().count(), 153);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn preview_keeps_short_content_intact() {
        assert_eq!(content_preview("<i>short</i>", 150), "short");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now), "just now");
        assert_eq!(
            format_relative_time(now - Duration::minutes(5)),
            "5 minutes ago"
        );
        assert_eq!(format_relative_time(now - Duration::hours(1)), "1 hour ago");
        assert_eq!(format_relative_time(now - Duration::days(3)), "3 days ago");
        assert_eq!(
            format_relative_time(now - Duration::days(14)),
            "2 weeks ago"
        );
    }

    #[test]
    fn old_timestamps_fall_back_to_dates() {
        let old = Utc::now() - Duration::days(60);
        assert_eq!(format_relative_time(old), old.format("%Y-%m-%d").to_string());
    }

    #[parameterized(
        none = { None, &[] },
        simple = { Some("a,b".to_string()), &["a", "b"] },
        padded = { Some(" a , b ".to_string()), &["a", "b"] },
        empties_dropped = { Some("a,,b,".to_string()), &["a", "b"] },
    )]
    fn parse_tags_cases(input: Option<String>, expected: &[&str]) {
        assert_eq!(parse_tags(input), expected);
    }
}
