//! Follow-up suggestion parsing.

use once_cell::sync::Lazy;
use regex::Regex;

/// At most this many suggestions are kept from a reply.
pub const MAX_FOLLOWUPS: usize = 3;

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\(?\d+[.):]|[-*\u{2022}])\s*").expect("valid marker regex")
});

/// Splits a reply into at most [`MAX_FOLLOWUPS`] follow-up questions.
///
/// Lines are split on `\n` / `\r\n`, stripped of a leading ordinal or
/// bullet, trimmed, and empty lines are dropped before the limit applies.
pub fn parse_followups(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(|line| LEADING_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_FOLLOWUPS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_lines_are_stripped() {
        let reply = "1. What is the sodium correction rate?\n2) When is tolvaptan used?\n3: How to manage SIADH?";
        assert_eq!(
            parse_followups(reply),
            vec![
                "What is the sodium correction rate?",
                "When is tolvaptan used?",
                "How to manage SIADH?",
            ]
        );
    }

    #[test]
    fn test_never_more_than_three() {
        let reply = "1. a\n2. b\n3. c\n4. d\n5. e";
        assert_eq!(parse_followups(reply).len(), MAX_FOLLOWUPS);
    }

    #[test]
    fn test_blank_and_marker_only_lines_are_dropped() {
        let reply = "\r\n- First question\r\n   \r\n2.\r\n* Second question\r\n";
        let parsed = parse_followups(reply);
        assert_eq!(parsed, vec!["First question", "Second question"]);
        assert!(parsed.iter().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn test_empty_reply_yields_nothing() {
        assert!(parse_followups("").is_empty());
        assert!(parse_followups("\n\n  \n").is_empty());
    }
}
