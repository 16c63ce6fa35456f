//! Textual post-processing of model replies.
//!
//! Two independent passes run on every assistant reply before it is
//! rendered: MCQ scaffold normalization and the citation filter.
//!
//! The citation filter is an approximate textual heuristic. It flags
//! domains whose name contains a guideline/policy/society/association
//! stem under a generic top-level domain. It both over- and under-matches
//! and must not be read as a source-verification guarantee.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::session::Classification;

/// Marker every MCQ reply must start with.
pub const ANSWER_MARKER: &str = "Answer:";

/// Replacement text for a flagged citation.
pub const UNVERIFIED_SOURCE: &str = "[unverified source]";

/// Blank scaffold prepended to MCQ replies that skipped the required structure.
pub const MCQ_SCAFFOLD: &str = "Answer: (not stated)\n\
Justification: (not stated)\n\
Distractors: (not addressed)\n\
Exam takeaway: (not stated)\n\n---\n\n";

static SUSPICIOUS_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9-]*(?:guideline|polic(?:y|ies)|societ(?:y|ies)|association)[a-z0-9-]*\.(?:com|org|net|info|biz)\b(?:/[^\s)\]>]*)?",
    )
    .expect("valid domain regex")
});

/// Runs both passes over a raw reply.
pub fn post_process(raw: &str, classification: Classification) -> String {
    let normalized = normalize_mcq(raw, classification);
    flag_suspicious_citations(&normalized)
}

/// Prepends [`MCQ_SCAFFOLD`] to an MCQ reply that does not begin with
/// [`ANSWER_MARKER`]. Definitional replies pass through unchanged.
pub fn normalize_mcq(raw: &str, classification: Classification) -> String {
    if classification != Classification::Mcq || starts_with_answer(raw) {
        return raw.to_string();
    }
    let mut out = String::with_capacity(MCQ_SCAFFOLD.len() + raw.len());
    out.push_str(MCQ_SCAFFOLD);
    out.push_str(raw);
    out
}

fn starts_with_answer(raw: &str) -> bool {
    let head = raw.trim_start().trim_start_matches(['*', '#', ' ']);
    head.get(..ANSWER_MARKER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ANSWER_MARKER))
}

/// Replaces every citation-like substring under a suspicious domain with
/// [`UNVERIFIED_SOURCE`].
pub fn flag_suspicious_citations(text: &str) -> String {
    SUSPICIOUS_DOMAIN
        .replace_all(text, UNVERIFIED_SOURCE)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcq_without_answer_gets_scaffold() {
        let out = post_process("Metformin is first line.", Classification::Mcq);
        assert!(out.starts_with("Answer: (not stated)"));
        assert!(out.ends_with("Metformin is first line."));
    }

    #[test]
    fn test_mcq_with_answer_is_untouched() {
        let reply = "Answer: B. Insulin\nJustification: ...";
        assert_eq!(post_process(reply, Classification::Mcq), reply);

        let bold = "**Answer:** C";
        assert_eq!(post_process(bold, Classification::Mcq), bold);
    }

    #[test]
    fn test_definitional_never_gets_scaffold() {
        let reply = "Hyponatremia is a serum sodium below 135 mmol/L.";
        assert_eq!(post_process(reply, Classification::Definitional), reply);
    }

    #[test]
    fn test_suspicious_domain_is_replaced() {
        let reply = "See exampleguideline.com for thresholds.";
        let out = post_process(reply, Classification::Definitional);
        assert!(!out.contains("exampleguideline.com"));
        assert!(out.contains(UNVERIFIED_SOURCE));
    }

    #[test]
    fn test_full_urls_and_paths_are_replaced() {
        let reply = "Source: [link](https://www.heart-society.org/hf/2023) and \
                     http://nationalpolicy.net/x";
        let out = flag_suspicious_citations(reply);
        assert!(!out.contains("heart-society.org"));
        assert!(!out.contains("nationalpolicy.net"));
        assert_eq!(out.matches(UNVERIFIED_SOURCE).count(), 2);
    }

    #[test]
    fn test_other_domains_pass_through() {
        let reply = "Per NICE (https://www.nice.org.uk/guidance/ng28) and pubmed.ncbi.nlm.nih.gov";
        assert_eq!(flag_suspicious_citations(reply), reply);
    }

    #[test]
    fn test_scaffold_and_filter_both_apply() {
        let out = post_process("Use diabetesassociation.org advice", Classification::Mcq);
        assert!(out.starts_with(MCQ_SCAFFOLD));
        assert!(out.contains(UNVERIFIED_SOURCE));
    }
}
