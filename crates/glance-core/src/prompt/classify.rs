//! Structural question classification.
//!
//! This is a pattern heuristic, not a semantic classifier: it looks for
//! a run of lettered "Option" markers or a line that starts like a
//! lettered answer list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::session::Classification;

/// Minimum length of the `Option A`, `Option B`, ... run that marks an MCQ.
pub const MIN_SEQUENTIAL_OPTIONS: usize = 4;

static OPTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\boption\s+\(?([a-z])\b").expect("valid option regex"));

static LETTERED_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\(?A[.)][ \t]+\S").expect("valid list regex"));

/// Classifies submitted text as multiple-choice or definitional.
///
/// Pure: the same text always yields the same classification.
pub fn classify(text: &str) -> Classification {
    if has_sequential_options(text) || LETTERED_LIST.is_match(text) {
        Classification::Mcq
    } else {
        Classification::Definitional
    }
}

fn has_sequential_options(text: &str) -> bool {
    let mut run = 0usize;
    let mut previous: Option<u8> = None;

    for captures in OPTION_MARKER.captures_iter(text) {
        let letter = captures[1].as_bytes()[0].to_ascii_uppercase();
        run = match previous {
            Some(prev) if letter == prev + 1 => run + 1,
            _ => 1,
        };
        if run >= MIN_SEQUENTIAL_OPTIONS {
            return true;
        }
        previous = Some(letter);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_sequential_options_is_mcq() {
        let text = "Which drug is first line? Option A metformin Option B insulin \
                    Option C sulfonylurea Option D acarbose";
        assert_eq!(classify(text), Classification::Mcq);
    }

    #[test]
    fn test_three_options_is_not_enough() {
        let text = "Option A rest, Option B ice, Option C compression";
        assert_eq!(classify(text), Classification::Definitional);
    }

    #[test]
    fn test_out_of_order_options_restart_the_run() {
        let text = "Option A x Option C y Option A z Option B w Option C v Option D u";
        assert_eq!(classify(text), Classification::Mcq);

        let scrambled = "Option A x Option C y Option B z Option D w";
        assert_eq!(classify(scrambled), Classification::Definitional);
    }

    #[test]
    fn test_leading_lettered_list_is_mcq() {
        let text = "A 64-year-old presents with chest pain. Next step?\nA. ECG\nB. Troponin\nC. CT";
        assert_eq!(classify(text), Classification::Mcq);
    }

    #[test]
    fn test_plain_prose_is_definitional() {
        assert_eq!(classify("hyponatremia"), Classification::Definitional);
        assert_eq!(
            classify("What are the options for treating atrial fibrillation?"),
            Classification::Definitional
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let text = "Option A. one Option B. two Option C. three Option D. four";
        let first = classify(text);
        for _ in 0..10 {
            assert_eq!(classify(text), first);
        }
    }
}
