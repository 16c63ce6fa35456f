//! Prompt construction.
//!
//! Template choice is driven by the question's [`Classification`]; the
//! [`Mode`] only narrows or widens the length ceiling of definitional
//! answers. Every function here is pure.

mod classify;

pub use classify::{MIN_SEQUENTIAL_OPTIONS, classify};

use minijinja::{Environment, context};
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::session::{Classification, Mode};

/// Claims below this confidence must carry an explicit "(unverified)" marker.
pub const CONFIDENCE_THRESHOLD_PERCENT: u8 = 80;

/// System instructions inserted once at the start of every session.
pub const SYSTEM_PROMPT: &str = "You are a professional medical assistant for physicians and other \
healthcare providers. Answer with precise, evidence-based information and follow this source \
priority: Swiss guidance (BAG/FOPH) first, then European bodies (ESC, EMA), then the UK (NICE), \
then the USA (CDC, NIH, FDA). Cite the guideline or peer-reviewed source behind every \
Swiss-specific statement with a direct link. Use professional terminology and spell out every \
abbreviation on first use, for example \"computed tomography (CT)\". When summarising study \
material such as MKSAP, highlight the exam-relevant Swiss and European guidelines and flag \
anything that conflicts with them. For multiple-choice questions, re-evaluate every option and \
rule out the alternatives explicitly. Include sources wherever obtainable.";

const MCQ_TEMPLATE: &str = r#"Answer the following multiple-choice question as an exam tutor. Use exactly this structure:

Answer: <letter and text of the correct option>
Justification: <why it is correct, naming the deciding guideline criterion>
Distractors:
- <each remaining option>: <why it is wrong>
Exam takeaway: <one line>

Keep the reply within {{ max_sentences }} sentences. Cite a source inline for every factual claim; if your confidence in a claim is below {{ confidence }}%, mark it "(unverified)" instead of citing.

Question:
{{ question }}"#;

const DEFINITIONAL_SHORT_TEMPLATE: &str = r#"Explain the following medical concept for a physician in no more than {{ max_sentences }} sentences, without simplifying. Include exactly one citation.

Concept: **{{ question }}**"#;

const DEFINITIONAL_LONG_TEMPLATE: &str = r#"Explain the following medical concept for a physician in training or advanced practice, without simplifying. Use this structure:

1. Definition
2. Diagnostic criteria and thresholds
3. Management: first line, then second line
4. One comparative caveat (a competing diagnosis or a conflicting guideline)
5. Exam takeaway: one line

Stay within {{ max_sentences }} sentences. Cite a source inline for each claim; mark any claim below {{ confidence }}% confidence "(unverified)".

Concept: **{{ question }}**"#;

const FOLLOWUP_TEMPLATE: &str = r#"Based on your last answer, suggest exactly 3 follow-up questions a clinician might ask next{% if mcq %}, focused on the tested concept and on why the distractors were wrong{% else %}, focused on diagnostic thresholds, management decisions and exam-relevant pitfalls{% endif %}. Return one question per line, numbered 1 to 3, with no other text."#;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(Environment::new);

/// The four deterministic prompt shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PromptTemplate {
    Mcq,
    DefinitionalShort,
    DefinitionalLong,
}

impl PromptTemplate {
    /// Picks the template for a question.
    pub fn select(mode: Mode, classification: Classification) -> Self {
        match (classification, mode) {
            (Classification::Mcq, _) => PromptTemplate::Mcq,
            (Classification::Definitional, Mode::Short) => PromptTemplate::DefinitionalShort,
            (Classification::Definitional, Mode::Long) => PromptTemplate::DefinitionalLong,
        }
    }

    /// Upper bound on answer length, in sentences, requested by the template.
    pub fn sentence_ceiling(self) -> usize {
        match self {
            PromptTemplate::DefinitionalShort => 2,
            PromptTemplate::Mcq => 10,
            PromptTemplate::DefinitionalLong => 14,
        }
    }

    fn source(self) -> &'static str {
        match self {
            PromptTemplate::Mcq => MCQ_TEMPLATE,
            PromptTemplate::DefinitionalShort => DEFINITIONAL_SHORT_TEMPLATE,
            PromptTemplate::DefinitionalLong => DEFINITIONAL_LONG_TEMPLATE,
        }
    }
}

/// Builds the user prompt for a submitted question.
pub fn build_prompt(text: &str, mode: Mode, classification: Classification) -> Result<String> {
    let template = PromptTemplate::select(mode, classification);
    let rendered = TEMPLATES.render_str(
        template.source(),
        context! {
            question => text.trim(),
            max_sentences => template.sentence_ceiling(),
            confidence => CONFIDENCE_THRESHOLD_PERCENT,
        },
    )?;
    Ok(rendered)
}

/// Builds the scratch request asking the model for three follow-up questions.
pub fn followup_request(classification: Classification) -> Result<String> {
    let rendered = TEMPLATES.render_str(
        FOLLOWUP_TEMPLATE,
        context! { mcq => classification == Classification::Mcq },
    )?;
    Ok(rendered)
}
