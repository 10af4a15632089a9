//! Measurement value classification.
//!
//! Before any value is perturbed it is classified exactly once, here:
//!
//! - **Categorical**: the value is one of the fixed domain tokens
//!   (case-sensitive, exact match) and must pass through unchanged;
//! - **Prefixed**: a `<`/`>`-censored lab value ("<0.5"); the prefix is
//!   stripped, the remainder randomized, and the prefix reattached;
//! - **Numeric**: everything else is treated as a plain numeric string.
//!
//! Every place that perturbs values goes through [`randomize_value`], so
//! this classification is applied identically across the pipeline.

use crate::numeric::randomize_numeric;
use crate::source::RandomSource;
use crate::Randomized;

/// The fixed set of non-randomizable domain tokens.
///
/// Source data is bilingual (Dutch/English exports), so markers appear in
/// both spellings: negative and positive result markers, "none", memo
/// markers, specimen-type markers, "borderline", and free-text category
/// markers. Matching is case-sensitive and exact.
pub const CATEGORICAL_TOKENS: [&str; 14] = [
    "negative",
    "negatief",
    "positive",
    "positief",
    "none",
    "geen",
    "memo",
    "zie memo",
    "urine",
    "bloed",
    "borderline",
    "dubieus",
    "text",
    "tekst",
];

/// How a raw measurement value should be treated by the randomizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueClass<'a> {
    /// A domain token; passes through unchanged.
    Categorical,
    /// A censored/threshold value: `prefix` is `<` or `>`, `rest` is the
    /// numeric remainder.
    Prefixed { prefix: char, rest: &'a str },
    /// A plain numeric string (or free text, which the numeric randomizer
    /// passes through on its own).
    Numeric,
}

/// Classify one raw value.
pub fn classify(value: &str) -> ValueClass<'_> {
    if CATEGORICAL_TOKENS.contains(&value) {
        return ValueClass::Categorical;
    }

    let mut chars = value.chars();
    if let Some(first @ ('<' | '>')) = chars.next() {
        return ValueClass::Prefixed {
            prefix: first,
            rest: chars.as_str(),
        };
    }

    ValueClass::Numeric
}

/// Randomize one measurement value within `±percentage`, honoring the
/// classification above.
pub fn randomize_value(
    value: &str,
    percentage: f64,
    source: &mut dyn RandomSource,
) -> Randomized {
    match classify(value) {
        ValueClass::Categorical => Randomized::Passthrough(value.to_string()),
        ValueClass::Prefixed { prefix, rest } => match randomize_numeric(rest, percentage, source)
        {
            Randomized::Changed(inner) => Randomized::Changed(format!("{}{}", prefix, inner)),
            Randomized::Passthrough(_) => Randomized::Passthrough(value.to_string()),
        },
        ValueClass::Numeric => randomize_numeric(value, percentage, source),
    }
}
