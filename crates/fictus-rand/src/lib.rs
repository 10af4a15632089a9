//! # fictus-rand
//!
//! Bounded random perturbation of measurement values and dates, used to turn
//! a template patient's records into a plausible synthetic clone.
//!
//! The crate is built around three rules:
//!
//! - randomness is injected through the [`RandomSource`] trait, so every
//!   operation is deterministic under a scripted source;
//! - unparseable input is never an error — it comes back as
//!   [`Randomized::Passthrough`], unchanged, by policy (source data has
//!   known irregular formatting);
//! - categorical tokens and `<`/`>`-censored values are classified before
//!   any numeric parsing, in one place ([`classify`]), so every caller
//!   perturbs values identically.

pub mod classify;
pub mod date;
pub mod numeric;
pub mod source;

pub use classify::{classify, randomize_value, ValueClass};
pub use date::{randomize_date, DEFAULT_MONTH_SPAN};
pub use numeric::randomize_numeric;
pub use source::{RandomSource, SystemRandom};

/// The outcome of one randomization attempt.
///
/// `Passthrough` is the recoverable, non-error case: the input could not be
/// parsed (or is categorical) and is returned unchanged. Callers that only
/// want the final string use [`Randomized::into_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Randomized {
    /// The input was parsed, perturbed, and re-rendered.
    Changed(String),
    /// The input was returned unchanged by the best-effort policy.
    Passthrough(String),
}

impl Randomized {
    /// The resulting value, perturbed or not.
    pub fn into_value(self) -> String {
        match self {
            Self::Changed(v) | Self::Passthrough(v) => v,
        }
    }

    /// The resulting value, by reference.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Changed(v) | Self::Passthrough(v) => v,
        }
    }

    /// True if the input was returned unchanged.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough(_))
    }
}
