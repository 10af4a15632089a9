//! Bounded perturbation of numeric strings.

use crate::source::RandomSource;
use crate::Randomized;

/// Perturb `value` by a uniform multiplicative variation in
/// `[-percentage, +percentage]` percent.
///
/// The result is re-rendered with the same number of decimal places as the
/// input; an input with no decimal point is rounded to the nearest integer
/// and rendered without one.
///
/// Unparseable input comes back as `Passthrough`, unchanged. Categorical
/// tokens never reach this function — filtering is the caller's job (see
/// [`crate::randomize_value`]).
pub fn randomize_numeric(
    value: &str,
    percentage: f64,
    source: &mut dyn RandomSource,
) -> Randomized {
    let trimmed = value.trim();
    let Ok(parsed) = trimmed.parse::<f64>() else {
        return Randomized::Passthrough(value.to_string());
    };

    let variation = source.uniform_f64(-percentage, percentage) / 100.0;
    let perturbed = parsed * (1.0 + variation);

    let places = decimal_places(trimmed);
    let rendered = if places == 0 {
        format!("{}", perturbed.round() as i64)
    } else {
        format!("{:.*}", places, perturbed)
    };
    Randomized::Changed(rendered)
}

/// Number of digits after the decimal point in the source rendering.
fn decimal_places(s: &str) -> usize {
    s.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
}
