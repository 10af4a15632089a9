//! Bounded perturbation of calendar dates.
//!
//! Two textual layouts are recognized:
//!
//! - `DD-MM-YYYY` (date only);
//! - `DD-MM-YYYYHH:MM` (time appended directly, detected by the colon).
//!
//! The output is re-rendered in the layout that was parsed, zero-padded.
//! Anything else — empty strings included — passes through unchanged; the
//! source data has known irregular formatting and a best-effort policy is
//! deliberate here.

use chrono::{Months, NaiveDate, NaiveTime};

use crate::source::RandomSource;
use crate::Randomized;

/// Default span of the shift window: dates move by a uniform whole number
/// of months in `[-6, +6]`.
pub const DEFAULT_MONTH_SPAN: u32 = 12;

const DATE_LAYOUT: &str = "%d-%m-%Y";
const TIME_LAYOUT: &str = "%H:%M";
/// `DD-MM-YYYY` is exactly this many bytes; the time suffix starts here.
const DATE_WIDTH: usize = 10;

/// Shift `value` by a uniform whole number of months in
/// `[-month_span/2, +month_span/2]`.
pub fn randomize_date(value: &str, month_span: u32, source: &mut dyn RandomSource) -> Randomized {
    let trimmed = value.trim();

    let passthrough = || Randomized::Passthrough(value.to_string());

    if trimmed.len() < DATE_WIDTH || !trimmed.is_char_boundary(DATE_WIDTH) {
        return passthrough();
    }

    let (date_part, time_part) = trimmed.split_at(DATE_WIDTH);
    let Ok(date) = NaiveDate::parse_from_str(date_part, DATE_LAYOUT) else {
        return passthrough();
    };

    // Time suffix detected by the colon; any other trailing text is
    // unrecognized and passes through whole.
    let time = if time_part.is_empty() {
        None
    } else if time_part.contains(':') {
        match NaiveTime::parse_from_str(time_part, TIME_LAYOUT) {
            Ok(time) => Some(time),
            Err(_) => return passthrough(),
        }
    } else {
        return passthrough();
    };

    let half = i64::from(month_span / 2);
    let shift = source.uniform_i64(-half, half);
    let shifted = shift_months(date, shift);

    let rendered = match time {
        Some(time) => format!(
            "{}{}",
            shifted.format(DATE_LAYOUT),
            time.format(TIME_LAYOUT)
        ),
        None => shifted.format(DATE_LAYOUT).to_string(),
    };
    Randomized::Changed(rendered)
}

/// Checked month arithmetic; the day of month is clamped to the target
/// month's length by chrono. On overflow the original date is kept.
fn shift_months(date: NaiveDate, months: i64) -> NaiveDate {
    let result = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs() as u32))
    };
    result.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns a scripted month shift.
    struct ShiftSource(i64);

    impl RandomSource for ShiftSource {
        fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64 {
            (lo + hi) / 2.0
        }
        fn uniform_i64(&mut self, lo: i64, hi: i64) -> i64 {
            self.0.clamp(lo, hi)
        }
    }

    #[test]
    fn date_only_stays_date_only() {
        let out = randomize_date("15-06-2023", 12, &mut ShiftSource(3)).into_value();
        assert_eq!(out, "15-09-2023");
        assert!(!out.contains(':'), "no time component may be introduced");
    }

    #[test]
    fn negative_shift_moves_backward() {
        let out = randomize_date("15-06-2023", 12, &mut ShiftSource(-6)).into_value();
        assert_eq!(out, "15-12-2022");
    }

    #[test]
    fn datetime_layout_is_preserved() {
        let out = randomize_date("02-03-202109:15", 12, &mut ShiftSource(1)).into_value();
        assert_eq!(out, "02-04-202109:15");
    }

    #[test]
    fn day_is_clamped_to_the_target_month() {
        // 31 Jan + 1 month: February has no 31st.
        let out = randomize_date("31-01-2023", 12, &mut ShiftSource(1)).into_value();
        assert_eq!(out, "28-02-2023");
    }

    #[test]
    fn output_is_zero_padded() {
        let out = randomize_date("05-11-2023", 12, &mut ShiftSource(-2)).into_value();
        assert_eq!(out, "05-09-2023");
    }

    #[test]
    fn unparseable_input_passes_through() {
        for input in ["", "not a date", "2023-06-15", "15/06/2023", "15-06-23"] {
            let out = randomize_date(input, 12, &mut ShiftSource(3));
            assert!(out.is_passthrough(), "'{}' must pass through", input);
            assert_eq!(out.into_value(), input);
        }
    }

    #[test]
    fn malformed_time_suffix_passes_the_whole_value_through() {
        let out = randomize_date("15-06-2023T0915", 12, &mut ShiftSource(3));
        assert!(out.is_passthrough());
    }

    #[test]
    fn zero_span_never_moves_the_date() {
        let out = randomize_date("15-06-2023", 0, &mut ShiftSource(5)).into_value();
        assert_eq!(out, "15-06-2023");
    }
}
