//! Date extraction from index names.
//!
//! Time-based indices carry their creation day as a `YYYY-MM-DD` suffix
//! (`info-prod-2020-05-05`). The suffix is the only source of an index's age.

use chrono::NaiveDate;

use esmaint_config::constants::INDEX_DATE_SUFFIX_LEN;

/// Parse the trailing `YYYY-MM-DD` of an index name.
///
/// Returns `None` when the name is too short, the suffix does not have the
/// exact shape (four digits, dash, two digits, dash, two digits) or the date
/// does not exist on the calendar.
pub fn date_from_index(name: &str) -> Option<NaiveDate> {
    let start = name.len().checked_sub(INDEX_DATE_SUFFIX_LEN)?;
    let suffix = name.get(start..)?;
    if !has_date_shape(suffix.as_bytes()) {
        return None;
    }

    let year = suffix[0..4].parse().ok()?;
    let month = suffix[5..7].parse().ok()?;
    let day = suffix[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn has_date_shape(bytes: &[u8]) -> bool {
    bytes.len() == INDEX_DATE_SUFFIX_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Whole days elapsed from `date` to `today`. Negative for future dates.
pub fn age_in_days(date: NaiveDate, today: NaiveDate) -> i64 {
    today.signed_duration_since(date).num_days()
}
