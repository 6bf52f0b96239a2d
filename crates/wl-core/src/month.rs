//! Month keys and inclusive month windows.
//!
//! Readings are keyed by short month labels such as `Jan-25`. The canonical
//! month list of a dataset is ordered chronologically; windows are resolved
//! against positions in that list, never by parsing on the hot path.

use core::cmp::Ordering;
use core::fmt;

use chrono::NaiveDate;

use crate::{WlError, WlResult};

/// A parsed `Mon-YY` month label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthKey {
    first_day: NaiveDate,
    label: String,
}

impl MonthKey {
    /// Parse a `Mon-YY` label (`Jan-25`). Surrounding whitespace is ignored.
    pub fn parse(label: &str) -> WlResult<Self> {
        let trimmed = label.trim();
        let first_day = NaiveDate::parse_from_str(&format!("01-{trimmed}"), "%d-%b-%y")
            .map_err(|_| WlError::InvalidMonth {
                key: label.to_string(),
            })?;
        Ok(Self {
            first_day,
            label: trimmed.to_string(),
        })
    }

    /// The label as it appears in the dataset.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.first_day.cmp(&other.first_day)
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Sort month labels chronologically, dropping duplicates.
pub fn sort_months<S: AsRef<str>>(labels: &[S]) -> WlResult<Vec<String>> {
    let mut keys = labels
        .iter()
        .map(|l| MonthKey::parse(l.as_ref()))
        .collect::<WlResult<Vec<_>>>()?;
    keys.sort();
    keys.dedup_by(|a, b| a.first_day == b.first_day);
    Ok(keys.into_iter().map(|k| k.label).collect())
}

/// Inclusive positions of `start..=end` in `months`.
///
/// `None` when either endpoint is missing or `start` comes after `end`.
pub fn window_bounds<S: AsRef<str>>(months: &[S], start: &str, end: &str) -> Option<(usize, usize)> {
    let position = |needle: &str| months.iter().position(|m| m.as_ref() == needle.trim());
    let s = position(start)?;
    let e = position(end)?;
    if s > e {
        return None;
    }
    Some((s, e))
}

/// Human-readable label for a window: the bare month, or `"<start> to <end>"`.
pub fn period_label(start: &str, end: &str) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start} to {end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_label() {
        let key = MonthKey::parse("Mar-25").unwrap();
        assert_eq!(key.label(), "Mar-25");
        assert!(key > MonthKey::parse("Feb-25").unwrap());
        assert!(key < MonthKey::parse(" Jan-26").unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            MonthKey::parse("Month 3"),
            Err(WlError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn sort_is_chronological_across_years() {
        let sorted = sort_months(&["Feb-25", "Dec-24", "Jan-25", "Dec-24"]).unwrap();
        assert_eq!(sorted, vec!["Dec-24", "Jan-25", "Feb-25"]);
    }

    #[test]
    fn window_bounds_rejects_reversed_and_unknown() {
        let months = ["Jan-25", "Feb-25", "Mar-25"];
        assert_eq!(window_bounds(&months, "Jan-25", "Mar-25"), Some((0, 2)));
        assert_eq!(window_bounds(&months, "Feb-25", "Feb-25"), Some((1, 1)));
        assert_eq!(window_bounds(&months, "Mar-25", "Jan-25"), None);
        assert_eq!(window_bounds(&months, "Jan-24", "Mar-25"), None);
    }

    #[test]
    fn period_label_forms() {
        assert_eq!(period_label("Jan-25", "Jan-25"), "Jan-25");
        assert_eq!(period_label("Jan-25", "Mar-25"), "Jan-25 to Mar-25");
    }
}
