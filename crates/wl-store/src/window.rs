//! Inclusive month windows resolved against a store's month list.

use serde::Serialize;
use wl_core::{period_label, window_bounds};

/// A contiguous, chronologically ordered run of months.
///
/// An empty window is the explicit "no data for this selection" value: every
/// sum over it is zero and its period label is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MonthWindow {
    months: Vec<String>,
}

impl MonthWindow {
    /// Resolve `start..=end` against `months`. `None` for unknown or reversed endpoints.
    pub fn resolve<S: AsRef<str>>(months: &[S], start: &str, end: &str) -> Option<Self> {
        let (s, e) = window_bounds(months, start, end)?;
        Some(Self {
            months: months[s..=e].iter().map(|m| m.as_ref().to_string()).collect(),
        })
    }

    /// Window holding one month, if the month is known.
    pub fn single<S: AsRef<str>>(months: &[S], month: &str) -> Option<Self> {
        Self::resolve(months, month, month)
    }

    /// Window spanning every month in the list.
    pub fn all<S: AsRef<str>>(months: &[S]) -> Self {
        Self {
            months: months.iter().map(|m| m.as_ref().to_string()).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn start(&self) -> Option<&str> {
        self.months.first().map(String::as_str)
    }

    pub fn end(&self) -> Option<&str> {
        self.months.last().map(String::as_str)
    }

    pub fn contains(&self, month: &str) -> bool {
        self.months.iter().any(|m| m == month)
    }

    /// `"Jan-25"`, `"Jan-25 to Mar-25"`, or `""` for an empty window.
    pub fn period(&self) -> String {
        match (self.start(), self.end()) {
            (Some(s), Some(e)) => period_label(s, e),
            _ => String::new(),
        }
    }
}
