//! Period aggregation: stage figures accumulated over a month range.

use rayon::prelude::*;
use serde::Serialize;
use wl_store::{MeterStore, MonthWindow};

use crate::config::AnalysisConfig;
use crate::stage::{WaterLossResult, compute_stage_loss};

/// One month's unaggregated figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyLoss {
    pub month: String,
    pub result: WaterLossResult,
}

/// Stage figures summed over a window, with the per-month results kept for trends.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregatedLossResult {
    #[serde(flatten)]
    pub result: WaterLossResult,
    /// `"Jan-25"`, `"Jan-25 to Mar-25"`, or `""` when the range did not resolve.
    pub period: String,
    pub months_count: usize,
    /// Chronological.
    pub monthly_breakdown: Vec<MonthlyLoss>,
}

impl AggregatedLossResult {
    /// The explicit "no data for this selection" value.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.months_count == 0
    }
}

/// Aggregate `start..=end` (inclusive) over the store's month list.
///
/// Unknown endpoints or a reversed range give [`AggregatedLossResult::empty`].
pub fn aggregate(store: &MeterStore, start: &str, end: &str, config: &AnalysisConfig) -> AggregatedLossResult {
    match store.window(start, end) {
        Some(window) => aggregate_window(store, &window, config),
        None => {
            tracing::debug!(start, end, "month range did not resolve");
            AggregatedLossResult::empty()
        }
    }
}

/// Aggregate an already resolved window.
///
/// Months are evaluated in parallel and accumulated in chronological order.
/// Absolute figures are summed; percentages are recomputed once from the sums.
pub fn aggregate_window(store: &MeterStore, window: &MonthWindow, config: &AnalysisConfig) -> AggregatedLossResult {
    if window.is_empty() {
        return AggregatedLossResult::empty();
    }

    let monthly_breakdown: Vec<MonthlyLoss> = window
        .months()
        .par_iter()
        .map(|month| MonthlyLoss {
            month: month.clone(),
            result: compute_stage_loss(store, month, config),
        })
        .collect();

    let mut result = WaterLossResult::default();
    for month in &monthly_breakdown {
        result.accumulate(&month.result);
    }
    result.recompute_percentages();

    tracing::debug!(
        period = %window.period(),
        months = window.len(),
        total_loss = result.total_loss.absolute,
        "period aggregated"
    );

    AggregatedLossResult {
        result,
        period: window.period(),
        months_count: window.len(),
        monthly_breakdown,
    }
}
