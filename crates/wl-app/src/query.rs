//! Selection helpers: turn user-supplied months and zones into core calls.
//!
//! The core treats unknown months and zones as empty results. Frontends
//! usually want to tell the user instead, so these helpers check first.

use wl_analysis::{
    AggregatedLossResult, AnalysisConfig, ConsumptionShare, LossModel, LossSummary,
    StageClassificationModel, TimeSelector, TreeRollupModel, WaterLossResult, ZoneAnalysisResult,
    aggregate_window, analyze_zone, compare_models, compute_stage_loss, consumption_by_tier,
    consumption_by_type,
};
use wl_hierarchy::{HierarchyBuilder, LossReport, compute_losses};
use wl_store::{MeterStore, MonthWindow};

use crate::error::{AppError, AppResult};

fn ensure_month(store: &MeterStore, month: &str) -> AppResult<()> {
    if store.months().iter().any(|m| m == month.trim()) {
        Ok(())
    } else {
        Err(AppError::MonthNotFound(month.to_string()))
    }
}

/// Resolve optional endpoints; a missing start or end defaults to the first
/// or last month of the dataset.
pub fn resolve_window(store: &MeterStore, start: Option<&str>, end: Option<&str>) -> AppResult<MonthWindow> {
    let (Some(first), Some(last)) = (store.months().first(), store.months().last()) else {
        return Err(AppError::InvalidInput("Dataset has no months".to_string()));
    };
    let start = start.unwrap_or(first).trim();
    let end = end.unwrap_or(last).trim();
    ensure_month(store, start)?;
    ensure_month(store, end)?;

    store.window(start, end).ok_or_else(|| {
        AppError::InvalidInput(format!("Start month {} is after end month {}", start, end))
    })
}

/// Tree rollup over a window.
pub fn rollup_over(store: &MeterStore, window: &MonthWindow, config: &AnalysisConfig) -> AppResult<LossReport> {
    let restricted = store.restrict_to(window);
    let forest = HierarchyBuilder::new()
        .with_unresolved_labels(&config.unresolved_parent_labels)
        .build_from_store(&restricted)?;
    Ok(compute_losses(&forest))
}

/// Stage losses for one known month.
pub fn stage_for_month(store: &MeterStore, month: &str, config: &AnalysisConfig) -> AppResult<WaterLossResult> {
    ensure_month(store, month)?;
    Ok(compute_stage_loss(store, month.trim(), config))
}

/// Zone drill-down; unknown zones are an error here.
pub fn zone_report(
    store: &MeterStore,
    zone: &str,
    selector: &TimeSelector,
    config: &AnalysisConfig,
) -> AppResult<ZoneAnalysisResult> {
    match selector {
        TimeSelector::Month(m) => ensure_month(store, m)?,
        TimeSelector::Range { start, end } => {
            resolve_window(store, Some(start.as_str()), Some(end.as_str()))?;
        }
    }
    analyze_zone(store, zone, selector, config).ok_or_else(|| AppError::ZoneNotFound(zone.to_string()))
}

/// Both loss models over the same window.
pub fn compare_models_over(
    store: &MeterStore,
    window: &MonthWindow,
    config: &AnalysisConfig,
) -> AppResult<Vec<LossSummary>> {
    let tree = TreeRollupModel::new(config);
    let stage = StageClassificationModel::new(config.clone());
    let models: [&dyn LossModel; 2] = [&tree, &stage];
    Ok(compare_models(store, window, &models)?)
}

pub fn breakdown_by_type(store: &MeterStore, window: &MonthWindow, config: &AnalysisConfig) -> Vec<ConsumptionShare> {
    consumption_by_type(store, window, config)
}

pub fn breakdown_by_tier(store: &MeterStore, window: &MonthWindow) -> Vec<ConsumptionShare> {
    consumption_by_tier(store, window)
}

/// Period aggregation over a window already checked by [`resolve_window`].
pub fn aggregate_over(store: &MeterStore, window: &MonthWindow, config: &AnalysisConfig) -> AggregatedLossResult {
    aggregate_window(store, window, config)
}
