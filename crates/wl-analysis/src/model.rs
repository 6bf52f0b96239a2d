//! The two loss views behind one trait.
//!
//! The tree rollup follows parent links and attributes loss to the node
//! where it happens. Stage classification ignores links and groups meters
//! by tier tag. Summarizing both over the same window shows where the data's
//! parent references and tier tags disagree.

use serde::Serialize;
use wl_core::{Real, WlResult, percent_of};
use wl_hierarchy::{HierarchyBuilder, compute_losses};
use wl_store::{MeterStore, MonthWindow};

use crate::config::AnalysisConfig;
use crate::period::aggregate_window;

/// Supply, delivery and loss as seen by one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossSummary {
    pub model: String,
    pub supply: Real,
    pub delivered: Real,
    pub loss: Real,
    pub loss_percent: Real,
}

impl LossSummary {
    fn new(model: &str, supply: Real, delivered: Real, loss: Real) -> Self {
        Self {
            model: model.to_string(),
            supply,
            delivered,
            loss,
            loss_percent: percent_of(loss, supply),
        }
    }
}

pub trait LossModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Summarize losses over `window`. An empty window gives an all-zero summary.
    fn summarize(&self, store: &MeterStore, window: &MonthWindow) -> WlResult<LossSummary>;
}

/// Parent-link rollup over a store restricted to the window.
///
/// Supply is the reading of every root that has children; delivered is the
/// reading of every leaf below a root. Standalone roots count toward neither.
#[derive(Debug, Clone, Default)]
pub struct TreeRollupModel {
    builder: HierarchyBuilder,
}

impl TreeRollupModel {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            builder: HierarchyBuilder::new().with_unresolved_labels(&config.unresolved_parent_labels),
        }
    }
}

impl LossModel for TreeRollupModel {
    fn name(&self) -> &'static str {
        "tree_rollup"
    }

    fn summarize(&self, store: &MeterStore, window: &MonthWindow) -> WlResult<LossSummary> {
        let restricted = store.restrict_to(window);
        let forest = self.builder.build_from_store(&restricted)?;
        let report = compute_losses(&forest);

        let mut supply = 0.0;
        let mut delivered = 0.0;
        for root in report.roots().filter(|r| !r.is_leaf()) {
            supply += root.total_consumption;
            delivered += report
                .subtree(root.id)
                .filter(|n| n.is_leaf())
                .map(|n| n.total_consumption)
                .fold(0.0, |acc, v| acc + v);
        }

        Ok(LossSummary::new(self.name(), supply, delivered, report.total_system_loss))
    }
}

/// Tier-tag classification aggregated over the window.
#[derive(Debug, Clone, Default)]
pub struct StageClassificationModel {
    config: AnalysisConfig,
}

impl StageClassificationModel {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
}

impl LossModel for StageClassificationModel {
    fn name(&self) -> &'static str {
        "stage_classification"
    }

    fn summarize(&self, store: &MeterStore, window: &MonthWindow) -> WlResult<LossSummary> {
        let agg = aggregate_window(store, window, &self.config);
        let r = agg.result;
        Ok(LossSummary::new(
            self.name(),
            r.main_source_total,
            r.end_user_total,
            r.total_loss.absolute,
        ))
    }
}

/// Run every model over the same window, in the order given.
pub fn compare_models(
    store: &MeterStore,
    window: &MonthWindow,
    models: &[&dyn LossModel],
) -> WlResult<Vec<LossSummary>> {
    let summaries = models
        .iter()
        .map(|m| m.summarize(store, window))
        .collect::<WlResult<Vec<_>>>()?;

    if let [first, rest @ ..] = summaries.as_slice() {
        for other in rest {
            if (first.loss - other.loss).abs() > 1e-6 {
                tracing::warn!(
                    a = %first.model,
                    b = %other.model,
                    a_loss = first.loss,
                    b_loss = other.loss,
                    "loss models disagree"
                );
            }
        }
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{MONTHS, meter, network};
    use wl_store::Tier;

    #[test]
    fn models_agree_on_consistent_network() {
        let store = network();
        let window = store.window("Jan-25", "Jan-25").unwrap();
        let config = AnalysisConfig::default();
        let tree = TreeRollupModel::new(&config);
        let stage = StageClassificationModel::new(config);

        let out = compare_models(&store, &window, &[&tree, &stage]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].model, "tree_rollup");
        assert_eq!(out[0].supply, 1000.0);
        assert_eq!(out[0].delivered, 720.0);
        assert_eq!(out[0].loss, 280.0);
        assert_eq!(out[1].model, "stage_classification");
        assert_eq!(out[1].loss, 280.0);
        assert_eq!(out[1].loss_percent, 28.0);
    }

    #[test]
    fn tree_model_sees_only_the_window() {
        let store = network();
        let window = store.window("Feb-25", "Mar-25").unwrap();
        let s = TreeRollupModel::default().summarize(&store, &window).unwrap();
        assert_eq!(s.supply, 2300.0);
    }

    #[test]
    fn empty_window_is_all_zero() {
        let store = network();
        let s = StageClassificationModel::default()
            .summarize(&store, &MonthWindow::empty())
            .unwrap();
        assert_eq!(s.supply, 0.0);
        assert_eq!(s.loss_percent, 0.0);
    }

    #[test]
    fn cycle_surfaces_as_error() {
        let store = MeterStore::new(
            vec![
                meter("A", "", "", "B", Tier::L2, [1.0, 0.0, 0.0]),
                meter("B", "", "", "A", Tier::L3, [1.0, 0.0, 0.0]),
            ],
            MONTHS.iter().map(|m| m.to_string()).collect(),
        )
        .unwrap();
        let window = store.full_window();
        assert!(TreeRollupModel::default().summarize(&store, &window).is_err());
    }
}
