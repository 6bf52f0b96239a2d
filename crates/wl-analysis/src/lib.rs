//! wl-analysis: loss accounting over a meter store.
//!
//! - `stage`: tag-based four-tier stage losses for one month
//! - `period`: the same figures accumulated over an inclusive month range
//! - `zone`: bulk-vs-individual comparison for one zone
//! - `model`: tree rollup and stage classification behind one trait
//! - `breakdown`: consumption grouped by meter type and tier
//!
//! Every function is pure: it reads a store snapshot and returns fresh data.

pub mod breakdown;
pub mod config;
pub mod model;
pub mod period;
pub mod stage;
pub mod zone;

pub use breakdown::{ConsumptionShare, consumption_by_tier, consumption_by_type};
pub use config::AnalysisConfig;
pub use model::{LossModel, LossSummary, StageClassificationModel, TreeRollupModel, compare_models};
pub use period::{AggregatedLossResult, MonthlyLoss, aggregate, aggregate_window};
pub use stage::{StageLoss, StageTotals, WaterLossResult, compute_stage_loss};
pub use zone::{
    MeterCategory, TimeSelector, ZoneAnalysisResult, ZoneMeter, ZoneSummary, ZoneTopology,
    analyze_zone, list_zones,
};

#[cfg(test)]
pub(crate) mod fixtures;
