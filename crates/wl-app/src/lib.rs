//! Shared application service layer for waterloss.
//!
//! Frontends go through this crate rather than the core crates: it loads
//! datasets and configuration, resolves user-supplied month and zone
//! selections, and turns lookup misses into errors a CLI can report.

pub mod dataset_service;
pub mod error;
pub mod query;

// Re-export key types for convenience
pub use dataset_service::{
    CONFIG_ENV_VAR, DatasetSummary, config_path, load_config, load_dataset, summarize_dataset,
};
pub use error::{AppError, AppResult};
pub use query::{
    aggregate_over, breakdown_by_tier, breakdown_by_type, compare_models_over, resolve_window,
    rollup_over, stage_for_month, zone_report,
};
