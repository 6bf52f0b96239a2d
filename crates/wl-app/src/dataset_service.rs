//! Dataset and configuration loading, plus the data-quality summary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use wl_analysis::AnalysisConfig;
use wl_hierarchy::HierarchyBuilder;
use wl_store::{Dataset, MeterStore, Tier};

use crate::error::{AppError, AppResult};

/// Environment variable naming a YAML analysis config.
pub const CONFIG_ENV_VAR: &str = "WATERLOSS_CONFIG";

/// Overview of a loaded dataset for `validate`-style listings.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub meter_count: usize,
    pub month_count: usize,
    pub first_month: Option<String>,
    pub last_month: Option<String>,
    pub main_source: Option<String>,
    pub zones: Vec<String>,
    pub tier_counts: Vec<(Tier, usize)>,
    pub root_count: usize,
    pub depth: usize,
    /// Meters whose parent label names no meter in the dataset.
    pub orphans: Vec<String>,
}

/// Load a parsed dataset from a JSON file and build a validated store.
pub fn load_dataset(path: &Path) -> AppResult<MeterStore> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::DatasetFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let dataset: Dataset = serde_json::from_str(&content)
        .map_err(|e| AppError::Dataset(format!("Failed to parse dataset JSON: {}", e)))?;

    let store = MeterStore::from_dataset(dataset)?;
    tracing::info!(
        path = %path.display(),
        meters = store.len(),
        months = store.months().len(),
        "dataset loaded"
    );
    Ok(store)
}

/// The config file to use: an explicit path wins over the environment.
pub fn config_path(explicit: Option<&Path>, env: Option<OsString>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// Load the analysis config from `explicit`, else from `WATERLOSS_CONFIG`,
/// else fall back to defaults.
pub fn load_config(explicit: Option<&Path>) -> AppResult<AnalysisConfig> {
    let Some(path) = config_path(explicit, std::env::var_os(CONFIG_ENV_VAR)) else {
        tracing::debug!("no config file, using defaults");
        return Ok(AnalysisConfig::default());
    };

    let content = std::fs::read_to_string(&path).map_err(|e| AppError::ConfigFileRead {
        path: path.clone(),
        source: e,
    })?;
    // An empty document is a valid all-defaults config
    if content.trim().is_empty() {
        return Ok(AnalysisConfig::default());
    }
    let config: AnalysisConfig = serde_yaml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Summarize a store, building its hierarchy to surface cycles and orphans.
pub fn summarize_dataset(store: &MeterStore, config: &AnalysisConfig) -> AppResult<DatasetSummary> {
    let forest = HierarchyBuilder::new()
        .with_unresolved_labels(&config.unresolved_parent_labels)
        .build_from_store(store)?;

    let tier_counts = [Tier::L1, Tier::L2, Tier::L3, Tier::L4, Tier::DC, Tier::Unclassified]
        .into_iter()
        .map(|t| (t, store.by_tier(t).count()))
        .filter(|(_, n)| *n > 0)
        .collect();

    Ok(DatasetSummary {
        meter_count: store.len(),
        month_count: store.months().len(),
        first_month: store.months().first().cloned(),
        last_month: store.months().last().cloned(),
        main_source: store.main_source().map(|r| r.label.clone()),
        zones: store.zones().into_iter().map(String::from).collect(),
        tier_counts,
        root_count: forest.roots().len(),
        depth: forest.depth(),
        orphans: forest.orphans().to_vec(),
    })
}
