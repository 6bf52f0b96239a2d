//! wl-store: the meter record store.
//!
//! Holds the flat, validated collection of meter readings produced by an
//! upstream parser, together with the canonical chronological month list.
//! Everything downstream reads a `MeterStore` snapshot and never mutates it.

pub mod schema;
pub mod store;
pub mod validate;
pub mod window;

pub use schema::*;
pub use store::MeterStore;
pub use validate::{ValidationError, validate_dataset};
pub use window::MonthWindow;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Month error: {0}")]
    Month(#[from] wl_core::WlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a parsed dataset from JSON and build a validated store from it.
pub fn load_json(path: &std::path::Path) -> StoreResult<MeterStore> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;
    MeterStore::from_dataset(dataset)
}

/// Write a store back out in the dataset JSON format.
pub fn save_json(path: &std::path::Path, store: &MeterStore) -> StoreResult<()> {
    let dataset = store.to_dataset();
    validate_dataset(&dataset)?;
    let content = serde_json::to_string_pretty(&dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}
