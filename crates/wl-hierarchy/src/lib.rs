//! wl-hierarchy: meter hierarchy construction and tree rollup.
//!
//! Provides:
//! - Label index for one-lookup parent resolution
//! - Forest builder (unresolved parents become roots, cycles are rejected)
//! - Post-order rollup computing per-node loss and total system loss
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use wl_hierarchy::{HierarchyBuilder, compute_losses};
//! use wl_store::{MeterRecord, Tier};
//!
//! let meter = |label: &str, parent: &str, total: f64| MeterRecord {
//!     id: label.to_string(),
//!     label: label.to_string(),
//!     account_number: String::new(),
//!     zone: String::new(),
//!     meter_type: String::new(),
//!     parent_label: parent.to_string(),
//!     tier: Tier::Unclassified,
//!     monthly_consumption: BTreeMap::from([("Jan-25".to_string(), total)]),
//! };
//!
//! let forest = HierarchyBuilder::new()
//!     .build(&[meter("A1", "", 100.0), meter("B1", "A1", 60.0), meter("B2", "A1", 30.0)])
//!     .unwrap();
//! let report = compute_losses(&forest);
//!
//! assert_eq!(report.find("A1").unwrap().loss, 10.0);
//! assert_eq!(report.total_system_loss, 10.0);
//! ```

pub mod builder;
pub mod error;
pub mod forest;
pub mod indexing;
pub mod rollup;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::HierarchyBuilder;
pub use error::{HierarchyError, HierarchyResult};
pub use forest::{Forest, HierarchyNode};
pub use indexing::LabelIndex;
pub use rollup::{AnnotatedNode, LossReport, compute_losses};
