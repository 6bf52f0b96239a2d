//! wl-core: stable foundation for waterloss.
//!
//! Contains:
//! - numeric (Real + tolerances + zero-guarded percentages)
//! - ids (compact meter positions shared by stores and hierarchies)
//! - month (month keys, chronological ordering, inclusive windows)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod month;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{WlError, WlResult};
pub use ids::*;
pub use month::*;
pub use numeric::*;
