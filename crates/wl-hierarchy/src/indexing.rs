//! Label index: one lookup from a normalized label to a meter ID.

use std::collections::HashMap;

use wl_core::MeterId;
use wl_store::MeterRecord;

use crate::error::{HierarchyError, HierarchyResult};

/// Bidirectional mapping between trimmed labels and contiguous meter IDs.
///
/// IDs follow input order, so `id.slot()` indexes the record slice the index
/// was built from.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: Vec<String>,
    ids: HashMap<String, MeterId>,
}

impl LabelIndex {
    /// Build the index, rejecting duplicate labels.
    pub fn from_records(records: &[MeterRecord]) -> HierarchyResult<Self> {
        let mut labels = Vec::with_capacity(records.len());
        let mut ids = HashMap::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let label = record.label.trim().to_string();
            let id = MeterId::from_index(i as u32);
            if ids.insert(label.clone(), id).is_some() {
                return Err(HierarchyError::DuplicateLabel { label });
            }
            labels.push(label);
        }

        Ok(Self { labels, ids })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// ID for a label, trimmed before lookup.
    pub fn get(&self, label: &str) -> Option<MeterId> {
        self.ids.get(label.trim()).copied()
    }

    /// Label for an ID (None if out of bounds).
    pub fn label(&self, id: MeterId) -> Option<&str> {
        self.labels.get(id.slot()).map(String::as_str)
    }
}
