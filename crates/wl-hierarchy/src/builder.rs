//! Forest builder: flat records in, linked trees out.

use wl_core::MeterId;
use wl_store::{MeterRecord, MeterStore};

use crate::error::HierarchyResult;
use crate::forest::{Forest, HierarchyNode};
use crate::indexing::LabelIndex;
use crate::validate;

/// Builds a [`Forest`] by resolving each record's parent label.
///
/// A parent label that is empty, one of the configured "no parent" markers,
/// or simply not the label of any record leaves the record as a root.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    unresolved_labels: Vec<String>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self {
            unresolved_labels: vec![String::new(), "N/A".to_string()],
        }
    }
}

impl HierarchyBuilder {
    /// Builder treating `""` and `"N/A"` as "no parent".
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the "no parent" markers (compared trimmed, case-insensitively).
    pub fn with_unresolved_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unresolved_labels = labels
            .into_iter()
            .map(|l| l.into().trim().to_string())
            .collect();
        self
    }

    /// Build the forest for every record of a store.
    pub fn build_from_store(&self, store: &MeterStore) -> HierarchyResult<Forest> {
        self.build(store.records())
    }

    /// Build and validate the forest. The input is never modified.
    pub fn build(&self, records: &[MeterRecord]) -> HierarchyResult<Forest> {
        let index = LabelIndex::from_records(records)?;

        // Resolve parents by a single lookup each
        let parents: Vec<Option<MeterId>> = records
            .iter()
            .map(|r| self.resolve_parent(&index, r))
            .collect();

        validate::validate_acyclic(&parents, &index)?;

        // Children lists in input order
        let mut children: Vec<Vec<MeterId>> = vec![Vec::new(); records.len()];
        let mut roots = Vec::new();
        let mut orphans = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            let id = MeterId::from_index(i as u32);
            match parent {
                Some(p) => children[p.slot()].push(id),
                None => {
                    roots.push(id);
                    if !self.is_no_parent(&records[i].parent_label) {
                        tracing::warn!(
                            meter = %records[i].label,
                            parent = %records[i].parent_label,
                            "parent label does not match any meter, treating as root"
                        );
                        orphans.push(records[i].label.trim().to_string());
                    }
                }
            }
        }

        let nodes: Vec<HierarchyNode> = records
            .iter()
            .zip(children)
            .enumerate()
            .map(|(i, (record, children))| HierarchyNode {
                id: MeterId::from_index(i as u32),
                record: record.clone(),
                children,
            })
            .collect();

        let forest = Forest { nodes, roots, orphans };
        tracing::debug!(
            meters = records.len(),
            roots = forest.roots().len(),
            orphans = forest.orphans().len(),
            depth = forest.depth(),
            "hierarchy built"
        );
        Ok(forest)
    }

    fn resolve_parent(&self, index: &LabelIndex, record: &MeterRecord) -> Option<MeterId> {
        if self.is_no_parent(&record.parent_label) {
            return None;
        }
        index.get(&record.parent_label)
    }

    fn is_no_parent(&self, parent_label: &str) -> bool {
        let parent_label = parent_label.trim();
        parent_label.is_empty()
            || self
                .unresolved_labels
                .iter()
                .any(|m| m.eq_ignore_ascii_case(parent_label))
    }
}
