//! Hierarchy validation logic.

use wl_core::MeterId;

use crate::error::{HierarchyError, HierarchyResult};
use crate::indexing::LabelIndex;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnPath,
    Done,
}

/// Reject parent links that loop back on themselves.
///
/// `parents[i]` is the resolved parent of meter `i`. Each chain is walked
/// upward once; a chain that reaches a meter already on the current path is
/// a cycle.
pub(crate) fn validate_acyclic(parents: &[Option<MeterId>], index: &LabelIndex) -> HierarchyResult<()> {
    let mut state = vec![Visit::New; parents.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parents.len() {
        if state[start] != Visit::New {
            continue;
        }

        path.clear();
        let mut cursor = Some(start);
        while let Some(i) = cursor {
            match state[i] {
                Visit::Done => break,
                Visit::OnPath => {
                    let from = path.iter().position(|&p| p == i).unwrap_or(0);
                    let mut labels: Vec<String> = path[from..]
                        .iter()
                        .map(|&p| label_of(index, p))
                        .collect();
                    labels.push(label_of(index, i));
                    return Err(HierarchyError::Cycle { labels });
                }
                Visit::New => {
                    state[i] = Visit::OnPath;
                    path.push(i);
                    cursor = parents[i].map(MeterId::slot);
                }
            }
        }

        for &p in &path {
            state[p] = Visit::Done;
        }
    }

    Ok(())
}

fn label_of(index: &LabelIndex, slot: usize) -> String {
    index
        .label(MeterId::from_index(slot as u32))
        .unwrap_or_default()
        .to_string()
}
