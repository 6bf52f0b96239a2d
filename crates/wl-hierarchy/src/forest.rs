//! Meter trees stored flat, addressed by [`MeterId`].
//!
//! Nodes sit in one vector in input order and name their children by id, so
//! building, walking, cloning and dropping a forest never recurse, however
//! long a feed chain is.

use wl_core::{MeterId, Real};
use wl_store::MeterRecord;

/// A meter and the ids of the meters directly downstream of it.
///
/// A node exclusively owns its children list; there are no back-pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    /// Position of the record in the slice the forest was built from.
    pub id: MeterId,
    pub record: MeterRecord,
    /// Children in input order.
    pub children: Vec<MeterId>,
}

impl HierarchyNode {
    pub fn label(&self) -> &str {
        &self.record.label
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn total_consumption(&self) -> Real {
        self.record.total_consumption()
    }
}

/// Every meter of a store arranged as trees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    /// Indexed by `MeterId::slot`.
    pub(crate) nodes: Vec<HierarchyNode>,
    pub(crate) roots: Vec<MeterId>,
    pub(crate) orphans: Vec<String>,
}

impl Forest {
    /// Every node in input order.
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, id: MeterId) -> Option<&HierarchyNode> {
        self.nodes.get(id.slot())
    }

    /// Trees in input order of their root records.
    pub fn roots(&self) -> impl ExactSizeIterator<Item = &HierarchyNode> {
        self.roots.iter().map(|id| &self.nodes[id.slot()])
    }

    pub fn children<'a>(&'a self, node: &'a HierarchyNode) -> impl Iterator<Item = &'a HierarchyNode> {
        node.children.iter().map(|id| &self.nodes[id.slot()])
    }

    /// Sum of the direct children's totals (not deeper descendants).
    pub fn children_sum(&self, node: &HierarchyNode) -> Real {
        self.children(node)
            .map(HierarchyNode::total_consumption)
            .fold(0.0, |acc, v| acc + v)
    }

    /// Labels of roots that named a parent which does not exist.
    ///
    /// True top-level meters (no parent named) are roots but not orphans.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Levels in the deepest tree; a lone root has depth 1.
    pub fn depth(&self) -> usize {
        self.walk().map(|(level, _)| level + 1).max().unwrap_or(0)
    }

    /// Pre-order iteration over every tree.
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.walk().map(|(_, node)| node)
    }

    /// Pre-order iteration paired with each node's level (roots are level 0).
    pub fn walk(&self) -> impl Iterator<Item = (usize, &HierarchyNode)> {
        let mut stack: Vec<(usize, MeterId)> = self.roots.iter().rev().map(|&id| (0, id)).collect();
        std::iter::from_fn(move || {
            let (level, id) = stack.pop()?;
            let node = &self.nodes[id.slot()];
            stack.extend(node.children.iter().rev().map(|&c| (level + 1, c)));
            Some((level, node))
        })
    }

    /// Ids with every child ahead of its parent.
    pub fn post_order(&self) -> Vec<MeterId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(MeterId, bool)> = self.roots.iter().rev().map(|&id| (id, false)).collect();
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            stack.extend(self.nodes[id.slot()].children.iter().rev().map(|&c| (c, false)));
        }
        order
    }

    /// Node with this label, wherever it sits.
    pub fn find(&self, label: &str) -> Option<&HierarchyNode> {
        let label = label.trim();
        self.nodes.iter().find(|n| n.label() == label)
    }
}
