//! Post-order consumption rollup and per-node loss.

use serde::Serialize;
use wl_core::{MeterId, Real, percent_of};
use wl_store::Tier;

use crate::forest::{Forest, HierarchyNode};

/// A meter annotated with the loss between its reading and its children's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedNode {
    pub id: MeterId,
    pub label: String,
    pub zone: String,
    pub meter_type: String,
    pub tier: Tier,
    pub total_consumption: Real,
    /// Sum of the direct children's totals; zero for a leaf.
    pub children_sum: Real,
    /// `total_consumption - children_sum` for internal nodes, zero for leaves.
    /// Negative values (children reading more than the parent) are kept as-is.
    pub loss: Real,
    pub loss_percent: Real,
    /// Children in input order.
    pub children: Vec<MeterId>,
}

impl AnnotatedNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The annotated forest plus the loss summed over every internal node.
///
/// Serialized flat: `nodes` in input order, each listing its children by id,
/// and `roots` naming the tree tops.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LossReport {
    pub(crate) nodes: Vec<AnnotatedNode>,
    pub(crate) roots: Vec<MeterId>,
    pub total_system_loss: Real,
}

impl LossReport {
    pub fn node(&self, id: MeterId) -> Option<&AnnotatedNode> {
        self.nodes.get(id.slot())
    }

    pub fn roots(&self) -> impl ExactSizeIterator<Item = &AnnotatedNode> {
        self.roots.iter().map(|id| &self.nodes[id.slot()])
    }

    pub fn children<'a>(&'a self, node: &'a AnnotatedNode) -> impl Iterator<Item = &'a AnnotatedNode> {
        node.children.iter().map(|id| &self.nodes[id.slot()])
    }

    /// Pre-order iteration over every tree.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedNode> {
        self.walk().map(|(_, node)| node)
    }

    /// Pre-order iteration paired with each node's level (roots are level 0).
    pub fn walk(&self) -> impl Iterator<Item = (usize, &AnnotatedNode)> {
        self.walk_from(self.roots.iter().rev().map(|&id| (0, id)).collect())
    }

    /// Pre-order iteration over the subtree under `id`, including it.
    pub fn subtree(&self, id: MeterId) -> impl Iterator<Item = &AnnotatedNode> {
        let start = if id.slot() < self.nodes.len() { vec![(0, id)] } else { Vec::new() };
        self.walk_from(start).map(|(_, node)| node)
    }

    fn walk_from(&self, mut stack: Vec<(usize, MeterId)>) -> impl Iterator<Item = (usize, &AnnotatedNode)> {
        std::iter::from_fn(move || {
            let (level, id) = stack.pop()?;
            let node = &self.nodes[id.slot()];
            stack.extend(node.children.iter().rev().map(|&c| (level + 1, c)));
            Some((level, node))
        })
    }

    pub fn find(&self, label: &str) -> Option<&AnnotatedNode> {
        let label = label.trim();
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Nodes that have children, i.e. the ones carrying a loss figure.
    pub fn internal_nodes(&self) -> impl Iterator<Item = &AnnotatedNode> {
        self.iter().filter(|n| !n.is_leaf())
    }

    /// Internal nodes whose children read more than they do.
    pub fn gains(&self) -> impl Iterator<Item = &AnnotatedNode> {
        self.internal_nodes().filter(|n| n.loss < 0.0)
    }
}

/// Annotate every node with its loss and sum the losses across the forest.
///
/// Children are resolved before their parent; only direct children count
/// toward a parent's `children_sum`.
pub fn compute_losses(forest: &Forest) -> LossReport {
    let mut slots: Vec<Option<AnnotatedNode>> = vec![None; forest.node_count()];
    let mut total_system_loss = 0.0;
    for id in forest.post_order() {
        let Some(node) = forest.node(id) else { continue };
        let annotated = annotate(forest, node);
        total_system_loss += annotated.loss;
        slots[id.slot()] = Some(annotated);
    }

    let report = LossReport {
        nodes: slots.into_iter().flatten().collect(),
        roots: forest.roots.clone(),
        total_system_loss,
    };
    tracing::debug!(
        roots = report.roots.len(),
        total_system_loss,
        "rollup computed"
    );
    report
}

fn annotate(forest: &Forest, node: &HierarchyNode) -> AnnotatedNode {
    let total = node.total_consumption();
    let (children_sum, loss) = if node.is_leaf() {
        (0.0, 0.0)
    } else {
        let sum = forest.children_sum(node);
        (sum, total - sum)
    };

    AnnotatedNode {
        id: node.id,
        label: node.record.label.clone(),
        zone: node.record.zone.clone(),
        meter_type: node.record.meter_type.clone(),
        tier: node.record.tier,
        total_consumption: total,
        children_sum,
        loss,
        loss_percent: percent_of(loss, total),
        children: node.children.clone(),
    }
}
