//! Operand/operator extraction from the parsed tree, including the
//! multiplication consolidation pass.
//!
//! Extraction flattens the tree into the ordered sequences the layout engine
//! consumes: operand entities left to right, operator kinds between them, and
//! any result entity from the top-level node.

use log::debug;
use thiserror::Error;
use vlang::{Entity, Node, OperationKind, OperationNode};

/// Pseudo entity type marking a "number of equal groups" operand. Rendered
/// as text rather than an icon grid.
pub const MULTIPLIER_TYPE: &str = "multiplier";

/// Ordered sequences pulled out of a parsed tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Operator kinds, in left-to-right display order between the operands.
    pub operators: Vec<OperationKind>,
    /// Leaf operands in display order.
    pub operands: Vec<Entity>,
    /// The top-level result entity, when the source declared one.
    pub results: Vec<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The layout model has no two-sided comparison rendering; comparison
    /// trees are rejected rather than guessed at.
    #[error("comparison operations have no diagram layout")]
    UnsupportedOperation,
}

/// Flatten `root` into operator/operand/result sequences.
///
/// Every non-multiplication node contributes at most its first two children;
/// extra direct children beyond index one are dropped. Problems with more
/// than two operands are expected to arrive as right-nested trees.
pub fn extract(root: &OperationNode) -> Result<Extraction, ExtractError> {
    if contains_comparison(root) {
        return Err(ExtractError::UnsupportedOperation);
    }
    let mut out = Extraction::default();
    visit(root, None, &mut out);
    debug!(
        "extracted {} operands, {} operators, {} results",
        out.operands.len(),
        out.operators.len(),
        out.results.len()
    );
    Ok(out)
}

/// Whole-tree scan so rejection covers nodes the two-child recursion would
/// never visit.
fn contains_comparison(node: &OperationNode) -> bool {
    node.kind == OperationKind::Comparison
        || node.children.iter().any(|child| match child {
            Node::Operation(sub) => contains_comparison(sub),
            Node::Entity(_) => false,
        })
}

fn visit(node: &OperationNode, parent: Option<OperationKind>, out: &mut Extraction) {
    if node.kind == OperationKind::UnitTrans {
        visit_unittrans(node, out);
        return;
    }

    // "N equal groups" multiplication collapses to two operands so it fits
    // the binary left-operand/operator/right-operand slot geometry.
    if node.kind == OperationKind::Multiplication
        && parent.is_none()
        && let Some((multiplier, multiplicand)) = consolidate_equal_groups(node)
    {
        debug!(
            "consolidating {} equal groups of {} into multiplier/multiplicand",
            multiplier.quantity, multiplicand.quantity
        );
        out.operands.push(multiplier);
        out.operands.push(multiplicand);
        out.operators.push(OperationKind::Multiplication);
        if let Some(result) = &node.result {
            out.results.push(result.clone());
        }
        return;
    }

    // Two-child-per-node contract: nodes with fewer than two children
    // contribute nothing, and children beyond index one are dropped.
    let [left, right, ..] = node.children.as_slice() else {
        debug!(
            "skipping {} node with {} child(ren)",
            node.kind,
            node.children.len()
        );
        return;
    };

    visit_child(left, node.kind, out);
    out.operators.push(node.kind);
    visit_child(right, node.kind, out);

    if parent.is_none()
        && let Some(result) = &node.result
    {
        out.results.push(result.clone());
    }
}

fn visit_child(child: &Node, parent: OperationKind, out: &mut Extraction) {
    match child {
        Node::Entity(entity) => out.operands.push(entity.clone()),
        Node::Operation(sub) => visit(sub, Some(parent), out),
    }
}

/// Merge a unit-conversion pair into one operand carrying the unit record.
/// Non-conforming nodes (anything but exactly two entity children) contribute
/// nothing.
fn visit_unittrans(node: &OperationNode, out: &mut Extraction) {
    let [Node::Entity(main), Node::Entity(unit)] = node.children.as_slice() else {
        debug!(
            "skipping malformed unittrans node with {} child(ren)",
            node.children.len()
        );
        return;
    };
    let mut merged = main.clone();
    let label = if unit.entity_type.is_empty() {
        unit.name.clone()
    } else {
        unit.entity_type.clone()
    };
    merged.unit = Some(vlang::UnitConversion {
        label,
        value: unit.quantity,
    });
    out.operands.push(merged);
}

/// Detect the "N equal groups" pattern on a top-level multiplication node:
/// two or more direct entity children all sharing one quantity. Returns the
/// synthetic multiplier operand and the shared multiplicand.
fn consolidate_equal_groups(node: &OperationNode) -> Option<(Entity, Entity)> {
    if node.children.len() < 2 {
        return None;
    }
    let groups: Vec<&Entity> = node
        .children
        .iter()
        .filter_map(|child| match child {
            Node::Entity(entity) => Some(entity),
            Node::Operation(_) => None,
        })
        .collect();
    if groups.len() < 2 {
        return None;
    }
    let shared_quantity = groups[0].quantity;
    if !groups
        .iter()
        .all(|entity| entity.quantity == shared_quantity)
    {
        return None;
    }

    let container_type = groups[0].container_type.clone();
    let display_name = if container_type.is_empty() {
        "group".to_string()
    } else {
        container_type.clone()
    };

    let multiplier = Entity {
        name: display_name.clone(),
        entity_type: MULTIPLIER_TYPE.to_string(),
        quantity: groups.len() as f64,
        container_name: container_type.clone(),
        container_type: display_name,
        ..Entity::default()
    };
    let multiplicand = Entity {
        name: groups[0].entity_type.clone(),
        entity_type: groups[0].entity_type.clone(),
        quantity: shared_quantity,
        container_name: container_type.clone(),
        container_type,
        ..Entity::default()
    };
    Some((multiplier, multiplicand))
}
