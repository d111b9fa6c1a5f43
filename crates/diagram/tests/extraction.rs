use diagram::{ExtractError, MULTIPLIER_TYPE, extract};
use vlang::{OperationKind, parse};

#[test]
fn flat_addition_splits_into_two_operands_and_a_result() {
    let _ = env_logger::builder().is_test(true).try_init();

    let tree = parse(
        "addition(container1[entity_type:apple,entity_quantity:9],\
         container2[entity_type:apple,entity_quantity:2],\
         result_container[entity_type:apple,entity_quantity:11])",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");

    assert_eq!(extraction.operators, vec![OperationKind::Addition]);
    assert_eq!(extraction.operands.len(), 2);
    assert_eq!(extraction.operands[0].quantity, 9.0);
    assert_eq!(extraction.operands[1].quantity, 2.0);
    assert_eq!(extraction.results.len(), 1);
    assert_eq!(extraction.results[0].quantity, 11.0);
}

#[test]
fn equal_groups_consolidate_into_multiplier_and_multiplicand() {
    let tree = parse(
        "multiplication(container1[entity_type:cupcake,entity_quantity:2,container_type:tray],\
         container2[entity_type:cupcake,entity_quantity:2,container_type:tray],\
         container3[entity_type:cupcake,entity_quantity:2,container_type:tray])",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");

    // Three equal groups collapse to exactly two operands regardless of N.
    assert_eq!(extraction.operands.len(), 2);
    let multiplier = &extraction.operands[0];
    assert_eq!(multiplier.entity_type, MULTIPLIER_TYPE);
    assert_eq!(multiplier.quantity, 3.0);
    assert_eq!(multiplier.name, "tray");
    let multiplicand = &extraction.operands[1];
    assert_eq!(multiplicand.entity_type, "cupcake");
    assert_eq!(multiplicand.quantity, 2.0);
    assert_eq!(extraction.operators, vec![OperationKind::Multiplication]);
}

#[test]
fn unequal_groups_do_not_consolidate() {
    let tree = parse(
        "multiplication(container1[entity_type:cupcake,entity_quantity:2],\
         container2[entity_type:cupcake,entity_quantity:3],\
         container3[entity_type:cupcake,entity_quantity:2])",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");

    // Falls back to the two-child contract: first two children only.
    assert_eq!(extraction.operands.len(), 2);
    assert_eq!(extraction.operands[0].quantity, 2.0);
    assert_eq!(extraction.operands[1].quantity, 3.0);
    assert_eq!(extraction.operators, vec![OperationKind::Multiplication]);
}

#[test]
fn consolidation_without_container_type_names_the_group() {
    let tree = parse(
        "multiplication(container1[entity_type:cupcake,entity_quantity:4],\
         container2[entity_type:cupcake,entity_quantity:4])",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");
    assert_eq!(extraction.operands[0].name, "group");
    assert_eq!(extraction.operands[0].quantity, 2.0);
}

#[test]
fn nested_multiplication_is_not_consolidated() {
    // Consolidation applies at the top level only; a nested multiplication
    // takes the generic two-child path.
    let tree = parse(
        "addition(container1[entity_type:pear,entity_quantity:1],\
         multiplication(container2[entity_type:pear,entity_quantity:2],\
         container3[entity_type:pear,entity_quantity:2]))",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");

    assert_eq!(extraction.operands.len(), 3);
    assert!(
        extraction
            .operands
            .iter()
            .all(|operand| operand.entity_type == "pear")
    );
    assert_eq!(
        extraction.operators,
        vec![OperationKind::Addition, OperationKind::Multiplication]
    );
}

#[test]
fn extra_children_beyond_two_are_dropped() {
    let tree = parse(
        "addition(container1[entity_type:apple,entity_quantity:1],\
         container2[entity_type:apple,entity_quantity:2],\
         container3[entity_type:apple,entity_quantity:3])",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");

    // Two-child-per-node contract: the third direct operand is discarded.
    assert_eq!(extraction.operands.len(), 2);
    assert_eq!(extraction.operands[1].quantity, 2.0);
}

#[test]
fn single_child_node_contributes_nothing() {
    let tree = parse("addition(container1[entity_type:apple,entity_quantity:1])")
        .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");
    assert!(extraction.operands.is_empty());
    assert!(extraction.operators.is_empty());
}

#[test]
fn unittrans_merges_the_unit_into_the_main_operand() {
    let tree = parse(
        "unittrans(container1[entity_type:meter,entity_quantity:3],\
         container2[entity_type:centimeter,entity_quantity:100])",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");

    assert!(extraction.operators.is_empty());
    assert_eq!(extraction.operands.len(), 1);
    let merged = &extraction.operands[0];
    assert_eq!(merged.entity_type, "meter");
    assert_eq!(merged.quantity, 3.0);
    let unit = merged.unit.as_ref().expect("merged unit record");
    assert_eq!(unit.label, "centimeter");
    assert_eq!(unit.value, 100.0);
}

#[test]
fn malformed_unittrans_contributes_nothing() {
    let tree = parse("unittrans(container1[entity_type:meter,entity_quantity:3])")
        .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");
    assert!(extraction.operands.is_empty());
}

#[test]
fn comparison_is_rejected_at_any_depth() {
    let top = parse(
        "comparison(container1[entity_type:marble,entity_quantity:5],\
         container2[entity_type:marble,entity_quantity:7])",
    )
    .expect("valid grammar");
    assert_eq!(
        extract(&top),
        Err(ExtractError::UnsupportedOperation)
    );

    let nested = parse(
        "addition(container1[entity_type:marble,entity_quantity:5],\
         comparison(container2[entity_type:marble,entity_quantity:1],\
         container3[entity_type:marble,entity_quantity:2]))",
    )
    .expect("valid grammar");
    assert_eq!(
        extract(&nested),
        Err(ExtractError::UnsupportedOperation)
    );
}

#[test]
fn nested_result_containers_are_ignored() {
    let tree = parse(
        "addition(container1[entity_type:apple,entity_quantity:1],\
         subtraction(container2[entity_type:apple,entity_quantity:5],\
         container3[entity_type:apple,entity_quantity:2],\
         result_container[entity_type:apple,entity_quantity:3]))",
    )
    .expect("valid source");
    let extraction = extract(&tree).expect("supported operation");

    // Only the top-level node's result is meaningful; the tree carries no
    // top-level result here.
    assert!(extraction.results.is_empty());
    assert_eq!(extraction.operands.len(), 3);
}
