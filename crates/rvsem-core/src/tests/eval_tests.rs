use crate::eval::{eval, Concrete};
use crate::graph::{Graph, ValueId};
use crate::node::NodeKind;
use crate::types::ValueType;
use num_bigint::BigUint;
use pretty_assertions::assert_eq;

fn eval_u64(g: &Graph, inputs: &[u64], result: ValueId) -> u64 {
    eval(g, inputs, result).unwrap().as_u64().unwrap()
}

#[test]
fn test_add_wraps_at_width() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(64));
    let b = g.add_arg(ValueType::Bitvec(64));
    let sum = g
        .insert(NodeKind::Add, vec![a, b], ValueType::Bitvec(64))
        .unwrap();

    assert_eq!(eval_u64(&g, &[u64::MAX, 1], sum), 0);
    assert_eq!(eval_u64(&g, &[7, 35], sum), 42);
}

#[test]
fn test_sub_wraps_at_width() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(32));
    let b = g.add_arg(ValueType::Bitvec(32));
    let diff = g
        .insert(NodeKind::Sub, vec![a, b], ValueType::Bitvec(32))
        .unwrap();

    assert_eq!(eval_u64(&g, &[0, 1], diff), 0xffff_ffff);
}

#[test]
fn test_sign_extend_replicates_sign_bit() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(12));
    let wide = g
        .insert(NodeKind::SignExtend, vec![a], ValueType::Bitvec(64))
        .unwrap();

    // -1 as a 12-bit immediate.
    assert_eq!(eval_u64(&g, &[0xfff], wide), u64::MAX);
    assert_eq!(eval_u64(&g, &[0x7ff], wide), 0x7ff);
}

#[test]
fn test_zero_extend_keeps_value() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(32));
    let wide = g
        .insert(NodeKind::ZeroExtend, vec![a], ValueType::Bitvec(64))
        .unwrap();

    assert_eq!(eval_u64(&g, &[0x8000_0000], wide), 0x8000_0000);
}

#[test]
fn test_extract_slices_from_lsb() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(64));
    let low = g
        .insert(
            NodeKind::Extract { end: 5, start: 0 },
            vec![a],
            ValueType::Bitvec(6),
        )
        .unwrap();
    let mid = g
        .insert(
            NodeKind::Extract { end: 15, start: 8 },
            vec![a],
            ValueType::Bitvec(8),
        )
        .unwrap();

    assert_eq!(eval_u64(&g, &[0xabcd], low), 0xd);
    assert_eq!(eval_u64(&g, &[0xabcd], mid), 0xab);
}

#[test]
fn test_shift_amount_at_or_above_width_clears() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(64));
    let amount = g.add_arg(ValueType::Bitvec(64));
    let shifted = g
        .insert(NodeKind::Shl, vec![a, amount], ValueType::Bitvec(64))
        .unwrap();

    assert_eq!(eval_u64(&g, &[1, 64], shifted), 0);
    assert_eq!(eval_u64(&g, &[1, 3], shifted), 8);
}

#[test]
fn test_arithmetic_shift_fills_with_sign() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(64));
    let amount = g.add_arg(ValueType::Bitvec(64));
    let shifted = g
        .insert(NodeKind::AShr, vec![a, amount], ValueType::Bitvec(64))
        .unwrap();

    assert_eq!(eval_u64(&g, &[0x8000_0000_0000_0000, 63], shifted), u64::MAX);
    assert_eq!(eval_u64(&g, &[0x8000_0000_0000_0000, 100], shifted), u64::MAX);
    assert_eq!(eval_u64(&g, &[0x10, 4], shifted), 1);
}

#[test]
fn test_signed_and_unsigned_compare_differ() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(64));
    let b = g.add_arg(ValueType::Bitvec(64));
    let signed = g.insert(NodeKind::Slt, vec![a, b], ValueType::Bool).unwrap();
    let unsigned = g.insert(NodeKind::Ult, vec![a, b], ValueType::Bool).unwrap();

    // -1 < 0 signed, but not unsigned.
    assert_eq!(eval(&g, &[u64::MAX, 0], signed).unwrap(), Concrete::Bool(true));
    assert_eq!(
        eval(&g, &[u64::MAX, 0], unsigned).unwrap(),
        Concrete::Bool(false)
    );
}

#[test]
fn test_select_chooses_branch() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(64));
    let b = g.add_arg(ValueType::Bitvec(64));
    let lt = g.insert(NodeKind::Slt, vec![a, b], ValueType::Bool).unwrap();
    let one = g
        .insert(
            NodeKind::Const {
                value: BigUint::from(1u32),
            },
            vec![],
            ValueType::Bitvec(64),
        )
        .unwrap();
    let zero = g
        .insert(
            NodeKind::Const {
                value: BigUint::from(0u32),
            },
            vec![],
            ValueType::Bitvec(64),
        )
        .unwrap();
    let picked = g
        .insert(NodeKind::Select, vec![lt, one, zero], ValueType::Bitvec(64))
        .unwrap();

    assert_eq!(eval_u64(&g, &[1, 2], picked), 1);
    assert_eq!(eval_u64(&g, &[2, 1], picked), 0);
}

#[test]
fn test_inputs_are_masked_to_argument_width() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(12));
    let wide = g
        .insert(NodeKind::ZeroExtend, vec![a], ValueType::Bitvec(64))
        .unwrap();

    assert_eq!(eval_u64(&g, &[0xffff_ffff], wide), 0xfff);
}

#[test]
fn test_wrong_input_count_is_rejected() {
    let mut g = Graph::new();
    let a = g.add_arg(ValueType::Bitvec(64));
    g.add_arg(ValueType::Bitvec(64));

    assert!(eval(&g, &[1], a).is_err());
}
