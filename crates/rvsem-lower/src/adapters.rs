/*! Width-adjustment primitives shared by the catalog builders. */

use crate::HALF_WIDTH;
use rvsem_core::{Graph, IrError, NodeKind, Result, ValueId, ValueType};

fn operand_width(graph: &Graph, value: ValueId) -> Result<u32> {
    graph.value_type(value).bitvec_width().ok_or_else(|| {
        IrError::InvalidOperand(format!(
            "expected a bitvector operand, got {}",
            graph.value_type(value)
        ))
    })
}

/// Extract the low half of a full-width value, for word-sized instruction variants.
pub fn truncate_to_half(graph: &mut Graph, value: ValueId) -> Result<ValueId> {
    graph.insert(
        NodeKind::Extract {
            end: HALF_WIDTH - 1,
            start: 0,
        },
        vec![value],
        ValueType::Bitvec(HALF_WIDTH),
    )
}

/// Sign- or zero-extend `value` to `width`. A no-op when the widths already match; the
/// returned value is then `value` itself.
pub fn extend_to(graph: &mut Graph, value: ValueId, width: u32, signed: bool) -> Result<ValueId> {
    let source = operand_width(graph, value)?;
    if source == width {
        return Ok(value);
    }
    let kind = if signed {
        NodeKind::SignExtend
    } else {
        NodeKind::ZeroExtend
    };
    graph.insert(kind, vec![value], ValueType::Bitvec(width))
}

/// Mask a shift amount to its architecturally significant low bits (6 for full-register
/// shifts, 5 for word variants), then zero-extend it back to the width of the value
/// being shifted.
pub fn mask_shift_amount(
    graph: &mut Graph,
    value: ValueId,
    bits: u32,
    shift_width: u32,
) -> Result<ValueId> {
    let low = graph.insert(
        NodeKind::Extract {
            end: bits - 1,
            start: 0,
        },
        vec![value],
        ValueType::Bitvec(bits),
    )?;
    extend_to(graph, low, shift_width, false)
}
