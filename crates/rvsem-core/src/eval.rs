/*! Concrete evaluation of lowered graphs.
 *
 * Small enough to audit by eye, this interpreter exists so the lowering rules can be
 * checked against reference semantics on concrete inputs: word-tier against direct-tier
 * agreement, shift-amount masking, boolean coercion. Widths are capped at 64, matching
 * the modeled register file.
 */

use crate::graph::{Graph, ValueId};
use crate::node::NodeKind;
use crate::types::ValueType;
use crate::{IrError, Result};
use indexmap::IndexMap;
use num_traits::ToPrimitive;

/// A concrete value produced during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concrete {
    Bits { value: u64, width: u32 },
    Bool(bool),
}

impl Concrete {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Concrete::Bits { value, .. } => Some(*value),
            Concrete::Bool(_) => None,
        }
    }
}

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn sign_extend(value: u64, width: u32) -> i128 {
    let value = i128::from(value & mask(width));
    let sign_bit = 1i128 << (width - 1);
    (value ^ sign_bit) - sign_bit
}

fn bits(value: u64, width: u32) -> Concrete {
    Concrete::Bits {
        value: value & mask(width),
        width,
    }
}

/// Evaluate `graph` on concrete argument values, returning the value bound to `result`.
///
/// `inputs` are taken in declared argument order and masked to each argument's width.
pub fn eval(graph: &Graph, inputs: &[u64], result: ValueId) -> Result<Concrete> {
    let mut env: IndexMap<ValueId, Concrete> = IndexMap::new();

    if inputs.len() != graph.args().len() {
        return Err(IrError::InvalidOperand(format!(
            "graph takes {} arguments, got {}",
            graph.args().len(),
            inputs.len()
        )));
    }
    for (arg, input) in graph.args().iter().zip(inputs) {
        let width = concrete_width(graph.value_type(*arg))?;
        env.insert(*arg, bits(*input, width));
    }

    for node in graph.nodes_in_order() {
        let value = eval_node(graph, &env, node)?;
        env.insert(node.result, value);
    }

    env.get(&result).copied().ok_or_else(|| {
        IrError::InvalidGraph(format!("value {} was never bound during evaluation", result))
    })
}

fn concrete_width(ty: ValueType) -> Result<u32> {
    match ty.bitvec_width() {
        Some(width) if width <= 64 => Ok(width),
        Some(width) => Err(IrError::InvalidGraph(format!(
            "evaluator supports widths up to 64, got bv{}",
            width
        ))),
        None => Err(IrError::InvalidGraph(format!(
            "cannot evaluate a value of type {}",
            ty
        ))),
    }
}

fn eval_node(
    graph: &Graph,
    env: &IndexMap<ValueId, Concrete>,
    node: &crate::graph::Node,
) -> Result<Concrete> {
    let operand = |index: usize| -> Result<Concrete> {
        let id = node.inputs[index];
        env.get(&id).copied().ok_or_else(|| {
            IrError::InvalidGraph(format!("node references unbound value {}", id))
        })
    };
    let operand_bits = |index: usize| -> Result<(u64, u32)> {
        match operand(index)? {
            Concrete::Bits { value, width } => Ok((value, width)),
            Concrete::Bool(_) => Err(IrError::InvalidOperand(
                "expected a bitvector operand, got bool".to_string(),
            )),
        }
    };
    let result_width = concrete_width(graph.value_type(node.result));

    match &node.kind {
        NodeKind::Add => {
            let (lhs, width) = operand_bits(0)?;
            let (rhs, _) = operand_bits(1)?;
            Ok(bits(lhs.wrapping_add(rhs), width))
        }
        NodeKind::Sub => {
            let (lhs, width) = operand_bits(0)?;
            let (rhs, _) = operand_bits(1)?;
            Ok(bits(lhs.wrapping_sub(rhs), width))
        }
        NodeKind::And => {
            let (lhs, width) = operand_bits(0)?;
            let (rhs, _) = operand_bits(1)?;
            Ok(bits(lhs & rhs, width))
        }
        NodeKind::Or => {
            let (lhs, width) = operand_bits(0)?;
            let (rhs, _) = operand_bits(1)?;
            Ok(bits(lhs | rhs, width))
        }
        NodeKind::Xor => {
            let (lhs, width) = operand_bits(0)?;
            let (rhs, _) = operand_bits(1)?;
            Ok(bits(lhs ^ rhs, width))
        }
        NodeKind::SignExtend => {
            let (value, source) = operand_bits(0)?;
            let target = result_width?;
            Ok(bits(sign_extend(value, source) as u64, target))
        }
        NodeKind::ZeroExtend => {
            let (value, _) = operand_bits(0)?;
            Ok(bits(value, result_width?))
        }
        NodeKind::Extract { end, start } => {
            let (value, _) = operand_bits(0)?;
            Ok(bits(value >> start, end - start + 1))
        }
        NodeKind::Shl => {
            let (value, width) = operand_bits(0)?;
            let (amount, _) = operand_bits(1)?;
            if amount >= u64::from(width) {
                Ok(bits(0, width))
            } else {
                Ok(bits(value << amount, width))
            }
        }
        NodeKind::LShr => {
            let (value, width) = operand_bits(0)?;
            let (amount, _) = operand_bits(1)?;
            if amount >= u64::from(width) {
                Ok(bits(0, width))
            } else {
                Ok(bits(value >> amount, width))
            }
        }
        NodeKind::AShr => {
            let (value, width) = operand_bits(0)?;
            let (amount, _) = operand_bits(1)?;
            let amount = amount.min(u64::from(width)) as u32;
            Ok(bits((sign_extend(value, width) >> amount) as u64, width))
        }
        NodeKind::Slt => {
            let (lhs, width) = operand_bits(0)?;
            let (rhs, _) = operand_bits(1)?;
            Ok(Concrete::Bool(sign_extend(lhs, width) < sign_extend(rhs, width)))
        }
        NodeKind::Ult => {
            let (lhs, _) = operand_bits(0)?;
            let (rhs, _) = operand_bits(1)?;
            Ok(Concrete::Bool(lhs < rhs))
        }
        NodeKind::Select => {
            let condition = match operand(0)? {
                Concrete::Bool(b) => b,
                Concrete::Bits { .. } => {
                    return Err(IrError::InvalidOperand(
                        "select condition must be bool".to_string(),
                    ))
                }
            };
            if condition {
                operand(1)
            } else {
                operand(2)
            }
        }
        NodeKind::Const { value } => {
            let width = result_width?;
            let value = value.to_u64().ok_or_else(|| {
                IrError::InvalidOperand(format!("constant {} does not fit in 64 bits", value))
            })?;
            Ok(bits(value, width))
        }
        NodeKind::Opaque { name } => Err(IrError::InvalidGraph(format!(
            "cannot evaluate opaque node {}",
            name
        ))),
    }
}
