/*! Per-instruction semantics as compositions of primitive bitvector nodes.
 *
 * Builders are organized in three tiers: direct (full register width), word (operands
 * truncated to the low half, result sign-extended back), and immediate (second operand
 * a sign-extended constant bound through a named attribute). Dispatch is an exhaustive
 * match so a new instruction kind cannot ship without a builder.
 */

use crate::adapters::{extend_to, mask_shift_amount, truncate_to_half};
use crate::{HALF_WIDTH, REG_WIDTH};
use indexmap::IndexMap;
use num_bigint::BigUint;
use rvsem_core::{EffectToken, Graph, IrError, NodeKind, Result, ValueId, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shift amounts are significant in their low 6 bits at full width, 5 at word width.
const FULL_SHAMT_BITS: u32 = 6;
const WORD_SHAMT_BITS: u32 = 5;

/// The RV64 integer instructions covered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrKind {
    Add,
    Addw,
    Sub,
    Subw,
    Or,
    Xor,
    And,
    Slt,
    Sltu,
    Sll,
    Sllw,
    Srl,
    Srlw,
    Sra,
    Sraw,
    Addi,
    Addiw,
    Andi,
    Ori,
    Xori,
    Slti,
    Sltiu,
    Slli,
    Slliw,
    Srli,
    Srliw,
    Srai,
    Sraiw,
    SlliUw,
}

/// Declared operand shape of an instruction. Immediate-family instructions take the
/// immediate as their first declared argument, matching the reference Lean definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandShape {
    RegReg,
    RegImm { imm_width: u32 },
}

impl InstrKind {
    pub const ALL: [InstrKind; 29] = [
        InstrKind::Add,
        InstrKind::Addw,
        InstrKind::Sub,
        InstrKind::Subw,
        InstrKind::Or,
        InstrKind::Xor,
        InstrKind::And,
        InstrKind::Slt,
        InstrKind::Sltu,
        InstrKind::Sll,
        InstrKind::Sllw,
        InstrKind::Srl,
        InstrKind::Srlw,
        InstrKind::Sra,
        InstrKind::Sraw,
        InstrKind::Addi,
        InstrKind::Addiw,
        InstrKind::Andi,
        InstrKind::Ori,
        InstrKind::Xori,
        InstrKind::Slti,
        InstrKind::Sltiu,
        InstrKind::Slli,
        InstrKind::Slliw,
        InstrKind::Srli,
        InstrKind::Srliw,
        InstrKind::Srai,
        InstrKind::Sraiw,
        InstrKind::SlliUw,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            InstrKind::Add => "add",
            InstrKind::Addw => "addw",
            InstrKind::Sub => "sub",
            InstrKind::Subw => "subw",
            InstrKind::Or => "or",
            InstrKind::Xor => "xor",
            InstrKind::And => "and",
            InstrKind::Slt => "slt",
            InstrKind::Sltu => "sltu",
            InstrKind::Sll => "sll",
            InstrKind::Sllw => "sllw",
            InstrKind::Srl => "srl",
            InstrKind::Srlw => "srlw",
            InstrKind::Sra => "sra",
            InstrKind::Sraw => "sraw",
            InstrKind::Addi => "addi",
            InstrKind::Addiw => "addiw",
            InstrKind::Andi => "andi",
            InstrKind::Ori => "ori",
            InstrKind::Xori => "xori",
            InstrKind::Slti => "slti",
            InstrKind::Sltiu => "sltiu",
            InstrKind::Slli => "slli",
            InstrKind::Slliw => "slliw",
            InstrKind::Srli => "srli",
            InstrKind::Srliw => "srliw",
            InstrKind::Srai => "srai",
            InstrKind::Sraiw => "sraiw",
            InstrKind::SlliUw => "slliuw",
        }
    }

    pub fn shape(&self) -> OperandShape {
        match self {
            InstrKind::Add
            | InstrKind::Addw
            | InstrKind::Sub
            | InstrKind::Subw
            | InstrKind::Or
            | InstrKind::Xor
            | InstrKind::And
            | InstrKind::Slt
            | InstrKind::Sltu
            | InstrKind::Sll
            | InstrKind::Sllw
            | InstrKind::Srl
            | InstrKind::Srlw
            | InstrKind::Sra
            | InstrKind::Sraw => OperandShape::RegReg,
            InstrKind::Addi
            | InstrKind::Addiw
            | InstrKind::Andi
            | InstrKind::Ori
            | InstrKind::Xori
            | InstrKind::Slti
            | InstrKind::Sltiu => OperandShape::RegImm { imm_width: 12 },
            InstrKind::Slli | InstrKind::Srli | InstrKind::Srai | InstrKind::SlliUw => {
                OperandShape::RegImm {
                    imm_width: FULL_SHAMT_BITS,
                }
            }
            InstrKind::Slliw | InstrKind::Srliw | InstrKind::Sraiw => OperandShape::RegImm {
                imm_width: WORD_SHAMT_BITS,
            },
        }
    }
}

impl fmt::Display for InstrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Attribute operand: either a symbolic value already in the graph or a literal to be
/// materialized as a constant node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue {
    Value(ValueId),
    Literal(i64),
}

pub type AttrMap = IndexMap<String, AttrValue>;

/// Which generation of the instruction-to-bitvector mapping to use. The width-aware
/// tiered catalog is authoritative; the legacy generation reproduces the earlier direct
/// mapping and covers only the instructions it historically covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogGeneration {
    #[default]
    WidthAware,
    Legacy,
}

/// Build the bitvector semantics of `kind` into `graph`.
///
/// `operands` are the positional (register) operands; immediate-family instructions
/// receive their immediate through the `"immediate"` attribute instead. The effect
/// token is threaded through unchanged: no builder in this catalog produces a
/// side-effecting node.
pub fn build_semantics(
    generation: CatalogGeneration,
    kind: InstrKind,
    graph: &mut Graph,
    operands: &[ValueId],
    attrs: &AttrMap,
    state: EffectToken,
) -> Result<(Vec<ValueId>, EffectToken)> {
    let result = match generation {
        CatalogGeneration::WidthAware => width_aware(kind, graph, operands, attrs)?,
        CatalogGeneration::Legacy => legacy(kind, graph, operands, attrs)?,
    };
    Ok((vec![result], state))
}

fn width_aware(
    kind: InstrKind,
    graph: &mut Graph,
    operands: &[ValueId],
    attrs: &AttrMap,
) -> Result<ValueId> {
    match kind {
        InstrKind::Add => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Add, a, b)
        }
        InstrKind::Sub => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Sub, a, b)
        }
        InstrKind::Or => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Or, a, b)
        }
        InstrKind::Xor => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Xor, a, b)
        }
        InstrKind::And => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::And, a, b)
        }
        InstrKind::Slt => {
            let (a, b) = two_regs(graph, operands)?;
            compare(graph, NodeKind::Slt, a, b)
        }
        InstrKind::Sltu => {
            let (a, b) = two_regs(graph, operands)?;
            compare(graph, NodeKind::Ult, a, b)
        }
        InstrKind::Sll => {
            let (a, b) = two_regs(graph, operands)?;
            direct_shift(graph, NodeKind::Shl, a, b)
        }
        InstrKind::Srl => {
            let (a, b) = two_regs(graph, operands)?;
            direct_shift(graph, NodeKind::LShr, a, b)
        }
        InstrKind::Sra => {
            let (a, b) = two_regs(graph, operands)?;
            direct_shift(graph, NodeKind::AShr, a, b)
        }
        InstrKind::Addw => {
            let (a, b) = two_regs(graph, operands)?;
            word_binary(graph, NodeKind::Add, a, b)
        }
        InstrKind::Subw => {
            let (a, b) = two_regs(graph, operands)?;
            word_binary(graph, NodeKind::Sub, a, b)
        }
        InstrKind::Sllw => {
            let (a, b) = two_regs(graph, operands)?;
            word_shift(graph, NodeKind::Shl, a, b)
        }
        InstrKind::Srlw => {
            let (a, b) = two_regs(graph, operands)?;
            word_shift(graph, NodeKind::LShr, a, b)
        }
        InstrKind::Sraw => {
            let (a, b) = two_regs(graph, operands)?;
            word_shift(graph, NodeKind::AShr, a, b)
        }
        InstrKind::Addi => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::Add, rs, imm)
        }
        InstrKind::Andi => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::And, rs, imm)
        }
        InstrKind::Ori => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::Or, rs, imm)
        }
        InstrKind::Xori => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::Xor, rs, imm)
        }
        InstrKind::Slti => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            compare(graph, NodeKind::Slt, rs, imm)
        }
        InstrKind::Sltiu => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            compare(graph, NodeKind::Ult, rs, imm)
        }
        InstrKind::Addiw => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            word_binary(graph, NodeKind::Add, rs, imm)
        }
        InstrKind::Slli => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_shift(graph, NodeKind::Shl, rs, imm)
        }
        InstrKind::Srli => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_shift(graph, NodeKind::LShr, rs, imm)
        }
        InstrKind::Srai => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_shift(graph, NodeKind::AShr, rs, imm)
        }
        InstrKind::Slliw => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            word_shift(graph, NodeKind::Shl, rs, imm)
        }
        InstrKind::Srliw => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            word_shift(graph, NodeKind::LShr, rs, imm)
        }
        InstrKind::Sraiw => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            word_shift(graph, NodeKind::AShr, rs, imm)
        }
        InstrKind::SlliUw => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            widening_shift_left(graph, rs, imm)
        }
    }
}

/// The earlier direct mapping: one node per instruction, immediates sign-extended, no
/// word handling and no shift-amount masking. Kept for comparison runs against scripts
/// generated before the width-aware catalog landed.
fn legacy(
    kind: InstrKind,
    graph: &mut Graph,
    operands: &[ValueId],
    attrs: &AttrMap,
) -> Result<ValueId> {
    match kind {
        InstrKind::Add => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Add, a, b)
        }
        InstrKind::Sub => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Sub, a, b)
        }
        InstrKind::Or => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Or, a, b)
        }
        InstrKind::Xor => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::Xor, a, b)
        }
        InstrKind::And => {
            let (a, b) = two_regs(graph, operands)?;
            direct_binary(graph, NodeKind::And, a, b)
        }
        InstrKind::Slt => {
            let (a, b) = two_regs(graph, operands)?;
            compare(graph, NodeKind::Slt, a, b)
        }
        InstrKind::Addi => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::Add, rs, imm)
        }
        InstrKind::Andi => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::And, rs, imm)
        }
        InstrKind::Ori => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::Or, rs, imm)
        }
        InstrKind::Xori => {
            let (rs, imm) = reg_and_immediate(kind, graph, operands, attrs)?;
            direct_binary(graph, NodeKind::Xor, rs, imm)
        }
        other => Err(IrError::UnsupportedInstruction(format!(
            "{} is not in the legacy catalog",
            other
        ))),
    }
}

fn expect_reg(graph: &Graph, value: ValueId) -> Result<ValueId> {
    if graph.value_type(value) != ValueType::Bitvec(REG_WIDTH) {
        return Err(IrError::InvalidOperand(format!(
            "register operand must be {}, got {}",
            ValueType::Bitvec(REG_WIDTH),
            graph.value_type(value)
        )));
    }
    Ok(value)
}

fn two_regs(graph: &Graph, operands: &[ValueId]) -> Result<(ValueId, ValueId)> {
    match operands {
        [a, b] => Ok((expect_reg(graph, *a)?, expect_reg(graph, *b)?)),
        _ => Err(IrError::InvalidOperand(format!(
            "expected 2 register operands, got {}",
            operands.len()
        ))),
    }
}

fn one_reg(graph: &Graph, operands: &[ValueId]) -> Result<ValueId> {
    match operands {
        [a] => expect_reg(graph, *a),
        _ => Err(IrError::InvalidOperand(format!(
            "expected 1 register operand, got {}",
            operands.len()
        ))),
    }
}

/// Resolve the register operand and the attribute-bound immediate, the latter
/// sign-extended to full width. Immediates are always sign-extended, matching
/// two's-complement immediate semantics; masking for shift amounts happens later in
/// the shift builders.
fn reg_and_immediate(
    kind: InstrKind,
    graph: &mut Graph,
    operands: &[ValueId],
    attrs: &AttrMap,
) -> Result<(ValueId, ValueId)> {
    let rs = one_reg(graph, operands)?;
    let OperandShape::RegImm { imm_width } = kind.shape() else {
        return Err(IrError::InvalidOperand(format!(
            "{} takes no immediate",
            kind
        )));
    };
    let imm = match attrs.get("immediate") {
        Some(AttrValue::Value(value)) => {
            if graph.value_type(*value) != ValueType::Bitvec(imm_width) {
                return Err(IrError::InvalidOperand(format!(
                    "{} immediate must be {}, got {}",
                    kind,
                    ValueType::Bitvec(imm_width),
                    graph.value_type(*value)
                )));
            }
            *value
        }
        Some(AttrValue::Literal(literal)) => {
            let masked = (*literal as u64) & mask(imm_width);
            graph.insert(
                NodeKind::Const {
                    value: BigUint::from(masked),
                },
                vec![],
                ValueType::Bitvec(imm_width),
            )?
        }
        None => {
            return Err(IrError::InvalidOperand(format!(
                "{} requires an immediate attribute",
                kind
            )))
        }
    };
    let extended = extend_to(graph, imm, REG_WIDTH, true)?;
    Ok((rs, extended))
}

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn direct_binary(graph: &mut Graph, op: NodeKind, a: ValueId, b: ValueId) -> Result<ValueId> {
    graph.insert(op, vec![a, b], ValueType::Bitvec(REG_WIDTH))
}

/// Comparison followed by boolean-to-bitvector coercion: the predicate selects between
/// the literal constants 1 and 0 at full width, never an all-ones pattern.
fn compare(graph: &mut Graph, op: NodeKind, a: ValueId, b: ValueId) -> Result<ValueId> {
    let predicate = graph.insert(op, vec![a, b], ValueType::Bool)?;
    let zero = graph.insert(
        NodeKind::Const {
            value: BigUint::from(0u32),
        },
        vec![],
        ValueType::Bitvec(REG_WIDTH),
    )?;
    let one = graph.insert(
        NodeKind::Const {
            value: BigUint::from(1u32),
        },
        vec![],
        ValueType::Bitvec(REG_WIDTH),
    )?;
    graph.insert(
        NodeKind::Select,
        vec![predicate, one, zero],
        ValueType::Bitvec(REG_WIDTH),
    )
}

fn direct_shift(graph: &mut Graph, op: NodeKind, value: ValueId, amount: ValueId) -> Result<ValueId> {
    let amount = mask_shift_amount(graph, amount, FULL_SHAMT_BITS, REG_WIDTH)?;
    graph.insert(op, vec![value, amount], ValueType::Bitvec(REG_WIDTH))
}

fn word_binary(graph: &mut Graph, op: NodeKind, a: ValueId, b: ValueId) -> Result<ValueId> {
    let a = truncate_to_half(graph, a)?;
    let b = truncate_to_half(graph, b)?;
    let result = graph.insert(op, vec![a, b], ValueType::Bitvec(HALF_WIDTH))?;
    extend_to(graph, result, REG_WIDTH, true)
}

fn word_shift(graph: &mut Graph, op: NodeKind, value: ValueId, amount: ValueId) -> Result<ValueId> {
    let value = truncate_to_half(graph, value)?;
    let amount = mask_shift_amount(graph, amount, WORD_SHAMT_BITS, HALF_WIDTH)?;
    let result = graph.insert(op, vec![value, amount], ValueType::Bitvec(HALF_WIDTH))?;
    extend_to(graph, result, REG_WIDTH, true)
}

/// The `slliuw` builder: the low word of the first operand is zero-extended, never
/// sign-extended, back to full width before the full-width shift.
fn widening_shift_left(graph: &mut Graph, value: ValueId, amount: ValueId) -> Result<ValueId> {
    let low = truncate_to_half(graph, value)?;
    let wide = extend_to(graph, low, REG_WIDTH, false)?;
    let amount = mask_shift_amount(graph, amount, FULL_SHAMT_BITS, REG_WIDTH)?;
    graph.insert(NodeKind::Shl, vec![wide, amount], ValueType::Bitvec(REG_WIDTH))
}
