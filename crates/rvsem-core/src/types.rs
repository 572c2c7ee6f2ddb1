use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a symbolic value in the graph.
///
/// Abstract operand types (`Register`, `Immediate`) describe instruction operands before
/// lowering; concrete types (`Bitvec`, `Bool`) are what primitive nodes operate on. The
/// two coexist in one vocabulary so that retyping an argument during lowering is an
/// ordinary graph edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Abstract integer register operand, width fixed by the architecture.
    Register,
    /// Abstract immediate operand of the given bit width.
    Immediate { width: u32, signed: bool },
    /// Concrete bitvector of the given width. Invariant: width > 0.
    Bitvec(u32),
    /// Concrete one-bit predicate, as produced by comparison nodes.
    Bool,
}

impl ValueType {
    pub fn is_concrete(&self) -> bool {
        matches!(self, ValueType::Bitvec(_) | ValueType::Bool)
    }

    pub fn bitvec_width(&self) -> Option<u32> {
        match self {
            ValueType::Bitvec(width) => Some(*width),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Register => write!(f, "reg"),
            ValueType::Immediate { width, signed: true } => write!(f, "imm{}", width),
            ValueType::Immediate { width, signed: false } => write!(f, "uimm{}", width),
            ValueType::Bitvec(width) => write!(f, "bv{}", width),
            ValueType::Bool => write!(f, "bool"),
        }
    }
}

/// Opaque ordering placeholder threaded through every lowering call.
///
/// The pure-arithmetic catalog never produces side-effecting nodes, so tokens are only
/// passed through, but builders keep the parameter so effectful instruction families can
/// join the same interface later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectToken(());

impl EffectToken {
    pub fn new() -> Self {
        Self(())
    }
}
