use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed primitive bitvector vocabulary.
///
/// Every consumer dispatches on this enum with an exhaustive match, so adding a kind
/// without teaching the validator, evaluator, and printer about it is a compile error
/// rather than a runtime surprise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Add,
    Sub,
    And,
    Or,
    Xor,
    /// Extend to the result width, replicating the sign bit.
    SignExtend,
    /// Extend to the result width with zero fill.
    ZeroExtend,
    /// Bit slice with literal bounds, inclusive, counted from the LSB.
    Extract { end: u32, start: u32 },
    Shl,
    LShr,
    AShr,
    /// Signed less-than; produces a Bool.
    Slt,
    /// Unsigned less-than; produces a Bool.
    Ult,
    /// Conditional select: (cond, then, else).
    Select,
    /// Literal constant; the payload is interpreted at the result width.
    Const { value: BigUint },
    /// Placeholder for a not-yet-lowered instruction. Never printable; the lowering
    /// harness splices it out before a graph leaves the crate.
    Opaque { name: String },
}

impl NodeKind {
    /// Number of value inputs the kind consumes, or None when unconstrained (Opaque).
    pub fn arity(&self) -> Option<usize> {
        match self {
            NodeKind::Add
            | NodeKind::Sub
            | NodeKind::And
            | NodeKind::Or
            | NodeKind::Xor
            | NodeKind::Shl
            | NodeKind::LShr
            | NodeKind::AShr
            | NodeKind::Slt
            | NodeKind::Ult => Some(2),
            NodeKind::SignExtend | NodeKind::ZeroExtend | NodeKind::Extract { .. } => Some(1),
            NodeKind::Select => Some(3),
            NodeKind::Const { .. } => Some(0),
            NodeKind::Opaque { .. } => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Add => write!(f, "add"),
            NodeKind::Sub => write!(f, "sub"),
            NodeKind::And => write!(f, "and"),
            NodeKind::Or => write!(f, "or"),
            NodeKind::Xor => write!(f, "xor"),
            NodeKind::SignExtend => write!(f, "sext"),
            NodeKind::ZeroExtend => write!(f, "zext"),
            NodeKind::Extract { end, start } => write!(f, "extract[{}:{}]", end, start),
            NodeKind::Shl => write!(f, "shl"),
            NodeKind::LShr => write!(f, "lshr"),
            NodeKind::AShr => write!(f, "ashr"),
            NodeKind::Slt => write!(f, "slt"),
            NodeKind::Ult => write!(f, "ult"),
            NodeKind::Select => write!(f, "select"),
            NodeKind::Const { value } => write!(f, "const {}", value),
            NodeKind::Opaque { name } => write!(f, "opaque<{}>", name),
        }
    }
}
