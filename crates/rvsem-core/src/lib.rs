/*! Typed bitvector operation graphs for instruction semantics.
 *
 * Proving an instruction-set model equivalent to its bitvector encoding needs a
 * representation where every primitive operation, width change, and value reference is
 * explicit. This crate provides the building blocks: a typed value/node arena, the fixed
 * primitive bitvector vocabulary, and a concrete evaluator for checking lowered graphs
 * against reference semantics.
 */

pub mod eval;
pub mod graph;
pub mod node;
pub mod types;

pub use eval::{eval, Concrete};
pub use graph::{Graph, Node, NodeId, Producer, ValueId};
pub use node::NodeKind;
pub use types::{EffectToken, ValueType};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
    #[error("Unsupported instruction: {0}")]
    UnsupportedInstruction(String),
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),
    #[error("Unsupported print: {0}")]
    UnsupportedPrint(String),
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
