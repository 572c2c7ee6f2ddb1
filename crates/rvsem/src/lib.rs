/*! Unified interface for instruction-equivalence theorem generation.
 *
 * Single import for the whole pipeline: lowering an RV64 instruction to its bitvector
 * graph and printing the Lean theorem that equates the reference semantics with the
 * generated definition.
 */

pub use rvsem_core as core;
pub use rvsem_emit as emit;
pub use rvsem_lower as lower;

pub use rvsem_core::{EffectToken, Graph, IrError, NodeKind, ValueId, ValueType};

pub use rvsem_lower::{
    lower_instruction, lower_instruction_with, CatalogGeneration, InstrKind, LoweredInstruction,
};

pub use rvsem_emit::{PrinterConfig, ProofEmitter, TheoremDialect};
