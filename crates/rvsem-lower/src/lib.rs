/*! Lowering of RV64 integer instructions to bitvector operation graphs.
 *
 * Each instruction kind maps to a small composition of primitive bitvector nodes:
 * full-width operations directly, word-sized variants through truncation and
 * sign-extension at their boundary, immediates through sign-extended constants. The
 * harness packages a single instruction into a fresh graph ready for proof printing.
 */

pub mod adapters;
pub mod catalog;
pub mod harness;
pub mod type_lowering;

pub use catalog::{
    build_semantics, AttrMap, AttrValue, CatalogGeneration, InstrKind, OperandShape,
};
pub use harness::{lower_instruction, lower_instruction_with, LoweredInstruction};
pub use type_lowering::lower_type;

/// Width of the modeled integer register file.
pub const REG_WIDTH: u32 = 64;

/// Width of the word-sized view of a register.
pub const HALF_WIDTH: u32 = REG_WIDTH / 2;
