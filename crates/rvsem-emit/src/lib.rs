/*! Turn lowered instruction graphs into Lean proof scripts.
 *
 * The output surface is consumed verbatim by a proof checker, so everything here is
 * deterministic: ids are assigned in first-reference order, nodes are visited in
 * construction order, and each binding may reference only previously bound ids. The
 * theorem wrapper comes in two presentation dialects selected by configuration.
 */

pub mod config;
pub mod printer;

pub use config::{PrinterConfig, TheoremDialect};
pub use printer::ProofEmitter;
