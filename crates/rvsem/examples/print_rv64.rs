//! Print the equivalence theorems for the full RV64 integer catalog to stdout.

use anyhow::Result;
use rvsem::{lower_instruction, InstrKind, ProofEmitter};

fn main() -> Result<()> {
    let emitter = ProofEmitter::new();
    let mut stdout = std::io::stdout().lock();

    for kind in InstrKind::ALL {
        let lowered = lower_instruction(kind)?;
        emitter.emit(kind.mnemonic(), &lowered.graph, &lowered.results, &mut stdout)?;
    }
    Ok(())
}
