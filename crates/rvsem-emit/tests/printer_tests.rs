use pretty_assertions::assert_eq;
use rvsem_core::{Graph, NodeKind, ValueType};
use rvsem_emit::{PrinterConfig, ProofEmitter, TheoremDialect};
use rvsem_lower::{lower_instruction, InstrKind};

fn emit(kind: InstrKind, emitter: &ProofEmitter) -> String {
    let lowered = lower_instruction(kind).unwrap();
    emitter
        .emit_to_string(kind.mnemonic(), &lowered.graph, &lowered.results)
        .unwrap()
}

#[test]
fn test_addi_script_namespaced_dialect() {
    let emitter = ProofEmitter::new();
    let expected = "\
def _addi (a0 : BitVec 12) (a1 : BitVec 64) : BitVec 64 :=
  let a2 : BitVec 64 := (Extend.sign 64 a0) ;
  let a3 : BitVec 64 := (add a1 a2) ;
  a3
theorem addi_eq (a0 : BitVec 12) (a1 : BitVec 64) : RV64.addi a0 a1 = _addi a0 a1 := by
  unfold RV64.addi _addi
  bv_decide
";
    assert_eq!(emit(InstrKind::Addi, &emitter), expected);
}

#[test]
fn test_addi_script_bare_dialect() {
    let emitter = ProofEmitter::with_config(PrinterConfig {
        dialect: TheoremDialect::Bare,
    });
    let expected = "\
def _addi (a0 : BitVec 12) (a1 : BitVec 64) : BitVec 64 :=
  let a2 : BitVec 64 := (Extend.sign 64 a0) ;
  let a3 : BitVec 64 := (add a1 a2) ;
  a3
theorem addi_eq (a0 : BitVec 12) (a1 : BitVec 64) : addi a0 a1 = _addi a0 a1 := by
  bv_decide
";
    assert_eq!(emit(InstrKind::Addi, &emitter), expected);
}

#[test]
fn test_slt_script_coerces_through_cond() {
    let emitter = ProofEmitter::new();
    let expected = "\
def _slt (a0 : BitVec 64) (a1 : BitVec 64) : BitVec 64 :=
  let a2 : Bool := (slt a0 a1) ;
  let a3 : BitVec 64 := 0 ;
  let a4 : BitVec 64 := 1 ;
  let a5 : BitVec 64 := (cond a2 a4 a3) ;
  a5
theorem slt_eq (a0 : BitVec 64) (a1 : BitVec 64) : RV64.slt a0 a1 = _slt a0 a1 := by
  unfold RV64.slt _slt
  bv_decide
";
    assert_eq!(emit(InstrKind::Slt, &emitter), expected);
}

#[test]
fn test_sll_script_masks_the_amount() {
    let emitter = ProofEmitter::new();
    let expected = "\
def _sll (a0 : BitVec 64) (a1 : BitVec 64) : BitVec 64 :=
  let a2 : BitVec 6 := (extractLsb 5 0 a1) ;
  let a3 : BitVec 64 := (Extend.zero 64 a2) ;
  let a4 : BitVec 64 := (shiftLeft a0 (toNat a3)) ;
  a4
theorem sll_eq (a0 : BitVec 64) (a1 : BitVec 64) : RV64.sll a0 a1 = _sll a0 a1 := by
  unfold RV64.sll _sll
  bv_decide
";
    assert_eq!(emit(InstrKind::Sll, &emitter), expected);
}

#[test]
fn test_sraw_script_word_boundary() {
    let emitter = ProofEmitter::new();
    let expected = "\
def _sraw (a0 : BitVec 64) (a1 : BitVec 64) : BitVec 64 :=
  let a2 : BitVec 32 := (extractLsb 31 0 a0) ;
  let a3 : BitVec 5 := (extractLsb 4 0 a1) ;
  let a4 : BitVec 32 := (Extend.zero 32 a3) ;
  let a5 : BitVec 32 := (sshiftRight a2 (toNat a4)) ;
  let a6 : BitVec 64 := (Extend.sign 64 a5) ;
  a6
theorem sraw_eq (a0 : BitVec 64) (a1 : BitVec 64) : RV64.sraw a0 a1 = _sraw a0 a1 := by
  unfold RV64.sraw _sraw
  bv_decide
";
    assert_eq!(emit(InstrKind::Sraw, &emitter), expected);
}

#[test]
fn test_ids_are_injective_and_first_bound_first() {
    let emitter = ProofEmitter::new();
    for kind in InstrKind::ALL {
        let script = emit(kind, &emitter);
        let mut previous: Option<u32> = None;
        for line in script.lines() {
            let Some(rest) = line.strip_prefix("  let a") else {
                continue;
            };
            let bound: u32 = rest
                .split_whitespace()
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| panic!("{}: malformed binding {:?}", kind, line));

            // Strictly increasing bound ids.
            if let Some(previous) = previous {
                assert!(bound > previous, "{}: id {} after {}", kind, bound, previous);
            }
            previous = Some(bound);

            // Every reference on the right-hand side is to an earlier id.
            let rhs = line.split(":=").nth(1).unwrap();
            for token in rhs.split(|c: char| !c.is_alphanumeric()) {
                if let Some(reference) = token.strip_prefix('a') {
                    if let Ok(reference) = reference.parse::<u32>() {
                        assert!(
                            reference < bound,
                            "{}: binding a{} references later id a{}",
                            kind,
                            bound,
                            reference
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_fresh_id_table_per_invocation() {
    let emitter = ProofEmitter::new();
    let first = emit(InstrKind::Add, &emitter);
    let second = emit(InstrKind::Add, &emitter);
    assert_eq!(first, second);
    assert!(second.contains("(a0 : BitVec 64)"));
}

#[test]
fn test_opaque_node_is_unprintable_and_emits_nothing() {
    let mut graph = Graph::new();
    graph.add_arg(ValueType::Bitvec(64));
    let result = graph
        .insert(
            NodeKind::Opaque {
                name: "mystery".to_string(),
            },
            vec![],
            ValueType::Bitvec(64),
        )
        .unwrap();

    let emitter = ProofEmitter::new();
    let mut sink = Vec::new();
    let err = emitter.emit("mystery", &graph, &[result], &mut sink);
    assert!(err.is_err());
    assert!(sink.is_empty(), "failed emission must produce no output");
}

#[test]
fn test_every_instruction_prints() {
    let emitter = ProofEmitter::new();
    for kind in InstrKind::ALL {
        let script = emit(kind, &emitter);
        assert!(script.starts_with(&format!("def _{} ", kind.mnemonic())));
        assert!(script.contains(&format!("theorem {}_eq ", kind.mnemonic())));
        assert!(script.trim_end().ends_with("bv_decide"));
    }
}
