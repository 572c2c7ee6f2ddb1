use crate::catalog::{
    build_semantics, AttrMap, AttrValue, CatalogGeneration, InstrKind, OperandShape,
};
use crate::type_lowering::lower_type;
use rvsem_core::{EffectToken, Graph, IrError, NodeKind, Producer, Result, ValueId, ValueType};
use tracing::debug;

/// A single instruction lowered to its bitvector graph. Built fresh per request and
/// discarded once its proof text is emitted.
#[derive(Debug, Clone)]
pub struct LoweredInstruction {
    pub kind: InstrKind,
    pub graph: Graph,
    pub results: Vec<ValueId>,
}

/// Lower `kind` with the authoritative width-aware catalog.
pub fn lower_instruction(kind: InstrKind) -> Result<LoweredInstruction> {
    lower_instruction_with(kind, CatalogGeneration::default())
}

/// Lower `kind` with an explicit catalog generation.
///
/// Builds a graph holding one placeholder instruction node with fresh arguments typed
/// per the declared operand shape, lowers every argument type in place, invokes the
/// catalog entry (immediates bound through the `"immediate"` attribute), and splices
/// the placeholder out, aliasing its output to the produced result.
pub fn lower_instruction_with(
    kind: InstrKind,
    generation: CatalogGeneration,
) -> Result<LoweredInstruction> {
    let mut graph = Graph::new();

    let declared: Vec<ValueType> = match kind.shape() {
        OperandShape::RegReg => vec![ValueType::Register, ValueType::Register],
        OperandShape::RegImm { imm_width } => vec![
            ValueType::Immediate {
                width: imm_width,
                signed: true,
            },
            ValueType::Register,
        ],
    };
    for ty in &declared {
        graph.add_arg(*ty);
    }

    let placeholder_result = graph.insert(
        NodeKind::Opaque {
            name: kind.mnemonic().to_string(),
        },
        vec![],
        ValueType::Register,
    )?;
    let placeholder = match graph.producer(placeholder_result) {
        Producer::Node(id) => id,
        Producer::Argument { .. } => {
            return Err(IrError::InvalidGraph(
                "placeholder result has no producing node".to_string(),
            ))
        }
    };

    for (index, ty) in declared.iter().enumerate() {
        let lowered = lower_type(*ty)?;
        graph.replace_arg(index, lowered)?;
    }

    let args = graph.args().to_vec();
    let (operands, attrs) = match kind.shape() {
        OperandShape::RegReg => (args, AttrMap::new()),
        OperandShape::RegImm { .. } => {
            let mut attrs = AttrMap::new();
            attrs.insert("immediate".to_string(), AttrValue::Value(args[0]));
            (vec![args[1]], attrs)
        }
    };

    debug!(instr = %kind, operands = operands.len(), "lowering instruction");

    let state = EffectToken::new();
    let (results, _state) = build_semantics(generation, kind, &mut graph, &operands, &attrs, state)?;
    if results.len() != 1 {
        return Err(IrError::InvalidOperand(format!(
            "{} must produce exactly one result, got {}",
            kind,
            results.len()
        )));
    }

    graph.splice(placeholder, results[0])?;

    Ok(LoweredInstruction {
        kind,
        graph,
        results,
    })
}
