use crate::config::{PrinterConfig, TheoremDialect};
use anyhow::Result;
use indexmap::IndexMap;
use rvsem_core::{Graph, IrError, Node, NodeKind, ValueId, ValueType};
use std::fmt::Write as _;
use std::io::Write;

const INDENT: &str = "  ";

/// Printed ids in first-reference order, starting at 0.
///
/// One table per emit call. The table must never be shared between invocations:
/// carried-over entries would silently renumber every later script.
#[derive(Debug, Default)]
struct IdTable {
    ids: IndexMap<ValueId, u32>,
}

impl IdTable {
    fn id(&mut self, value: ValueId) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(value).or_insert(next)
    }
}

fn lean_type(ty: ValueType) -> std::result::Result<String, IrError> {
    match ty {
        ValueType::Bitvec(width) => Ok(format!("BitVec {}", width)),
        ValueType::Bool => Ok("Bool".to_string()),
        other => Err(IrError::UnsupportedPrint(format!(
            "cannot render type {}",
            other
        ))),
    }
}

/// Renders one instruction-equivalence theorem per lowered graph.
#[derive(Debug, Clone, Default)]
pub struct ProofEmitter {
    config: PrinterConfig,
}

impl ProofEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PrinterConfig) -> Self {
        Self { config }
    }

    /// Write the definition and theorem for `graph` to `writer`.
    ///
    /// The script is rendered in full before anything is written, so a failure
    /// produces no partial output.
    pub fn emit<W: Write>(
        &self,
        name: &str,
        graph: &Graph,
        results: &[ValueId],
        writer: &mut W,
    ) -> Result<()> {
        let script = self.emit_to_string(name, graph, results)?;
        writer.write_all(script.as_bytes())?;
        Ok(())
    }

    pub fn emit_to_string(&self, name: &str, graph: &Graph, results: &[ValueId]) -> Result<String> {
        if results.len() != 1 {
            return Err(IrError::InvalidOperand(format!(
                "proof printing expects exactly one result, got {}",
                results.len()
            ))
            .into());
        }

        let mut ids = IdTable::default();
        let mut typed_args = Vec::new();
        let mut args = Vec::new();
        for arg in graph.args() {
            let id = ids.id(*arg);
            typed_args.push(format!("(a{} : {})", id, lean_type(graph.value_type(*arg))?));
            args.push(format!("a{}", id));
        }
        let typed_args = typed_args.join(" ");
        let args = args.join(" ");
        let result_ty = lean_type(graph.value_type(results[0]))?;

        let mut out = String::new();
        writeln!(out, "def _{} {} : {} :=", name, typed_args, result_ty)?;
        for node in graph.nodes_in_order() {
            writeln!(out, "{}{}", INDENT, render_node(graph, node, &mut ids)?)?;
        }
        writeln!(out, "{}a{}", INDENT, ids.id(results[0]))?;

        let reference = match &self.config.dialect {
            TheoremDialect::Bare => name.to_string(),
            TheoremDialect::Namespaced { namespace } => format!("{}.{}", namespace, name),
        };
        writeln!(
            out,
            "theorem {}_eq {} : {} {} = _{} {} := by",
            name, typed_args, reference, args, name, args
        )?;
        if matches!(self.config.dialect, TheoremDialect::Namespaced { .. }) {
            writeln!(out, "{}unfold {} _{}", INDENT, reference, name)?;
        }
        writeln!(out, "{}bv_decide", INDENT)?;
        Ok(out)
    }
}

fn render_node(graph: &Graph, node: &Node, ids: &mut IdTable) -> std::result::Result<String, IrError> {
    let result = ids.id(node.result);
    let ty = lean_type(graph.value_type(node.result))?;

    let binary = |fn_name: &str, ids: &mut IdTable| {
        format!(
            "let a{} : {} := ({} a{} a{}) ;",
            result,
            ty,
            fn_name,
            ids.id(node.inputs[0]),
            ids.id(node.inputs[1])
        )
    };
    let shift = |fn_name: &str, ids: &mut IdTable| {
        format!(
            "let a{} : {} := ({} a{} (toNat a{})) ;",
            result,
            ty,
            fn_name,
            ids.id(node.inputs[0]),
            ids.id(node.inputs[1])
        )
    };

    match &node.kind {
        NodeKind::Add => Ok(binary("add", ids)),
        NodeKind::Sub => Ok(binary("sub", ids)),
        NodeKind::And => Ok(binary("and", ids)),
        NodeKind::Or => Ok(binary("or", ids)),
        NodeKind::Xor => Ok(binary("xor", ids)),
        NodeKind::Slt => Ok(binary("slt", ids)),
        NodeKind::Ult => Ok(binary("ult", ids)),
        NodeKind::Shl => Ok(shift("shiftLeft", ids)),
        NodeKind::LShr => Ok(shift("ushiftRight", ids)),
        NodeKind::AShr => Ok(shift("sshiftRight", ids)),
        NodeKind::SignExtend | NodeKind::ZeroExtend => {
            let mode = if matches!(node.kind, NodeKind::SignExtend) {
                "sign"
            } else {
                "zero"
            };
            let width = graph.value_type(node.result).bitvec_width().ok_or_else(|| {
                IrError::UnsupportedPrint(format!("extend with non-bitvector result: {}", ty))
            })?;
            Ok(format!(
                "let a{} : {} := (Extend.{} {} a{}) ;",
                result,
                ty,
                mode,
                width,
                ids.id(node.inputs[0])
            ))
        }
        NodeKind::Extract { end, start } => Ok(format!(
            "let a{} : {} := (extractLsb {} {} a{}) ;",
            result,
            ty,
            end,
            start,
            ids.id(node.inputs[0])
        )),
        NodeKind::Select => Ok(format!(
            "let a{} : {} := (cond a{} a{} a{}) ;",
            result,
            ty,
            ids.id(node.inputs[0]),
            ids.id(node.inputs[1]),
            ids.id(node.inputs[2])
        )),
        NodeKind::Const { value } => Ok(format!("let a{} : {} := {} ;", result, ty, value)),
        NodeKind::Opaque { name } => Err(IrError::UnsupportedPrint(format!(
            "no printer template for opaque node {}",
            name
        ))),
    }
}
