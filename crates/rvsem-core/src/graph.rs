use crate::node::NodeKind;
use crate::types::ValueType;
use crate::{IrError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl std::fmt::Display for ValueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Where a value comes from. Every live value has exactly one producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Producer {
    Argument { index: u32 },
    Node(NodeId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValueData {
    ty: ValueType,
    producer: Producer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub inputs: Vec<ValueId>,
    pub result: ValueId,
}

/// Arena-indexed operation graph for a single instruction.
///
/// Nodes live in an arena and their visitation order in an explicit insertion-order
/// list, so topological order is construction order by design. Structural edits
/// (argument retyping, placeholder splicing) are explicit methods that rewrite every
/// use, never leaving dangling references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    values: Vec<ValueData>,
    nodes: Vec<Node>,
    order: Vec<NodeId>,
    args: Vec<ValueId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a graph-level argument of the given type, appended after any existing
    /// arguments.
    pub fn add_arg(&mut self, ty: ValueType) -> ValueId {
        let index = self.args.len() as u32;
        let id = self.new_value(ty, Producer::Argument { index });
        self.args.push(id);
        id
    }

    /// Arguments in declared order.
    pub fn args(&self) -> &[ValueId] {
        &self.args
    }

    pub fn value_type(&self, value: ValueId) -> ValueType {
        self.values[value.0 as usize].ty
    }

    pub fn producer(&self, value: ValueId) -> Producer {
        self.values[value.0 as usize].producer
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// Nodes in construction order; this is the canonical traversal for printing.
    pub fn nodes_in_order(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().map(|id| &self.nodes[id.0 as usize])
    }

    /// Number of nodes currently in the graph (spliced-out nodes excluded).
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Append a node, validating the kind's arity and type rules, and return its
    /// result value.
    pub fn insert(
        &mut self,
        kind: NodeKind,
        inputs: Vec<ValueId>,
        result_ty: ValueType,
    ) -> Result<ValueId> {
        for input in &inputs {
            if (input.0 as usize) >= self.values.len() {
                return Err(IrError::InvalidGraph(format!(
                    "input {} does not belong to this graph",
                    input
                )));
            }
        }
        self.validate(&kind, &inputs, result_ty)?;
        let node_id = NodeId(self.nodes.len() as u32);
        let result = self.new_value(result_ty, Producer::Node(node_id));
        self.nodes.push(Node {
            kind,
            inputs,
            result,
        });
        self.order.push(node_id);
        Ok(result)
    }

    pub fn last_node(&self) -> Option<NodeId> {
        self.order.last().copied()
    }

    /// Retype the argument at `index` in place: a fresh value takes its position and
    /// every use of the old value is rewritten to the new one.
    pub fn replace_arg(&mut self, index: usize, ty: ValueType) -> Result<ValueId> {
        let old = *self.args.get(index).ok_or_else(|| {
            IrError::InvalidGraph(format!("no argument at index {}", index))
        })?;
        let new = self.new_value(
            ty,
            Producer::Argument {
                index: index as u32,
            },
        );
        self.args[index] = new;
        self.replace_uses(old, new);
        Ok(new)
    }

    /// Rewrite every node input referencing `old` to reference `new`.
    pub fn replace_uses(&mut self, old: ValueId, new: ValueId) {
        for node in &mut self.nodes {
            for input in &mut node.inputs {
                if *input == old {
                    *input = new;
                }
            }
        }
    }

    /// Remove `node` from the graph, aliasing its former result to `replacement`.
    pub fn splice(&mut self, node: NodeId, replacement: ValueId) -> Result<()> {
        let position = self
            .order
            .iter()
            .position(|id| *id == node)
            .ok_or_else(|| IrError::InvalidGraph(format!("node {} is not in the graph", node)))?;
        let result = self.nodes[node.0 as usize].result;
        self.replace_uses(result, replacement);
        self.order.remove(position);
        Ok(())
    }

    fn new_value(&mut self, ty: ValueType, producer: Producer) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueData { ty, producer });
        id
    }

    fn bitvec_width(&self, value: ValueId) -> Result<u32> {
        self.value_type(value).bitvec_width().ok_or_else(|| {
            IrError::InvalidOperand(format!(
                "expected a bitvector operand, got {}",
                self.value_type(value)
            ))
        })
    }

    fn validate(&self, kind: &NodeKind, inputs: &[ValueId], result_ty: ValueType) -> Result<()> {
        if let Some(arity) = kind.arity() {
            if inputs.len() != arity {
                return Err(IrError::InvalidOperand(format!(
                    "{} expects {} operands, got {}",
                    kind,
                    arity,
                    inputs.len()
                )));
            }
        }
        match kind {
            NodeKind::Add
            | NodeKind::Sub
            | NodeKind::And
            | NodeKind::Or
            | NodeKind::Xor
            | NodeKind::Shl
            | NodeKind::LShr
            | NodeKind::AShr => {
                let lhs = self.bitvec_width(inputs[0])?;
                let rhs = self.bitvec_width(inputs[1])?;
                if lhs != rhs || result_ty != ValueType::Bitvec(lhs) {
                    return Err(IrError::InvalidOperand(format!(
                        "{} requires equal operand and result widths, got {} and {} -> {}",
                        kind,
                        ValueType::Bitvec(lhs),
                        ValueType::Bitvec(rhs),
                        result_ty
                    )));
                }
            }
            NodeKind::Slt | NodeKind::Ult => {
                let lhs = self.bitvec_width(inputs[0])?;
                let rhs = self.bitvec_width(inputs[1])?;
                if lhs != rhs {
                    return Err(IrError::InvalidOperand(format!(
                        "{} requires equal operand widths, got {} and {}",
                        kind, lhs, rhs
                    )));
                }
                if result_ty != ValueType::Bool {
                    return Err(IrError::InvalidOperand(format!(
                        "{} produces bool, got {}",
                        kind, result_ty
                    )));
                }
            }
            NodeKind::SignExtend | NodeKind::ZeroExtend => {
                let source = self.bitvec_width(inputs[0])?;
                match result_ty.bitvec_width() {
                    Some(target) if target >= source => {}
                    _ => {
                        return Err(IrError::InvalidOperand(format!(
                            "{} from width {} requires a bitvector result at least as wide, got {}",
                            kind, source, result_ty
                        )));
                    }
                }
            }
            NodeKind::Extract { end, start } => {
                let source = self.bitvec_width(inputs[0])?;
                if *start > *end || *end >= source {
                    return Err(IrError::InvalidOperand(format!(
                        "extract bounds [{}:{}] out of range for width {}",
                        end, start, source
                    )));
                }
                let width = end - start + 1;
                if result_ty != ValueType::Bitvec(width) {
                    return Err(IrError::InvalidOperand(format!(
                        "extract [{}:{}] produces {}, got {}",
                        end,
                        start,
                        ValueType::Bitvec(width),
                        result_ty
                    )));
                }
            }
            NodeKind::Select => {
                if self.value_type(inputs[0]) != ValueType::Bool {
                    return Err(IrError::InvalidOperand(format!(
                        "select condition must be bool, got {}",
                        self.value_type(inputs[0])
                    )));
                }
                let then_ty = self.value_type(inputs[1]);
                let else_ty = self.value_type(inputs[2]);
                if !then_ty.is_concrete() || then_ty != else_ty || then_ty != result_ty {
                    return Err(IrError::InvalidOperand(format!(
                        "select branches must agree with the result, got {} and {} -> {}",
                        then_ty, else_ty, result_ty
                    )));
                }
            }
            NodeKind::Const { value } => {
                let width = result_ty.bitvec_width().ok_or_else(|| {
                    IrError::InvalidOperand(format!(
                        "constant requires a bitvector result, got {}",
                        result_ty
                    ))
                })?;
                if width == 0 {
                    return Err(IrError::InvalidOperand(
                        "constant width must be positive".to_string(),
                    ));
                }
                if value.bits() > u64::from(width) {
                    return Err(IrError::InvalidOperand(format!(
                        "constant {} does not fit in {} bits",
                        value, width
                    )));
                }
            }
            NodeKind::Opaque { .. } => {}
        }
        Ok(())
    }
}
