use crate::REG_WIDTH;
use rvsem_core::{IrError, Result, ValueType};

/// Map an abstract operand type to its concrete bitvector type.
///
/// Registers become full-width bitvectors, immediates keep their declared width.
/// Already-concrete types have no lowering and are refused.
pub fn lower_type(ty: ValueType) -> Result<ValueType> {
    match ty {
        ValueType::Register => Ok(ValueType::Bitvec(REG_WIDTH)),
        ValueType::Immediate { width, .. } if width > 0 && width <= REG_WIDTH => {
            Ok(ValueType::Bitvec(width))
        }
        other => Err(IrError::UnsupportedType(format!(
            "no bitvector lowering for {}",
            other
        ))),
    }
}
