//! Memory reads and arithmetic over them
//!
//! [`MemoryAccessor`] is a single sized read, optionally through a pointer
//! chain. Arithmetic with constants or other reads produces
//! [`ModifiedMemoryAccessor`] (`*`, `/`, `%`, `&`, `^`) or [`MemoryValue`]
//! (`+`, `-`) nodes, which lower into `AddSource`/`SubSource` rows.

mod accessor;
mod value;

pub use accessor::MemoryAccessor;
pub use value::{MemoryTerm, MemoryValue, ModifiedMemoryAccessor};

use crate::data::{Field, RequirementOperator};
use crate::error::{CompileError, CompileResult};
use crate::expr::{Expression, ExpressionKind, MathematicOperation};

/// Fold `left op right` when either side reads memory
///
/// Both operands must already be evaluated. Returns `Ok(None)` when the
/// pairing has no memory form, in which case the mathematic node is kept.
pub fn combine(
    left: &Expression,
    operation: MathematicOperation,
    right: &Expression,
) -> CompileResult<Option<Expression>> {
    let is_memory = |e: &Expression| {
        matches!(
            e.kind,
            ExpressionKind::MemoryAccessor(_)
                | ExpressionKind::ModifiedMemoryAccessor(_)
                | ExpressionKind::MemoryValue(_)
        )
    };
    if !is_memory(left) && !is_memory(right) {
        return Ok(None);
    }

    match operation {
        MathematicOperation::Add | MathematicOperation::Subtract => {
            let (Some(l), Some(r)) = (
                MemoryValue::from_expression(left),
                MemoryValue::from_expression(right),
            ) else {
                return Ok(None);
            };
            let subtract = operation == MathematicOperation::Subtract;
            Ok(Some(l.merge(r, subtract).simplify()))
        }
        _ => modify(left, operation, right),
    }
}

fn modify(
    left: &Expression,
    operation: MathematicOperation,
    right: &Expression,
) -> CompileResult<Option<Expression>> {
    let ExpressionKind::MemoryAccessor(accessor) = &left.kind else {
        // 4 * byte(1)  =>  byte(1) * 4
        if operation.is_commutative()
            && left.as_integer().is_some()
            && matches!(right.kind, ExpressionKind::MemoryAccessor(_))
        {
            return modify(right, operation, left);
        }
        return Ok(None);
    };

    let operand = match &right.kind {
        ExpressionKind::IntegerConstant(constant) => {
            if constant.is_zero()
                && matches!(operation, MathematicOperation::Divide | MathematicOperation::Modulus)
            {
                return Err(CompileError::fold("Division by zero").with_location(right.location));
            }
            if constant.value == 1
                && matches!(operation, MathematicOperation::Multiply | MathematicOperation::Divide)
            {
                return Ok(Some(left.clone()));
            }
            Field::value(constant.as_u32())
        }
        // a second read is only addressable through the same chain
        ExpressionKind::MemoryAccessor(other)
            if !other.has_pointer_chain() || other.pointer_chain == accessor.pointer_chain =>
        {
            other.field
        }
        _ => return Ok(None),
    };

    let modifier: (RequirementOperator, Field) = (operation.to_requirement_operator(), operand);
    let modified = ModifiedMemoryAccessor::new(accessor.clone(), Some(modifier));
    Ok(Some(Expression::new(ExpressionKind::ModifiedMemoryAccessor(modified))))
}
