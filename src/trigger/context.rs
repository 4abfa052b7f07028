//! Lowering of single conditions into requirement rows

use crate::data::{Field, Requirement, RequirementType};
use crate::error::{CompileError, CompileResult};
use crate::expr::{ComparisonOperation, ConditionalOperation, Expression, ExpressionKind};
use crate::memory::{MemoryTerm, MemoryValue, ModifiedMemoryAccessor};
use crate::scope::InterpreterScope;

/// Requirement list under construction
///
/// `last_requirement` indexes the row most recently pushed. Function
/// lowerings use it to retype or stamp the terminal row of a condition.
#[derive(Debug, Clone, Default)]
pub struct TriggerBuilderContext {
    trigger: Vec<Requirement>,
    last_requirement: Option<usize>,
}

impl TriggerBuilderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, requirement: Requirement) {
        self.trigger.push(requirement);
        self.last_requirement = Some(self.trigger.len() - 1);
    }

    pub fn extend(&mut self, requirements: impl IntoIterator<Item = Requirement>) {
        for requirement in requirements {
            self.push(requirement);
        }
    }

    pub fn len(&self) -> usize {
        self.trigger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trigger.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.trigger
    }

    pub fn last_requirement(&self) -> Option<&Requirement> {
        self.last_requirement.and_then(|i| self.trigger.get(i))
    }

    pub fn last_requirement_mut(&mut self) -> Option<&mut Requirement> {
        self.last_requirement.and_then(|i| self.trigger.get_mut(i))
    }

    /// Seal the context
    pub fn into_requirements(self) -> Vec<Requirement> {
        self.trigger
    }

    /// Emit the rows for one condition. `&&` chains are joined with
    /// `AndNext`; `||` must already have been split into alternates.
    pub fn build_condition(&mut self, expression: &Expression, scope: &InterpreterScope<'_>) -> CompileResult<()> {
        self.build_condition_node(expression, scope)
            .map_err(|e| e.with_location(expression.location))
    }

    fn build_condition_node(&mut self, expression: &Expression, scope: &InterpreterScope<'_>) -> CompileResult<()> {
        match &expression.kind {
            ExpressionKind::Comparison {
                left,
                operation,
                right,
            } => self.build_comparison(left, *operation, right),

            ExpressionKind::BooleanConstant(true) | ExpressionKind::AlwaysTrue => {
                self.push(Requirement::always_true());
                Ok(())
            }
            ExpressionKind::BooleanConstant(false) | ExpressionKind::AlwaysFalse => {
                self.push(Requirement::always_false());
                Ok(())
            }

            ExpressionKind::Conditional {
                operation: ConditionalOperation::And,
                operands,
            } => {
                for (i, operand) in operands.iter().enumerate() {
                    self.build_condition(operand, scope)?;
                    if i + 1 == operands.len() {
                        break;
                    }
                    if let Some(last) = self.last_requirement_mut() {
                        if last.requirement_type == RequirementType::None {
                            last.requirement_type = RequirementType::AndNext;
                        }
                    }
                }
                Ok(())
            }

            ExpressionKind::Conditional {
                operation: ConditionalOperation::Or,
                ..
            } => Err(CompileError::usage(
                "Nested OR conditions are not supported in this context",
            )),

            ExpressionKind::FunctionCall(call) => {
                let function = scope.get_function(&call.name).ok_or_else(|| {
                    CompileError::unresolved(format!("Unknown function: {}", call.name))
                })?;
                function.build_trigger(self, call, scope)
            }

            _ => Err(CompileError::conversion(format!(
                "Incomplete trigger condition: {}",
                expression
            ))),
        }
    }

    fn build_comparison(
        &mut self,
        left: &Expression,
        operation: ComparisonOperation,
        right: &Expression,
    ) -> CompileResult<()> {
        let (left_field, chain_start) = match &left.kind {
            ExpressionKind::MemoryAccessor(accessor) => {
                let start = self.len();
                self.extend(accessor.pointer_chain.iter().copied());
                (accessor.field, start)
            }
            ExpressionKind::ModifiedMemoryAccessor(modified) => {
                self.build_source(modified, RequirementType::AddSource);
                (Field::value(0), self.len())
            }
            ExpressionKind::MemoryValue(value) => self.build_memory_value(value),
            _ => {
                return Err(CompileError::conversion(format!(
                    "Incomplete trigger condition: {}",
                    Expression::comparison(left.clone(), operation, right.clone())
                ))
                .with_location(left.location));
            }
        };
        let left_chain = &self.trigger[chain_start..];

        let right_field = match &right.kind {
            ExpressionKind::IntegerConstant(constant) => Field::value(constant.as_u32()),
            ExpressionKind::FloatConstant(constant) => Field::float(constant.value),
            ExpressionKind::BooleanConstant(value) => Field::value(u32::from(*value)),
            ExpressionKind::MemoryAccessor(accessor) if accessor.pointer_chain[..] == *left_chain => {
                accessor.field
            }
            ExpressionKind::MemoryAccessor(_) => {
                return Err(CompileError::conversion(
                    "Cannot compare values from different pointer chains",
                )
                .with_location(right.location));
            }
            _ => {
                return Err(CompileError::conversion(format!(
                    "Cannot compare to {}",
                    right
                ))
                .with_location(right.location));
            }
        };

        self.push(Requirement::compare(
            left_field,
            operation.to_requirement_operator(),
            right_field,
        ));
        Ok(())
    }

    /// Emit `accessor` as an accumulator row of `requirement_type`
    fn build_source(&mut self, accessor: &ModifiedMemoryAccessor, requirement_type: RequirementType) {
        accessor.build_trigger(self);
        if let Some(last) = self.last_requirement_mut() {
            last.requirement_type = requirement_type;
        }
    }

    /// Emit every term but one as `AddSource`/`SubSource` rows, returning
    /// the field the comparison reads and where its pointer chain starts
    fn build_memory_value(&mut self, value: &MemoryValue) -> (Field, usize) {
        // the last plain added term becomes the comparison's left side
        let terminal = value
            .terms
            .iter()
            .rposition(|t| !t.subtract && t.accessor.is_plain());

        for (i, MemoryTerm { accessor, subtract }) in value.terms.iter().enumerate() {
            if Some(i) == terminal {
                continue;
            }
            let requirement_type = if *subtract {
                RequirementType::SubSource
            } else {
                RequirementType::AddSource
            };
            self.build_source(accessor, requirement_type);
        }

        if value.constant != 0 {
            let requirement_type = if value.constant < 0 {
                RequirementType::SubSource
            } else {
                RequirementType::AddSource
            };
            self.push(Requirement::modifier(
                requirement_type,
                Field::value(value.constant.unsigned_abs()),
            ));
        }

        match terminal {
            Some(i) => {
                let accessor = &value.terms[i].accessor.accessor;
                let start = self.len();
                self.extend(accessor.pointer_chain.iter().copied());
                (accessor.field, start)
            }
            None => (Field::value(0), self.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FieldSize, RequirementOperator};
    use crate::error::CompileErrorKind;
    use crate::expr::MathematicOperation;
    use crate::memory::MemoryAccessor;

    fn byte(address: u32) -> Expression {
        Expression::memory_accessor(MemoryAccessor::at(FieldSize::Byte, address))
    }

    fn build(expression: &Expression) -> CompileResult<Vec<Requirement>> {
        let scope = InterpreterScope::new();
        let clause = scope.trigger_clause();
        let evaluated = expression.evaluate(&clause)?;
        let mut context = TriggerBuilderContext::new();
        context.build_condition(&evaluated, &clause)?;
        Ok(context.into_requirements())
    }

    #[test]
    fn test_single_comparison() {
        let rows = build(&Expression::comparison(byte(0x1234), ComparisonOperation::Equal, Expression::integer(5))).unwrap();
        assert_eq!(
            rows,
            vec![Requirement::compare(
                Field::memory(FieldSize::Byte, 0x1234),
                RequirementOperator::Equal,
                Field::value(5)
            )]
        );
    }

    #[test]
    fn test_and_chain() {
        let expr = Expression::and(vec![
            Expression::comparison(byte(1), ComparisonOperation::Equal, Expression::integer(1)),
            Expression::comparison(byte(2), ComparisonOperation::Equal, Expression::integer(2)),
            Expression::comparison(byte(3), ComparisonOperation::Equal, Expression::integer(3)),
        ]);
        let rows = build(&expr).unwrap();
        let types: Vec<_> = rows.iter().map(|r| r.requirement_type).collect();
        assert_eq!(
            types,
            vec![RequirementType::AndNext, RequirementType::AndNext, RequirementType::None]
        );
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(build(&Expression::boolean(true)).unwrap(), vec![Requirement::always_true()]);
        assert_eq!(build(&Expression::always_false()).unwrap(), vec![Requirement::always_false()]);
    }

    #[test]
    fn test_pointer_chain_precedes_comparison() {
        let pointer = Expression::call("dword", vec![Expression::integer(0x10)]);
        let value = Expression::call(
            "byte",
            vec![Expression::mathematic(pointer, MathematicOperation::Add, Expression::integer(8))],
        );
        let rows = build(&Expression::comparison(value, ComparisonOperation::Equal, Expression::integer(1))).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            Requirement::modifier(RequirementType::AddAddress, Field::memory(FieldSize::DWord, 0x10))
        );
        assert_eq!(rows[1].left, Field::memory(FieldSize::Byte, 8));
    }

    #[test]
    fn test_memory_value_lowering() {
        // byte(1) - byte(2) + 4 > byte(3)  evaluates to a memory value vs memory
        let sum = Expression::mathematic(
            Expression::mathematic(byte(1), MathematicOperation::Subtract, byte(2)),
            MathematicOperation::Add,
            Expression::integer(4),
        );
        let rows = build(&Expression::comparison(sum, ComparisonOperation::GreaterThan, byte(3))).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].requirement_type, RequirementType::SubSource);
        assert_eq!(rows[0].left, Field::memory(FieldSize::Byte, 2));
        assert_eq!(rows[1], Requirement::modifier(RequirementType::AddSource, Field::value(4)));
        assert_eq!(rows[2].left, Field::memory(FieldSize::Byte, 1));
        assert_eq!(rows[2].right, Field::memory(FieldSize::Byte, 3));
        assert_eq!(rows[2].requirement_type, RequirementType::None);
    }

    #[test]
    fn test_modified_accessor_becomes_add_source() {
        let scaled = Expression::mathematic(byte(1), MathematicOperation::Multiply, Expression::integer(2));
        let rows = build(&Expression::comparison(scaled, ComparisonOperation::Equal, Expression::integer(6))).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].requirement_type, RequirementType::AddSource);
        assert_eq!(rows[0].operator, RequirementOperator::Multiply);
        assert_eq!(rows[1], Requirement::compare(Field::value(0), RequirementOperator::Equal, Field::value(6)));
    }

    #[test]
    fn test_different_pointer_chains_rejected() {
        let pointer = Expression::call("dword", vec![Expression::integer(0x10)]);
        let indirect = Expression::call("byte", vec![pointer]);
        let err = build(&Expression::comparison(indirect, ComparisonOperation::Equal, byte(4))).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::Conversion);
        assert_eq!(err.message, "Cannot compare values from different pointer chains");
    }

    #[test]
    fn test_or_rejected() {
        let expr = Expression::or(vec![
            Expression::comparison(byte(1), ComparisonOperation::Equal, Expression::integer(1)),
            Expression::comparison(byte(2), ComparisonOperation::Equal, Expression::integer(2)),
        ]);
        let err = build(&expr).unwrap_err();
        assert_eq!(err.message, "Nested OR conditions are not supported in this context");
    }

    #[test]
    fn test_incomplete_condition() {
        let err = build(&byte(1)).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::Conversion);
        assert_eq!(err.message, "Incomplete trigger condition: byte(0x000001)");
    }
}
