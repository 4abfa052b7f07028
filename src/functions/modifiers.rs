//! Functions that retype the terminal row of a condition

use crate::data::RequirementType;
use crate::error::{CompileError, CompileResult};
use crate::expr::{Expression, FunctionCall};
use crate::scope::InterpreterScope;
use crate::trigger::TriggerBuilderContext;

use super::{require_trigger_clause, required_parameter, FunctionDefinition};

/// `never(comparison)` and `unless(comparison)`: retype the terminal row
/// of a condition
#[derive(Debug, Clone)]
pub struct ModifierFunction {
    name: &'static str,
    requirement_type: RequirementType,
    parameters: Vec<String>,
}

impl ModifierFunction {
    fn new(name: &'static str, requirement_type: RequirementType) -> Self {
        Self {
            name,
            requirement_type,
            parameters: vec!["comparison".to_string()],
        }
    }

    /// Reset progress while the condition holds
    pub fn never() -> Self {
        Self::new("never", RequirementType::ResetIf)
    }

    /// Pause processing while the condition holds
    pub fn unless() -> Self {
        Self::new("unless", RequirementType::PauseIf)
    }
}

impl FunctionDefinition for ModifierFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn evaluate(&self, call: &FunctionCall, scope: &InterpreterScope<'_>) -> CompileResult<Expression> {
        require_trigger_clause(call, scope)?;

        let comparison = required_parameter(call, 0)?.evaluate(scope)?;
        Ok(Expression::call(call.name.clone(), vec![comparison]))
    }

    fn build_trigger(
        &self,
        context: &mut TriggerBuilderContext,
        call: &FunctionCall,
        scope: &InterpreterScope<'_>,
    ) -> CompileResult<()> {
        let comparison = required_parameter(call, 0)?;
        if comparison.is_or() {
            return Err(CompileError::usage(format!(
                "{} does not support || conditions",
                self.name
            ))
            .with_location(comparison.location));
        }

        context.build_condition(comparison, scope)?;
        match context.last_requirement_mut() {
            Some(last) if last.requirement_type == RequirementType::None => {
                last.requirement_type = self.requirement_type;
                Ok(())
            }
            _ => Err(CompileError::usage(format!(
                "{} cannot be applied to a condition that already has a modifier",
                self.name
            ))
            .with_location(comparison.location)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Field, FieldSize, Requirement, RequirementOperator};
    use crate::expr::ComparisonOperation;

    fn cmp(address: i32, value: i32) -> Expression {
        Expression::comparison(
            Expression::call("byte", vec![Expression::integer(address)]),
            ComparisonOperation::Equal,
            Expression::integer(value),
        )
    }

    fn lower(expression: &Expression) -> CompileResult<Vec<Requirement>> {
        let root = InterpreterScope::new();
        let scope = root.trigger_clause();
        let evaluated = expression.evaluate(&scope)?;
        let mut context = TriggerBuilderContext::new();
        context.build_condition(&evaluated, &scope)?;
        Ok(context.into_requirements())
    }

    #[test]
    fn test_never_and_unless() {
        let rows = lower(&Expression::call("never", vec![cmp(1, 0)])).unwrap();
        assert_eq!(rows[0].requirement_type, RequirementType::ResetIf);

        let rows = lower(&Expression::call("unless", vec![cmp(1, 0)])).unwrap();
        assert_eq!(
            rows,
            vec![Requirement::compare(
                Field::memory(FieldSize::Byte, 1),
                RequirementOperator::Equal,
                Field::value(0)
            )
            .with_type(RequirementType::PauseIf)]
        );
    }

    #[test]
    fn test_and_chain_keeps_and_next() {
        let rows = lower(&Expression::call("never", vec![Expression::and(vec![cmp(1, 1), cmp(2, 2)])])).unwrap();
        let types: Vec<_> = rows.iter().map(|r| r.requirement_type).collect();
        assert_eq!(types, vec![RequirementType::AndNext, RequirementType::ResetIf]);
    }

    #[test]
    fn test_or_rejected() {
        let err = lower(&Expression::call("never", vec![Expression::or(vec![cmp(1, 1), cmp(2, 2)])])).unwrap_err();
        assert_eq!(err.message, "never does not support || conditions");
    }

    #[test]
    fn test_stacked_modifier_rejected() {
        let inner = Expression::call("unless", vec![cmp(1, 1)]);
        let err = lower(&Expression::call("never", vec![inner])).unwrap_err();
        assert_eq!(err.message, "never cannot be applied to a condition that already has a modifier");
    }
}
