//! Script-defined functions

use crate::error::CompileResult;
use crate::expr::{Expression, ExpressionKind, FunctionCall};
use crate::scope::InterpreterScope;

use super::{bind_parameters, FunctionDefinition};

/// Function defined by the script
///
/// The body runs in a scope nested under the caller's, with each parameter
/// bound to its evaluated argument.
#[derive(Debug, Clone)]
pub struct UserFunction {
    name: String,
    parameters: Vec<String>,
    body: Expression,
}

impl UserFunction {
    pub fn new(name: impl Into<String>, parameters: Vec<String>, body: Expression) -> Self {
        Self {
            name: name.into(),
            parameters,
            body,
        }
    }

    pub fn body(&self) -> &Expression {
        &self.body
    }
}

impl FunctionDefinition for UserFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn evaluate(&self, call: &FunctionCall, scope: &InterpreterScope<'_>) -> CompileResult<Expression> {
        let bound = bind_parameters(self, call, scope)?;
        log::trace!("Calling {} at depth {}", self.name, bound.depth());

        let result = self.body.evaluate(&bound)?;
        Ok(match result.kind {
            ExpressionKind::Return(value) => *value,
            _ => result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::CompilerConfig;
    use crate::data::FieldSize;
    use crate::error::CompileErrorKind;
    use crate::expr::{ComparisonOperation, MathematicOperation};
    use crate::memory::MemoryAccessor;

    fn scope_with(function: UserFunction) -> InterpreterScope<'static> {
        let mut scope = InterpreterScope::new();
        scope.define_function(Arc::new(function));
        scope
    }

    #[test]
    fn test_parameters_are_bound() {
        // health() => byte(0x100 + slot)
        let body = Expression::returning(Expression::call(
            "byte",
            vec![Expression::mathematic(
                Expression::integer(0x100),
                MathematicOperation::Add,
                Expression::variable("slot"),
            )],
        ));
        let scope = scope_with(UserFunction::new("health", vec!["slot".to_string()], body));

        let result = Expression::call("health", vec![Expression::integer(2)])
            .evaluate(&scope)
            .unwrap();
        assert_eq!(result, Expression::memory_accessor(MemoryAccessor::at(FieldSize::Byte, 0x102)));
    }

    #[test]
    fn test_function_returning_condition() {
        let body = Expression::comparison(
            Expression::call("byte", vec![Expression::variable("a")]),
            ComparisonOperation::Equal,
            Expression::integer(1),
        );
        let scope = scope_with(UserFunction::new("flag", vec!["a".to_string()], body));

        let result = Expression::call("flag", vec![Expression::integer(0x40)])
            .evaluate(&scope)
            .unwrap();
        assert_eq!(result.to_string(), "byte(0x000040) == 1");
    }

    #[test]
    fn test_recursion_is_bounded() {
        let body = Expression::call("loop", Vec::new());
        let config = CompilerConfig {
            max_call_depth: 8,
            ..CompilerConfig::default()
        };
        let mut scope = InterpreterScope::with_config(config);
        scope.define_function(Arc::new(UserFunction::new("loop", Vec::new(), body)));

        let err = Expression::call("loop", Vec::new()).evaluate(&scope).unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::Usage);
        assert_eq!(err.message, "Maximum call depth exceeded (8)");
    }
}
