//! Constant-result trigger functions

use crate::error::CompileResult;
use crate::expr::{Expression, FunctionCall};
use crate::scope::InterpreterScope;

use super::FunctionDefinition;

const NO_PARAMETERS: &[String] = &[];

/// `always_true()` / `always_false()`
#[derive(Debug, Clone)]
pub struct AlwaysFunction {
    value: bool,
}

impl AlwaysFunction {
    pub fn always_true() -> Self {
        Self { value: true }
    }

    pub fn always_false() -> Self {
        Self { value: false }
    }
}

impl FunctionDefinition for AlwaysFunction {
    fn name(&self) -> &str {
        if self.value {
            "always_true"
        } else {
            "always_false"
        }
    }

    fn parameters(&self) -> &[String] {
        NO_PARAMETERS
    }

    fn evaluate(&self, _call: &FunctionCall, _scope: &InterpreterScope<'_>) -> CompileResult<Expression> {
        Ok(if self.value {
            Expression::always_true()
        } else {
            Expression::always_false()
        })
    }
}
