//! Typed memory read functions (`byte`, `dword`, ...)

use crate::data::FieldSize;
use crate::error::CompileResult;
use crate::expr::{Expression, FunctionCall};
use crate::memory::MemoryAccessor;
use crate::scope::InterpreterScope;

use super::{required_parameter, FunctionDefinition};

/// `byte(address)`, `dword(address)`, ... for one read size
#[derive(Debug, Clone)]
pub struct MemoryAccessorFunction {
    size: FieldSize,
    parameters: Vec<String>,
}

impl MemoryAccessorFunction {
    pub fn new(size: FieldSize) -> Self {
        Self {
            size,
            parameters: vec!["address".to_string()],
        }
    }
}

impl FunctionDefinition for MemoryAccessorFunction {
    fn name(&self) -> &str {
        self.size.function_name()
    }

    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn evaluate(&self, call: &FunctionCall, scope: &InterpreterScope<'_>) -> CompileResult<Expression> {
        let address = required_parameter(call, 0)?.evaluate(scope)?;
        let accessor = MemoryAccessor::resolve_address(self.size, &address)?;
        Ok(Expression::memory_accessor(accessor))
    }
}
