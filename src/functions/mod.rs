//! Functions callable from achievement scripts
//!
//! Every function evaluates at compile time. Functions that only make sense
//! inside a trigger (`repeated`, `never`, ...) evaluate to a deferred call
//! and emit their rows later through [`FunctionDefinition::build_trigger`].

mod always;
mod memory_accessor;
mod modifiers;
mod repeated;
mod user;

use std::sync::Arc;

pub use always::AlwaysFunction;
pub use memory_accessor::MemoryAccessorFunction;
pub use modifiers::ModifierFunction;
pub use repeated::{OnceFunction, RepeatedFunction};
pub use user::UserFunction;

use crate::data::FieldSize;
use crate::error::{CompileError, CompileResult};
use crate::expr::{Expression, FunctionCall};
use crate::scope::InterpreterScope;
use crate::trigger::TriggerBuilderContext;

/// A named function the evaluator can call
pub trait FunctionDefinition: Send + Sync {
    /// Name the function is called by
    fn name(&self) -> &str;

    /// Parameter names, in call order
    fn parameters(&self) -> &[String];

    /// Evaluate a call. Arity has already been checked.
    fn evaluate(&self, call: &FunctionCall, scope: &InterpreterScope<'_>) -> CompileResult<Expression>;

    /// Emit the rows for an evaluated call appearing as a trigger condition
    fn build_trigger(
        &self,
        _context: &mut TriggerBuilderContext,
        call: &FunctionCall,
        _scope: &InterpreterScope<'_>,
    ) -> CompileResult<()> {
        Err(CompileError::usage(format!(
            "{} cannot be used in a trigger",
            call.name
        )))
    }
}

/// Every built-in function
pub fn builtins() -> Vec<Arc<dyn FunctionDefinition>> {
    let mut functions: Vec<Arc<dyn FunctionDefinition>> = FieldSize::ALL
        .iter()
        .map(|size| Arc::new(MemoryAccessorFunction::new(*size)) as Arc<dyn FunctionDefinition>)
        .collect();

    functions.push(Arc::new(AlwaysFunction::always_true()));
    functions.push(Arc::new(AlwaysFunction::always_false()));
    functions.push(Arc::new(RepeatedFunction::new()));
    functions.push(Arc::new(OnceFunction::new()));
    functions.push(Arc::new(ModifierFunction::never()));
    functions.push(Arc::new(ModifierFunction::unless()));
    functions
}

/// Parameter `index` of `call`
pub(crate) fn required_parameter(call: &FunctionCall, index: usize) -> CompileResult<&Expression> {
    call.parameters.get(index).ok_or_else(|| {
        CompileError::usage(format!("{} is missing parameter {}", call.name, index + 1))
    })
}

/// Build the scope a function body runs in: arguments are evaluated in
/// the caller's scope and bound to the parameter names
pub fn bind_parameters<'s>(
    function: &dyn FunctionDefinition,
    call: &FunctionCall,
    scope: &'s InterpreterScope<'_>,
) -> CompileResult<InterpreterScope<'s>> {
    let names = function.parameters();
    if names.len() != call.parameters.len() {
        return Err(CompileError::usage(format!(
            "{} expects {} parameters, got {}",
            call.name,
            names.len(),
            call.parameters.len()
        )));
    }

    let mut values = Vec::with_capacity(names.len());
    for parameter in &call.parameters {
        values.push(parameter.evaluate(scope)?);
    }

    let mut bound = scope.function_call()?;
    for (name, value) in names.iter().zip(values) {
        bound.define_variable(name.clone(), value);
    }
    Ok(bound)
}

/// Whether `scope` allows trigger-only functions
pub(crate) fn require_trigger_clause(call: &FunctionCall, scope: &InterpreterScope<'_>) -> CompileResult<()> {
    if scope.is_within_trigger_clause() {
        Ok(())
    } else {
        Err(CompileError::usage(format!(
            "{} has no meaning outside of a trigger clause",
            call.name
        )))
    }
}
