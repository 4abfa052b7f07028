//! Trigger construction
//!
//! [`TriggerBuilderContext`] lowers one condition into an ordered
//! requirement list. [`AchievementBuilder`] splits a condition tree into the
//! core group and alternate groups of a [`Trigger`].

mod builder;
mod context;

pub use builder::AchievementBuilder;
pub use context::TriggerBuilderContext;

use crate::data::Trigger;
use crate::error::CompileResult;
use crate::expr::Expression;
use crate::scope::InterpreterScope;

/// Evaluate `expression` as a trigger clause and lower it
pub fn compile_trigger(expression: &Expression, scope: &InterpreterScope<'_>) -> CompileResult<Trigger> {
    let clause = scope.trigger_clause();
    let evaluated = expression.evaluate(&clause)?;
    log::trace!("Evaluated trigger: {}", evaluated);

    let mut builder = AchievementBuilder::new();
    builder.process_conditions(&evaluated, &clause)?;
    let trigger = builder.finish();

    log::debug!(
        "Compiled trigger with {} core requirements and {} alternate groups",
        trigger.core.len(),
        trigger.alternates.len()
    );
    Ok(trigger)
}
