//! `repeated(count, comparison)` and `once(comparison)`
//!
//! A plain comparison gets `hit_count = count` on its terminal row. An `||`
//! comparison counts hits across every branch: each branch ends in an
//! `AddHits` row and the last branch (the collector) holds the total.

use crate::data::{Requirement, RequirementGroup, RequirementType};
use crate::error::{CompileError, CompileResult};
use crate::expr::{Expression, FunctionCall};
use crate::scope::InterpreterScope;
use crate::trigger::{AchievementBuilder, TriggerBuilderContext};

use super::{require_trigger_clause, required_parameter, FunctionDefinition};

const MODIFIER_NOT_ALLOWED: &str = "modifier not allowed in multi-condition repeated clause";

/// `repeated(count, comparison)`
#[derive(Debug, Clone)]
pub struct RepeatedFunction {
    parameters: Vec<String>,
}

impl RepeatedFunction {
    pub fn new() -> Self {
        Self {
            parameters: vec!["count".to_string(), "comparison".to_string()],
        }
    }
}

impl Default for RepeatedFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionDefinition for RepeatedFunction {
    fn name(&self) -> &str {
        "repeated"
    }

    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn evaluate(&self, call: &FunctionCall, scope: &InterpreterScope<'_>) -> CompileResult<Expression> {
        require_trigger_clause(call, scope)?;

        let count = evaluate_count(required_parameter(call, 0)?, scope)?;
        let comparison = required_parameter(call, 1)?.evaluate(scope)?;
        Ok(Expression::call(
            call.name.clone(),
            vec![Expression::integer(i32::from(count)), comparison],
        ))
    }

    fn build_trigger(
        &self,
        context: &mut TriggerBuilderContext,
        call: &FunctionCall,
        scope: &InterpreterScope<'_>,
    ) -> CompileResult<()> {
        let count = evaluate_count(required_parameter(call, 0)?, scope)?;
        build_trigger_conditions(context, scope, required_parameter(call, 1)?, count)
    }
}

/// `once(comparison)`, shorthand for `repeated(1, comparison)`
#[derive(Debug, Clone)]
pub struct OnceFunction {
    parameters: Vec<String>,
}

impl OnceFunction {
    pub fn new() -> Self {
        Self {
            parameters: vec!["comparison".to_string()],
        }
    }
}

impl Default for OnceFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionDefinition for OnceFunction {
    fn name(&self) -> &str {
        "once"
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
        build_trigger_conditions(context, scope, required_parameter(call, 0)?, 1)
    }
}

fn evaluate_count(expression: &Expression, scope: &InterpreterScope<'_>) -> CompileResult<u16> {
    let value = expression.evaluate(scope)?;
    let error = |message: String| -> CompileResult<u16> {
        Err(CompileError::usage(message).with_location(value.location))
    };

    match value.as_integer() {
        Some(count) if !count.is_negative() => match u16::try_from(count.as_u32()) {
            Ok(count) => Ok(count),
            Err(_) => error(format!("count must be between 0 and {}, got {}", u16::MAX, value)),
        },
        Some(_) => error(format!("count must be between 0 and {}, got {}", u16::MAX, value)),
        None => error(format!("count must be an integer constant, got {}", value)),
    }
}

fn build_trigger_conditions(
    context: &mut TriggerBuilderContext,
    scope: &InterpreterScope<'_>,
    comparison: &Expression,
    count: u16,
) -> CompileResult<()> {
    if comparison.is_or() {
        evaluate_add_hits(context, scope, comparison)?;
    } else {
        context.build_condition(comparison, scope)?;
    }

    if let Some(last) = context.last_requirement_mut() {
        last.hit_count = count;
    }
    Ok(())
}

fn evaluate_add_hits(
    context: &mut TriggerBuilderContext,
    scope: &InterpreterScope<'_>,
    condition: &Expression,
) -> CompileResult<()> {
    let mut builder = AchievementBuilder::new();
    builder.process_conditions(condition, scope)?;
    let (_, alternates) = builder.into_groups();

    let mut branches = Vec::with_capacity(alternates.len() + 1);
    for mut group in alternates {
        let Some((terminal, rest)) = group.split_last_mut() else {
            continue;
        };
        if terminal.requirement_type != RequirementType::None {
            return Err(CompileError::usage(MODIFIER_NOT_ALLOWED).with_location(condition.location));
        }
        terminal.requirement_type = RequirementType::AddHits;

        for requirement in rest.iter_mut() {
            match requirement.requirement_type {
                RequirementType::None => requirement.requirement_type = RequirementType::AndNext,
                RequirementType::AndNext => {}
                _ => {
                    return Err(CompileError::usage(MODIFIER_NOT_ALLOWED).with_location(condition.location));
                }
            }
        }
        branches.push(group);
    }

    select_collector(&mut branches);

    // the collector holds the total instead of adding to it
    if let Some(last) = branches.last_mut().and_then(|branch| branch.last_mut()) {
        last.requirement_type = RequirementType::None;
    }

    for branch in branches {
        context.extend(branch);
    }
    Ok(())
}

fn has_hit_count(branch: &RequirementGroup) -> bool {
    branch.last().map_or(false, |r| r.hit_count > 0)
}

/// Make sure the last branch can take the total hit count
fn select_collector(branches: &mut Vec<RequirementGroup>) {
    if !branches.last().map_or(false, has_hit_count) {
        return;
    }

    match branches.iter().rposition(|branch| !has_hit_count(branch)) {
        Some(index) => {
            log::debug!("Moving branch {} to collect the repeated hit count", index);
            let branch = branches.remove(index);
            branches.push(branch);
        }
        None => {
            log::debug!("Every branch has its own hit count, appending always_false() collector");
            branches.push(vec![Requirement::always_false()]);
        }
    }
}
