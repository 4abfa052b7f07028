//! Splitting a condition tree into core and alternate groups

use crate::data::{RequirementGroup, Trigger};
use crate::error::{CompileError, CompileResult};
use crate::expr::{ConditionalOperation, Expression, ExpressionKind};
use crate::scope::InterpreterScope;

use super::TriggerBuilderContext;

/// Accumulates the groups of one trigger
#[derive(Debug, Clone, Default)]
pub struct AchievementBuilder {
    core: RequirementGroup,
    alternates: Vec<RequirementGroup>,
}

impl AchievementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn core(&self) -> &RequirementGroup {
        &self.core
    }

    pub fn alternates(&self) -> &[RequirementGroup] {
        &self.alternates
    }

    /// Lower an evaluated condition tree
    ///
    /// A top-level `||` becomes one alternate per operand. `||` operands of
    /// a top-level `&&` are distributed over the remaining conditions.
    pub fn process_conditions(&mut self, expression: &Expression, scope: &InterpreterScope<'_>) -> CompileResult<()> {
        match &expression.kind {
            ExpressionKind::Conditional {
                operation: ConditionalOperation::Or,
                operands,
            } => {
                for operand in operands {
                    let group = build_group(operand, scope)?;
                    self.alternates.push(group);
                }
            }
            ExpressionKind::Conditional {
                operation: ConditionalOperation::And,
                operands,
            } if operands.iter().any(Expression::is_or) => {
                let (ors, rest): (Vec<&Expression>, Vec<&Expression>) =
                    operands.iter().partition(|operand| operand.is_or());

                if !rest.is_empty() {
                    let rest = and_of(rest.into_iter().cloned().collect());
                    let group = build_group(&rest, scope)?;
                    self.core.extend(group);
                }

                for combination in self.distribute(&ors, scope)? {
                    let group = build_group(&and_of(combination), scope)?;
                    self.alternates.push(group);
                }
            }
            _ => {
                let group = build_group(expression, scope)?;
                self.core.extend(group);
            }
        }

        let limit = scope.config().max_alternate_groups;
        if self.alternates.len() > limit {
            return Err(CompileError::usage(format!(
                "Trigger needs {} alternate groups, the limit is {}",
                self.alternates.len(),
                limit
            ))
            .with_location(expression.location));
        }

        log::trace!(
            "Processed {}: core={} alternates={}",
            expression,
            self.core.len(),
            self.alternates.len()
        );
        Ok(())
    }

    /// Every way of picking one branch from each `||`
    fn distribute(&self, ors: &[&Expression], scope: &InterpreterScope<'_>) -> CompileResult<Vec<Vec<Expression>>> {
        let config = scope.config();
        if ors.len() > 1 && !config.expand_nested_or {
            return Err(CompileError::usage(
                "Combining multiple OR clauses requires expand_nested_or",
            ));
        }

        let mut combinations: Vec<Vec<Expression>> = vec![Vec::new()];
        for or in ors {
            let ExpressionKind::Conditional { operands: branches, .. } = &or.kind else {
                continue;
            };

            let count = combinations.len().saturating_mul(branches.len());
            if self.alternates.len().saturating_add(count) > config.max_alternate_groups {
                return Err(CompileError::usage(format!(
                    "Trigger needs {} alternate groups, the limit is {}",
                    self.alternates.len().saturating_add(count),
                    config.max_alternate_groups
                )));
            }

            let mut next = Vec::with_capacity(count);
            for combination in &combinations {
                for branch in branches {
                    let mut extended = combination.clone();
                    extended.push(branch.clone());
                    next.push(extended);
                }
            }
            combinations = next;
        }

        log::debug!("Distributed {} OR clauses into {} alternates", ors.len(), combinations.len());
        Ok(combinations)
    }

    /// Split into core and alternates
    pub fn into_groups(self) -> (RequirementGroup, Vec<RequirementGroup>) {
        (self.core, self.alternates)
    }

    pub fn finish(self) -> Trigger {
        Trigger::new(self.core, self.alternates)
    }
}

fn and_of(mut operands: Vec<Expression>) -> Expression {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        Expression::and(operands)
    }
}

fn build_group(expression: &Expression, scope: &InterpreterScope<'_>) -> CompileResult<RequirementGroup> {
    let mut context = TriggerBuilderContext::new();
    context.build_condition(expression, scope)?;
    Ok(context.into_requirements())
}
