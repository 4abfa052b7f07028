//! Evaluation of expression trees against a scope

use crate::error::{CompileError, CompileResult, Location};
use crate::memory;
use crate::scope::InterpreterScope;

use super::{ComparisonOperation, ConditionalOperation, Expression, ExpressionKind, MathematicOperation};

// Each rewrite either produces a boolean or removes a literal from the
// left side, so a handful of passes always settles.
const MAX_NORMALIZE_PASSES: usize = 4;

impl Expression {
    /// Resolve names, inline calls and fold everything that can be folded
    ///
    /// Errors carry the location of the innermost expression that failed.
    pub fn evaluate(&self, scope: &InterpreterScope<'_>) -> CompileResult<Expression> {
        self.evaluate_node(scope)
            .map_err(|e| e.with_location(self.location))
    }

    fn evaluate_node(&self, scope: &InterpreterScope<'_>) -> CompileResult<Expression> {
        match &self.kind {
            ExpressionKind::IntegerConstant(_)
            | ExpressionKind::FloatConstant(_)
            | ExpressionKind::StringConstant(_)
            | ExpressionKind::BooleanConstant(_)
            | ExpressionKind::MemoryAccessor(_)
            | ExpressionKind::ModifiedMemoryAccessor(_)
            | ExpressionKind::MemoryValue(_)
            | ExpressionKind::AlwaysTrue
            | ExpressionKind::AlwaysFalse => Ok(self.clone()),

            ExpressionKind::Variable(name) => match scope.lookup(name) {
                Some(value) => Ok(value.clone()),
                None => Err(CompileError::unresolved(format!("Unknown variable: {}", name))),
            },

            ExpressionKind::Mathematic {
                left,
                operation,
                right,
            } => {
                let left = left.evaluate(scope)?;
                let right = right.evaluate(scope)?;
                combine(left, *operation, right, self.location)
            }

            ExpressionKind::Comparison {
                left,
                operation,
                right,
            } => {
                let left = left.evaluate(scope)?;
                let right = right.evaluate(scope)?;
                normalize(left, *operation, right, self.location)
            }

            ExpressionKind::Conditional {
                operation: ConditionalOperation::Not,
                operands,
            } => {
                let [operand] = operands.as_slice() else {
                    return Err(CompileError::usage("! expects exactly one operand"));
                };
                let operand = operand.evaluate(scope)?;
                negate(operand).map(|e| e.at(self.location))
            }

            ExpressionKind::Conditional {
                operation,
                operands,
            } => {
                let mut evaluated = Vec::with_capacity(operands.len());
                for operand in operands {
                    evaluated.push(operand.evaluate(scope)?);
                }
                Ok(fold_logical(*operation, evaluated).at(self.location))
            }

            ExpressionKind::FunctionCall(call) => {
                let function = scope.get_function(&call.name).ok_or_else(|| {
                    CompileError::unresolved(format!("Unknown function: {}", call.name))
                })?;

                let expected = function.parameters().len();
                if call.parameters.len() != expected {
                    return Err(CompileError::usage(format!(
                        "{} expects {} parameters, got {}",
                        call.name,
                        expected,
                        call.parameters.len()
                    )));
                }

                let result = function.evaluate(call, scope)?;
                if result.location.is_empty() {
                    Ok(result.at(self.location))
                } else {
                    Ok(result)
                }
            }

            ExpressionKind::Return(value) => Ok(Expression::returning(value.evaluate(scope)?)),

            ExpressionKind::Error(message) => Err(CompileError::fold(message.clone())),
        }
    }
}

fn combine(
    left: Expression,
    operation: MathematicOperation,
    right: Expression,
    location: Location,
) -> CompileResult<Expression> {
    if let Some(result) = left
        .as_combinable()
        .and_then(|c| c.combine(&right, operation))
    {
        return result.at(location).into_result();
    }

    match memory::combine(&left, operation, &right)? {
        Some(result) => Ok(result.at(location)),
        None => Ok(Expression::mathematic(left, operation, right).at(location)),
    }
}

fn normalize(
    left: Expression,
    operation: ComparisonOperation,
    right: Expression,
    location: Location,
) -> CompileResult<Expression> {
    let (mut left, mut operation, mut right) = (left, operation, right);

    for _ in 0..MAX_NORMALIZE_PASSES {
        let Some(rewritten) = left
            .as_normalizable()
            .and_then(|n| n.normalize_comparison(&right, operation, true))
        else {
            break;
        };

        match rewritten.kind {
            ExpressionKind::Comparison {
                left: l,
                operation: op,
                right: r,
            } => {
                left = *l;
                operation = op;
                right = *r;
            }
            _ => return rewritten.at(location).into_result(),
        }
    }

    Ok(Expression::comparison(left, operation, right).at(location))
}

/// Push a logical negation into its operand
fn negate(operand: Expression) -> CompileResult<Expression> {
    let location = operand.location;
    let negated = match operand.kind {
        ExpressionKind::BooleanConstant(value) => Expression::boolean(!value),
        ExpressionKind::AlwaysTrue => Expression::always_false(),
        ExpressionKind::AlwaysFalse => Expression::always_true(),
        ExpressionKind::Comparison {
            left,
            operation,
            right,
        } => Expression::comparison(*left, operation.invert(), *right),
        ExpressionKind::Conditional {
            operation: ConditionalOperation::Not,
            mut operands,
        } if operands.len() == 1 => operands.remove(0),
        ExpressionKind::Conditional {
            operation: operation @ (ConditionalOperation::And | ConditionalOperation::Or),
            operands,
        } => {
            let inverted = match operation {
                ConditionalOperation::And => ConditionalOperation::Or,
                _ => ConditionalOperation::And,
            };
            let operands = operands
                .into_iter()
                .map(negate)
                .collect::<CompileResult<Vec<_>>>()?;
            fold_logical(inverted, operands)
        }
        kind => {
            return Err(CompileError::usage(format!(
                "Cannot negate {}",
                Expression::new(kind)
            ))
            .with_location(location));
        }
    };

    Ok(negated.at(location))
}

/// Flatten nested `&&`/`||` and fold boolean constants
fn fold_logical(operation: ConditionalOperation, operands: Vec<Expression>) -> Expression {
    // absorbing element of the operator, e.g. `false` for `&&`
    let absorbing = operation == ConditionalOperation::Or;

    let mut flattened = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand.kind {
            ExpressionKind::BooleanConstant(value) if value == absorbing => {
                return Expression::boolean(absorbing);
            }
            ExpressionKind::BooleanConstant(_) => {}
            ExpressionKind::Conditional {
                operation: nested,
                operands: inner,
            } if nested == operation => flattened.extend(inner),
            kind => flattened.push(Expression {
                kind,
                location: operand.location,
            }),
        }
    }

    match flattened.len() {
        0 => Expression::boolean(!absorbing),
        1 => flattened.remove(0),
        _ => Expression::new(ExpressionKind::Conditional {
            operation,
            operands: flattened,
        }),
    }
}
