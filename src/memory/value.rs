//! Arithmetic over memory reads

use std::fmt;

use crate::data::{Field, Requirement, RequirementOperator};
use crate::expr::{ComparisonNormalize, ComparisonOperation, Expression, ExpressionKind};
use crate::trigger::TriggerBuilderContext;

use super::accessor::field_text;
use super::MemoryAccessor;

/// A memory read combined with a constant or a second read (`byte(1) * 4`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModifiedMemoryAccessor {
    pub accessor: MemoryAccessor,
    pub modifier: Option<(RequirementOperator, Field)>,
}

impl ModifiedMemoryAccessor {
    pub fn new(accessor: MemoryAccessor, modifier: Option<(RequirementOperator, Field)>) -> Self {
        Self { accessor, modifier }
    }

    pub fn is_plain(&self) -> bool {
        self.modifier.is_none()
    }

    /// Emit the pointer chain followed by one row reading this value
    ///
    /// The final row has type `None`; callers retype it for its role.
    pub fn build_trigger(&self, context: &mut TriggerBuilderContext) {
        for entry in &self.accessor.pointer_chain {
            context.push(*entry);
        }

        let row = match self.modifier {
            Some((operator, right)) => Requirement::compare(self.accessor.field, operator, right),
            None => Requirement::compare(self.accessor.field, RequirementOperator::None, Field::value(0)),
        };
        context.push(row);
    }

    /// Back to an expression node, dropping the wrapper when unmodified
    pub fn into_expression(self) -> Expression {
        if self.modifier.is_none() {
            Expression::memory_accessor(self.accessor)
        } else {
            Expression::new(ExpressionKind::ModifiedMemoryAccessor(self))
        }
    }
}

impl From<MemoryAccessor> for ModifiedMemoryAccessor {
    fn from(accessor: MemoryAccessor) -> Self {
        Self::new(accessor, None)
    }
}

impl fmt::Display for ModifiedMemoryAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modifier {
            Some((operator, right)) => {
                write!(f, "{} {} {}", self.accessor, operator.as_str(), field_text(right))
            }
            None => write!(f, "{}", self.accessor),
        }
    }
}

/// One read in a [`MemoryValue`] sum
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryTerm {
    pub accessor: ModifiedMemoryAccessor,
    pub subtract: bool,
}

impl MemoryTerm {
    pub fn add(accessor: ModifiedMemoryAccessor) -> Self {
        Self {
            accessor,
            subtract: false,
        }
    }

    pub fn sub(accessor: ModifiedMemoryAccessor) -> Self {
        Self {
            accessor,
            subtract: true,
        }
    }

    fn negated(&self) -> Self {
        Self {
            accessor: self.accessor.clone(),
            subtract: !self.subtract,
        }
    }
}

/// Sum of memory reads plus a constant offset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryValue {
    pub terms: Vec<MemoryTerm>,
    pub constant: i32,
}

impl MemoryValue {
    pub fn new(terms: Vec<MemoryTerm>, constant: i32) -> Self {
        Self { terms, constant }
    }

    /// The only term, if there is exactly one and it is added
    pub fn single_term(&self) -> Option<&ModifiedMemoryAccessor> {
        match self.terms.as_slice() {
            [term] if !term.subtract => Some(&term.accessor),
            _ => None,
        }
    }

    /// Smallest node holding the same value
    pub fn simplify(self) -> Expression {
        if self.terms.is_empty() {
            return Expression::integer(self.constant);
        }
        if self.constant == 0 {
            if let Some(term) = self.single_term() {
                return term.clone().into_expression();
            }
        }
        Expression::new(ExpressionKind::MemoryValue(self))
    }

    /// View of an evaluated node as a memory value. Plain integers become
    /// a value with no terms.
    pub(super) fn from_expression(expression: &Expression) -> Option<MemoryValue> {
        match &expression.kind {
            ExpressionKind::MemoryAccessor(accessor) => Some(MemoryValue::new(
                vec![MemoryTerm::add(accessor.clone().into())],
                0,
            )),
            ExpressionKind::ModifiedMemoryAccessor(modified) => {
                Some(MemoryValue::new(vec![MemoryTerm::add(modified.clone())], 0))
            }
            ExpressionKind::MemoryValue(value) => Some(value.clone()),
            ExpressionKind::IntegerConstant(constant) => Some(MemoryValue::new(Vec::new(), constant.value)),
            _ => None,
        }
    }

    pub(super) fn merge(mut self, other: MemoryValue, subtract: bool) -> MemoryValue {
        if subtract {
            self.terms.extend(other.terms.iter().map(MemoryTerm::negated));
            self.constant = self.constant.wrapping_sub(other.constant);
        } else {
            self.terms.extend(other.terms);
            self.constant = self.constant.wrapping_add(other.constant);
        }
        self
    }
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.subtract) {
                (0, false) => {}
                (0, true) => f.write_str("-")?,
                (_, false) => f.write_str(" + ")?,
                (_, true) => f.write_str(" - ")?,
            }
            write!(f, "{}", term.accessor)?;
        }

        if self.terms.is_empty() {
            write!(f, "{}", self.constant)
        } else if self.constant > 0 {
            write!(f, " + {}", self.constant)
        } else if self.constant < 0 {
            write!(f, " - {}", self.constant.unsigned_abs())
        } else {
            Ok(())
        }
    }
}

impl ComparisonNormalize for MemoryValue {
    fn normalize_comparison(
        &self,
        right: &Expression,
        operation: ComparisonOperation,
        can_modify_right: bool,
    ) -> Option<Expression> {
        if self.constant == 0 || !can_modify_right {
            return None;
        }
        let ExpressionKind::IntegerConstant(constant) = &right.kind else {
            return None;
        };

        // byte(1) + 2 == 5  =>  byte(1) == 3
        let target = if constant.unsigned {
            i64::from(constant.as_u32())
        } else {
            i64::from(constant.value)
        };
        let adjusted = target - i64::from(self.constant);

        if !(0..=i64::from(u32::MAX)).contains(&adjusted) {
            if self.terms.iter().any(|term| term.subtract) {
                return None;
            }
            // a sum of reads never leaves 0..=u32::MAX
            return Some(Expression::boolean(operation.evaluate(0, adjusted)));
        }

        let adjusted = match i32::try_from(adjusted) {
            Ok(value) if !constant.unsigned => Expression::integer(value),
            _ => Expression::unsigned(adjusted as u32),
        };
        let left = MemoryValue::new(self.terms.clone(), 0).simplify();
        Some(Expression::comparison(left, operation, adjusted.at(right.location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FieldSize, RequirementType};

    fn byte(address: u32) -> MemoryAccessor {
        MemoryAccessor::at(FieldSize::Byte, address)
    }

    #[test]
    fn test_build_trigger_emits_chain_then_row() {
        let accessor = MemoryAccessor::at(FieldSize::DWord, 0x10).dereference(FieldSize::Byte);
        let modified = ModifiedMemoryAccessor::new(accessor, Some((RequirementOperator::Multiply, Field::value(2))));

        let mut context = TriggerBuilderContext::new();
        modified.build_trigger(&mut context);
        let rows = context.into_requirements();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].requirement_type, RequirementType::AddAddress);
        assert_eq!(rows[1].operator, RequirementOperator::Multiply);
        assert_eq!(rows[1].requirement_type, RequirementType::None);
    }

    #[test]
    fn test_simplify() {
        assert_eq!(MemoryValue::new(Vec::new(), 7).simplify(), Expression::integer(7));
        assert_eq!(
            MemoryValue::new(vec![MemoryTerm::add(byte(1).into())], 0).simplify(),
            Expression::memory_accessor(byte(1))
        );
        let kept = MemoryValue::new(vec![MemoryTerm::sub(byte(1).into())], 0);
        assert!(matches!(kept.simplify().kind, ExpressionKind::MemoryValue(_)));
    }

    #[test]
    fn test_display() {
        let value = MemoryValue::new(
            vec![MemoryTerm::add(byte(1).into()), MemoryTerm::sub(byte(2).into())],
            -3,
        );
        assert_eq!(value.to_string(), "byte(0x000001) - byte(0x000002) - 3");
    }

    #[test]
    fn test_constant_moves_to_right() {
        let value = MemoryValue::new(vec![MemoryTerm::add(byte(1).into())], 2);
        let result = value
            .normalize_comparison(&Expression::integer(5), ComparisonOperation::Equal, true)
            .unwrap();
        assert_eq!(
            result,
            Expression::comparison(
                Expression::memory_accessor(byte(1)),
                ComparisonOperation::Equal,
                Expression::integer(3)
            )
        );

        assert!(value
            .normalize_comparison(&Expression::integer(5), ComparisonOperation::Equal, false)
            .is_none());
    }

    #[test]
    fn test_constant_below_zero_resolves_comparison() {
        // byte(1) + 2 is at least 2
        let value = MemoryValue::new(vec![MemoryTerm::add(byte(1).into())], 2);
        let resolve = |operation| value.normalize_comparison(&Expression::integer(1), operation, true);

        assert_eq!(resolve(ComparisonOperation::LessThan), Some(Expression::boolean(false)));
        assert_eq!(resolve(ComparisonOperation::LessOrEqual), Some(Expression::boolean(false)));
        assert_eq!(resolve(ComparisonOperation::Equal), Some(Expression::boolean(false)));
        assert_eq!(resolve(ComparisonOperation::GreaterThan), Some(Expression::boolean(true)));
        assert_eq!(resolve(ComparisonOperation::GreaterOrEqual), Some(Expression::boolean(true)));
        assert_eq!(resolve(ComparisonOperation::NotEqual), Some(Expression::boolean(true)));
    }

    #[test]
    fn test_constant_at_boundary() {
        let value = MemoryValue::new(vec![MemoryTerm::add(byte(1).into())], 2);
        assert_eq!(
            value.normalize_comparison(&Expression::integer(2), ComparisonOperation::GreaterOrEqual, true),
            Some(Expression::comparison(
                Expression::memory_accessor(byte(1)),
                ComparisonOperation::GreaterOrEqual,
                Expression::integer(0)
            ))
        );

        // byte(1) - 1 == 0xFFFFFFFF needs byte(1) == 0x100000000
        let value = MemoryValue::new(vec![MemoryTerm::add(byte(1).into())], -1);
        assert_eq!(
            value.normalize_comparison(&Expression::unsigned(u32::MAX), ComparisonOperation::Equal, true),
            Some(Expression::boolean(false))
        );
        assert_eq!(
            value.normalize_comparison(&Expression::unsigned(u32::MAX - 1), ComparisonOperation::Equal, true),
            Some(Expression::comparison(
                Expression::memory_accessor(byte(1)),
                ComparisonOperation::Equal,
                Expression::unsigned(u32::MAX)
            ))
        );
    }

    #[test]
    fn test_subtracted_terms_keep_constant() {
        let value = MemoryValue::new(
            vec![MemoryTerm::add(byte(1).into()), MemoryTerm::sub(byte(2).into())],
            2,
        );
        assert!(value
            .normalize_comparison(&Expression::integer(1), ComparisonOperation::LessThan, true)
            .is_none());
    }
}
