//! Operators appearing in expression trees

use crate::data::RequirementOperator;

/// Arithmetic operators that can be folded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathematicOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    BitwiseAnd,
    BitwiseXor,
}

impl MathematicOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MathematicOperation::Add => "+",
            MathematicOperation::Subtract => "-",
            MathematicOperation::Multiply => "*",
            MathematicOperation::Divide => "/",
            MathematicOperation::Modulus => "%",
            MathematicOperation::BitwiseAnd => "&",
            MathematicOperation::BitwiseXor => "^",
        }
    }

    /// True if `a op b == b op a`
    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            MathematicOperation::Add
                | MathematicOperation::Multiply
                | MathematicOperation::BitwiseAnd
                | MathematicOperation::BitwiseXor
        )
    }

    pub fn to_requirement_operator(&self) -> RequirementOperator {
        match self {
            MathematicOperation::Add => RequirementOperator::Add,
            MathematicOperation::Subtract => RequirementOperator::Subtract,
            MathematicOperation::Multiply => RequirementOperator::Multiply,
            MathematicOperation::Divide => RequirementOperator::Divide,
            MathematicOperation::Modulus => RequirementOperator::Modulus,
            MathematicOperation::BitwiseAnd => RequirementOperator::BitwiseAnd,
            MathematicOperation::BitwiseXor => RequirementOperator::BitwiseXor,
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperation {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ComparisonOperation {
    pub fn evaluate<T: PartialOrd + PartialEq>(&self, value: T, target: T) -> bool {
        match self {
            ComparisonOperation::Equal => value == target,
            ComparisonOperation::NotEqual => value != target,
            ComparisonOperation::GreaterThan => value > target,
            ComparisonOperation::GreaterOrEqual => value >= target,
            ComparisonOperation::LessThan => value < target,
            ComparisonOperation::LessOrEqual => value <= target,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperation::Equal => "==",
            ComparisonOperation::NotEqual => "!=",
            ComparisonOperation::GreaterThan => ">",
            ComparisonOperation::GreaterOrEqual => ">=",
            ComparisonOperation::LessThan => "<",
            ComparisonOperation::LessOrEqual => "<=",
        }
    }

    /// Operator to use when the operands trade places (`a < b` is `b > a`)
    pub fn reverse(&self) -> Self {
        match self {
            ComparisonOperation::Equal => ComparisonOperation::Equal,
            ComparisonOperation::NotEqual => ComparisonOperation::NotEqual,
            ComparisonOperation::GreaterThan => ComparisonOperation::LessThan,
            ComparisonOperation::GreaterOrEqual => ComparisonOperation::LessOrEqual,
            ComparisonOperation::LessThan => ComparisonOperation::GreaterThan,
            ComparisonOperation::LessOrEqual => ComparisonOperation::GreaterOrEqual,
        }
    }

    /// Operator producing the logical negation (`!(a < b)` is `a >= b`)
    pub fn invert(&self) -> Self {
        match self {
            ComparisonOperation::Equal => ComparisonOperation::NotEqual,
            ComparisonOperation::NotEqual => ComparisonOperation::Equal,
            ComparisonOperation::GreaterThan => ComparisonOperation::LessOrEqual,
            ComparisonOperation::GreaterOrEqual => ComparisonOperation::LessThan,
            ComparisonOperation::LessThan => ComparisonOperation::GreaterOrEqual,
            ComparisonOperation::LessOrEqual => ComparisonOperation::GreaterThan,
        }
    }

    pub fn to_requirement_operator(&self) -> RequirementOperator {
        match self {
            ComparisonOperation::Equal => RequirementOperator::Equal,
            ComparisonOperation::NotEqual => RequirementOperator::NotEqual,
            ComparisonOperation::GreaterThan => RequirementOperator::GreaterThan,
            ComparisonOperation::GreaterOrEqual => RequirementOperator::GreaterThanOrEqual,
            ComparisonOperation::LessThan => RequirementOperator::LessThan,
            ComparisonOperation::LessOrEqual => RequirementOperator::LessThanOrEqual,
        }
    }
}

/// Logical combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionalOperation {
    And,
    Or,
    Not,
}

impl ConditionalOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionalOperation::And => "&&",
            ConditionalOperation::Or => "||",
            ConditionalOperation::Not => "!",
        }
    }
}
