//! Literal constant nodes and their folding rules

use std::fmt;

use super::{
    ComparisonNormalize, ComparisonOperation, Expression, ExpressionKind, MathematicCombine,
    MathematicOperation,
};

const DIVISION_BY_ZERO: &str = "Division by zero";

/// Integer literal. The unsigned tag only changes how the value prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerConstant {
    pub value: i32,
    pub unsigned: bool,
}

impl IntegerConstant {
    pub const fn new(value: i32) -> Self {
        Self {
            value,
            unsigned: false,
        }
    }

    pub const fn unsigned(value: u32) -> Self {
        Self {
            value: value as i32,
            unsigned: true,
        }
    }

    /// Value reinterpreted as an address or field value
    pub const fn as_u32(&self) -> u32 {
        self.value as u32
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    pub fn is_negative(&self) -> bool {
        !self.unsigned && self.value < 0
    }

    fn as_f32(&self) -> f32 {
        if self.unsigned {
            self.as_u32() as f32
        } else {
            self.value as f32
        }
    }

    fn fold(&self, right: &IntegerConstant, operation: MathematicOperation) -> Expression {
        if matches!(
            operation,
            MathematicOperation::Divide | MathematicOperation::Modulus
        ) && right.is_zero()
        {
            return Expression::error(DIVISION_BY_ZERO);
        }

        let (a, b) = (self.value, right.value);
        let value = match operation {
            MathematicOperation::Add => a.wrapping_add(b),
            MathematicOperation::Subtract => a.wrapping_sub(b),
            MathematicOperation::Multiply => a.wrapping_mul(b),
            MathematicOperation::Divide => a.wrapping_div(b),
            MathematicOperation::Modulus => a.wrapping_rem(b),
            MathematicOperation::BitwiseAnd => a & b,
            MathematicOperation::BitwiseXor => a ^ b,
        };

        // unsignedness is contagious, the bits are folded as signed
        if self.unsigned || right.unsigned {
            Expression::unsigned(value as u32)
        } else {
            Expression::integer(value)
        }
    }

    fn compare(&self, right: &IntegerConstant, operation: ComparisonOperation) -> bool {
        operation.evaluate(self.value, right.value)
    }
}

impl fmt::Display for IntegerConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unsigned {
            write!(f, "{}U", self.as_u32())
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl MathematicCombine for IntegerConstant {
    fn combine(&self, right: &Expression, operation: MathematicOperation) -> Option<Expression> {
        match &right.kind {
            ExpressionKind::IntegerConstant(r) => Some(self.fold(r, operation)),
            ExpressionKind::FloatConstant(_) => {
                FloatConstant::new(self.as_f32()).combine(right, operation)
            }
            ExpressionKind::StringConstant(_) => {
                StringConstant::new(self.to_string_value()).combine(right, operation)
            }
            _ => None,
        }
    }
}

impl IntegerConstant {
    // decimal text without the unsigned marker
    fn to_string_value(&self) -> String {
        if self.unsigned {
            self.as_u32().to_string()
        } else {
            self.value.to_string()
        }
    }
}

impl ComparisonNormalize for IntegerConstant {
    fn normalize_comparison(
        &self,
        right: &Expression,
        operation: ComparisonOperation,
        can_modify_right: bool,
    ) -> Option<Expression> {
        match &right.kind {
            ExpressionKind::IntegerConstant(r) => Some(Expression::boolean(self.compare(r, operation))),
            ExpressionKind::FloatConstant(_) => FloatConstant::new(self.as_f32())
                .normalize_comparison(right, operation, can_modify_right),
            // prefer constants on the right side of a comparison
            _ if !right.is_literal_constant() => Some(Expression::comparison(
                right.clone(),
                operation.reverse(),
                Expression::new(ExpressionKind::IntegerConstant(*self)),
            )),
            _ => None,
        }
    }
}

/// Floating point literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatConstant {
    pub value: f32,
}

impl FloatConstant {
    pub const fn new(value: f32) -> Self {
        Self { value }
    }

    fn right_operand(right: &Expression) -> Option<f32> {
        match &right.kind {
            ExpressionKind::FloatConstant(r) => Some(r.value),
            ExpressionKind::IntegerConstant(r) => Some(r.as_f32()),
            _ => None,
        }
    }
}

impl fmt::Display for FloatConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl MathematicCombine for FloatConstant {
    fn combine(&self, right: &Expression, operation: MathematicOperation) -> Option<Expression> {
        if let ExpressionKind::StringConstant(_) = right.kind {
            return StringConstant::new(self.to_string()).combine(right, operation);
        }

        let b = Self::right_operand(right)?;
        let a = self.value;
        let value = match operation {
            MathematicOperation::Add => a + b,
            MathematicOperation::Subtract => a - b,
            MathematicOperation::Multiply => a * b,
            MathematicOperation::Divide | MathematicOperation::Modulus if b == 0.0 => {
                return Some(Expression::error(DIVISION_BY_ZERO));
            }
            MathematicOperation::Divide => a / b,
            MathematicOperation::Modulus => a % b,
            MathematicOperation::BitwiseAnd | MathematicOperation::BitwiseXor => {
                return Some(Expression::error(format!(
                    "Cannot perform bitwise operation {} on floating point values",
                    operation.as_str()
                )));
            }
        };
        Some(Expression::float(value))
    }
}

impl ComparisonNormalize for FloatConstant {
    fn normalize_comparison(
        &self,
        right: &Expression,
        operation: ComparisonOperation,
        _can_modify_right: bool,
    ) -> Option<Expression> {
        if let Some(b) = Self::right_operand(right) {
            return Some(Expression::boolean(operation.evaluate(self.value, b)));
        }

        if !right.is_literal_constant() {
            return Some(Expression::comparison(
                right.clone(),
                operation.reverse(),
                Expression::new(ExpressionKind::FloatConstant(*self)),
            ));
        }

        None
    }
}

/// String literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringConstant {
    pub value: String,
}

impl StringConstant {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl fmt::Display for StringConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

impl MathematicCombine for StringConstant {
    fn combine(&self, right: &Expression, operation: MathematicOperation) -> Option<Expression> {
        if operation != MathematicOperation::Add {
            return None;
        }

        let suffix = match &right.kind {
            ExpressionKind::StringConstant(r) => r.value.clone(),
            ExpressionKind::IntegerConstant(r) => r.to_string_value(),
            ExpressionKind::FloatConstant(r) => r.to_string(),
            ExpressionKind::BooleanConstant(b) => b.to_string(),
            _ => return None,
        };

        Some(Expression::string(format!("{}{}", self.value, suffix)))
    }
}

impl ComparisonNormalize for StringConstant {
    fn normalize_comparison(
        &self,
        right: &Expression,
        operation: ComparisonOperation,
        _can_modify_right: bool,
    ) -> Option<Expression> {
        match &right.kind {
            ExpressionKind::StringConstant(r) => Some(Expression::boolean(
                operation.evaluate(self.value.as_str(), r.value.as_str()),
            )),
            _ if !right.is_literal_constant() => Some(Expression::comparison(
                right.clone(),
                operation.reverse(),
                Expression::new(ExpressionKind::StringConstant(self.clone())),
            )),
            _ => None,
        }
    }
}

impl ComparisonNormalize for bool {
    fn normalize_comparison(
        &self,
        right: &Expression,
        operation: ComparisonOperation,
        _can_modify_right: bool,
    ) -> Option<Expression> {
        match (&right.kind, operation) {
            (ExpressionKind::BooleanConstant(r), ComparisonOperation::Equal) => {
                Some(Expression::boolean(*self == *r))
            }
            (ExpressionKind::BooleanConstant(r), ComparisonOperation::NotEqual) => {
                Some(Expression::boolean(*self != *r))
            }
            _ if !right.is_literal_constant() => Some(Expression::comparison(
                right.clone(),
                operation.reverse(),
                Expression::boolean(*self),
            )),
            _ => None,
        }
    }
}
