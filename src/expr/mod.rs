//! Expression tree model
//!
//! Expressions arrive already parsed. [`Expression::evaluate`] substitutes
//! variables, inlines function calls, folds constants and normalizes
//! comparisons, producing a tree the trigger builder can lower.
//!
//! Node kinds form a closed enum. Folding behavior hangs off two narrow
//! capability traits, [`MathematicCombine`] and [`ComparisonNormalize`],
//! which only some kinds implement; ask for them with
//! [`Expression::as_combinable`] and [`Expression::as_normalizable`].

mod constants;
mod evaluate;
mod operations;

use std::fmt;

pub use constants::{FloatConstant, IntegerConstant, StringConstant};
pub use operations::{ComparisonOperation, ConditionalOperation, MathematicOperation};

use crate::error::{CompileError, CompileResult, Location};
use crate::memory::{MemoryAccessor, MemoryValue, ModifiedMemoryAccessor};

/// Combine two constant-like values under an arithmetic operator
pub trait MathematicCombine {
    /// Returns `None` if the pairing cannot be folded. A returned
    /// [`ExpressionKind::Error`] node means folding is undefined.
    fn combine(&self, right: &Expression, operation: MathematicOperation) -> Option<Expression>;
}

/// Reduce or canonicalize a comparison
pub trait ComparisonNormalize {
    /// Returns a boolean constant when the result is known, a rewritten
    /// comparison when the operands should be reordered, or `None` to leave
    /// the comparison for the runtime.
    fn normalize_comparison(
        &self,
        right: &Expression,
        operation: ComparisonOperation,
        can_modify_right: bool,
    ) -> Option<Expression>;
}

/// Call of a named function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub parameters: Vec<Expression>,
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        f.write_str(")")
    }
}

/// Node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    IntegerConstant(IntegerConstant),
    FloatConstant(FloatConstant),
    StringConstant(StringConstant),
    BooleanConstant(bool),
    /// Reference to a name in scope
    Variable(String),
    Mathematic {
        left: Box<Expression>,
        operation: MathematicOperation,
        right: Box<Expression>,
    },
    Comparison {
        left: Box<Expression>,
        operation: ComparisonOperation,
        right: Box<Expression>,
    },
    /// `Not` has exactly one operand, `And`/`Or` have one or more
    Conditional {
        operation: ConditionalOperation,
        operands: Vec<Expression>,
    },
    FunctionCall(FunctionCall),
    MemoryAccessor(MemoryAccessor),
    ModifiedMemoryAccessor(ModifiedMemoryAccessor),
    MemoryValue(MemoryValue),
    AlwaysTrue,
    AlwaysFalse,
    Return(Box<Expression>),
    Error(String),
}

/// An expression node and where it came from
#[derive(Debug, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: Location,
}

// Location is diagnostic only.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<ExpressionKind> for Expression {
    fn from(kind: ExpressionKind) -> Self {
        Self::new(kind)
    }
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Self {
            kind,
            location: Location::default(),
        }
    }

    /// Same node at `location`
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn integer(value: i32) -> Self {
        Self::new(ExpressionKind::IntegerConstant(IntegerConstant::new(value)))
    }

    pub fn unsigned(value: u32) -> Self {
        Self::new(ExpressionKind::IntegerConstant(IntegerConstant::unsigned(value)))
    }

    pub fn float(value: f32) -> Self {
        Self::new(ExpressionKind::FloatConstant(FloatConstant::new(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExpressionKind::StringConstant(StringConstant::new(value)))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ExpressionKind::BooleanConstant(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Variable(name.into()))
    }

    pub fn mathematic(left: Expression, operation: MathematicOperation, right: Expression) -> Self {
        Self::new(ExpressionKind::Mathematic {
            left: Box::new(left),
            operation,
            right: Box::new(right),
        })
    }

    pub fn comparison(left: Expression, operation: ComparisonOperation, right: Expression) -> Self {
        Self::new(ExpressionKind::Comparison {
            left: Box::new(left),
            operation,
            right: Box::new(right),
        })
    }

    pub fn and(operands: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::Conditional {
            operation: ConditionalOperation::And,
            operands,
        })
    }

    pub fn or(operands: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::Conditional {
            operation: ConditionalOperation::Or,
            operands,
        })
    }

    pub fn not(operand: Expression) -> Self {
        Self::new(ExpressionKind::Conditional {
            operation: ConditionalOperation::Not,
            operands: vec![operand],
        })
    }

    pub fn call(name: impl Into<String>, parameters: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::FunctionCall(FunctionCall {
            name: name.into(),
            parameters,
        }))
    }

    pub fn memory_accessor(accessor: MemoryAccessor) -> Self {
        Self::new(ExpressionKind::MemoryAccessor(accessor))
    }

    pub fn always_true() -> Self {
        Self::new(ExpressionKind::AlwaysTrue)
    }

    pub fn always_false() -> Self {
        Self::new(ExpressionKind::AlwaysFalse)
    }

    pub fn returning(value: Expression) -> Self {
        let location = value.location;
        Self::new(ExpressionKind::Return(Box::new(value))).at(location)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Error(message.into()))
    }

    /// True for values that cannot change at runtime
    pub fn is_constant(&self) -> bool {
        self.is_literal_constant()
            || matches!(self.kind, ExpressionKind::AlwaysTrue | ExpressionKind::AlwaysFalse)
    }

    /// True for compile-time literal values
    pub fn is_literal_constant(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::IntegerConstant(_)
                | ExpressionKind::FloatConstant(_)
                | ExpressionKind::StringConstant(_)
                | ExpressionKind::BooleanConstant(_)
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExpressionKind::Error(_))
    }

    /// The arithmetic capability of this node, if it has one
    pub fn as_combinable(&self) -> Option<&dyn MathematicCombine> {
        match &self.kind {
            ExpressionKind::IntegerConstant(c) => Some(c),
            ExpressionKind::FloatConstant(c) => Some(c),
            ExpressionKind::StringConstant(c) => Some(c),
            _ => None,
        }
    }

    /// The comparison capability of this node, if it has one
    pub fn as_normalizable(&self) -> Option<&dyn ComparisonNormalize> {
        match &self.kind {
            ExpressionKind::IntegerConstant(c) => Some(c),
            ExpressionKind::FloatConstant(c) => Some(c),
            ExpressionKind::StringConstant(c) => Some(c),
            ExpressionKind::BooleanConstant(b) => Some(b),
            ExpressionKind::MemoryValue(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&IntegerConstant> {
        match &self.kind {
            ExpressionKind::IntegerConstant(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match &self.kind {
            ExpressionKind::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    /// True for an `||` node
    pub fn is_or(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Conditional {
                operation: ConditionalOperation::Or,
                ..
            }
        )
    }

    /// Turn an error node into `Err`, pass anything else through
    pub fn into_result(self) -> CompileResult<Expression> {
        match self.kind {
            ExpressionKind::Error(message) => {
                Err(CompileError::fold(message).with_location(self.location))
            }
            _ => Ok(self),
        }
    }

    fn needs_parentheses(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Mathematic { .. }
                | ExpressionKind::Comparison { .. }
                | ExpressionKind::MemoryValue(_)
                | ExpressionKind::Conditional {
                    operation: ConditionalOperation::And | ConditionalOperation::Or,
                    ..
                }
        )
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parentheses() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::IntegerConstant(c) => write!(f, "{}", c),
            ExpressionKind::FloatConstant(c) => write!(f, "{}", c),
            ExpressionKind::StringConstant(c) => write!(f, "{}", c),
            ExpressionKind::BooleanConstant(b) => write!(f, "{}", b),
            ExpressionKind::Variable(name) => f.write_str(name),
            ExpressionKind::Mathematic {
                left,
                operation,
                right,
            } => {
                left.fmt_operand(f)?;
                write!(f, " {} ", operation.as_str())?;
                right.fmt_operand(f)
            }
            ExpressionKind::Comparison {
                left,
                operation,
                right,
            } => {
                left.fmt_operand(f)?;
                write!(f, " {} ", operation.as_str())?;
                right.fmt_operand(f)
            }
            ExpressionKind::Conditional {
                operation: ConditionalOperation::Not,
                operands,
            } => {
                f.write_str("!")?;
                match operands.first() {
                    Some(operand) => operand.fmt_operand(f),
                    None => Ok(()),
                }
            }
            ExpressionKind::Conditional {
                operation,
                operands,
            } => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", operation.as_str())?;
                    }
                    operand.fmt_operand(f)?;
                }
                Ok(())
            }
            ExpressionKind::FunctionCall(call) => write!(f, "{}", call),
            ExpressionKind::MemoryAccessor(accessor) => write!(f, "{}", accessor),
            ExpressionKind::ModifiedMemoryAccessor(accessor) => write!(f, "{}", accessor),
            ExpressionKind::MemoryValue(value) => write!(f, "{}", value),
            ExpressionKind::AlwaysTrue => f.write_str("always_true()"),
            ExpressionKind::AlwaysFalse => f.write_str("always_false()"),
            ExpressionKind::Return(value) => write!(f, "return {}", value),
            ExpressionKind::Error(message) => write!(f, "error(\"{}\")", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FieldSize;

    fn byte(address: u32) -> Expression {
        Expression::memory_accessor(MemoryAccessor::at(FieldSize::Byte, address))
    }

    #[test]
    fn test_equality_ignores_location() {
        let a = Expression::integer(3).at(Location::on_line(1, 1, 2));
        let b = Expression::integer(3).at(Location::on_line(9, 4, 5));
        assert_eq!(a, b);
        assert_ne!(a, Expression::unsigned(3));
    }

    #[test]
    fn test_constant_flags() {
        assert!(Expression::integer(1).is_literal_constant());
        assert!(Expression::string("a").is_constant());
        assert!(Expression::always_true().is_constant());
        assert!(!Expression::always_true().is_literal_constant());
        assert!(!byte(0x10).is_constant());
    }

    #[test]
    fn test_capabilities() {
        assert!(Expression::integer(1).as_combinable().is_some());
        assert!(Expression::boolean(true).as_combinable().is_none());
        assert!(Expression::boolean(true).as_normalizable().is_some());
        assert!(byte(0x10).as_combinable().is_none());
        assert!(byte(0x10).as_normalizable().is_none());
    }

    #[test]
    fn test_display() {
        let expr = Expression::and(vec![
            Expression::comparison(byte(0x1234), ComparisonOperation::Equal, Expression::integer(5)),
            Expression::not(Expression::variable("done")),
        ]);
        assert_eq!(expr.to_string(), "(byte(0x001234) == 5) && !done");

        let call = Expression::call("repeated", vec![Expression::unsigned(10), Expression::boolean(true)]);
        assert_eq!(call.to_string(), "repeated(10U, true)");
    }

    #[test]
    fn test_into_result() {
        let err = Expression::error("Division by zero").into_result().unwrap_err();
        assert_eq!(err.message, "Division by zero");
        assert!(Expression::integer(1).into_result().is_ok());
    }
}
