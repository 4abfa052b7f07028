//! Primitive trigger conditions

use serde::{Deserialize, Serialize};

use super::Field;

/// Operator joining the two fields of a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementOperator {
    /// Only the left field is used
    #[default]
    None,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Modifier operators, valid on AddSource/SubSource/AddAddress rows
    Multiply,
    Divide,
    Modulus,
    Add,
    Subtract,
    BitwiseAnd,
    BitwiseXor,
}

impl RequirementOperator {
    /// True for operators that produce a truth value
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            RequirementOperator::Equal
                | RequirementOperator::NotEqual
                | RequirementOperator::LessThan
                | RequirementOperator::LessThanOrEqual
                | RequirementOperator::GreaterThan
                | RequirementOperator::GreaterThanOrEqual
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementOperator::None => "",
            RequirementOperator::Equal => "==",
            RequirementOperator::NotEqual => "!=",
            RequirementOperator::LessThan => "<",
            RequirementOperator::LessThanOrEqual => "<=",
            RequirementOperator::GreaterThan => ">",
            RequirementOperator::GreaterThanOrEqual => ">=",
            RequirementOperator::Multiply => "*",
            RequirementOperator::Divide => "/",
            RequirementOperator::Modulus => "%",
            RequirementOperator::Add => "+",
            RequirementOperator::Subtract => "-",
            RequirementOperator::BitwiseAnd => "&",
            RequirementOperator::BitwiseXor => "^",
        }
    }
}

/// How a requirement joins with the requirements around it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    /// Plain condition, gates its group
    #[default]
    None,
    ResetIf,
    PauseIf,
    AddSource,
    SubSource,
    AddHits,
    SubHits,
    AndNext,
    OrNext,
    /// Value is added to the address of the next requirement
    AddAddress,
    ResetNextIf,
    Measured,
    MeasuredIf,
    Trigger,
}

impl RequirementType {
    /// True if the requirement only modifies the one after it
    pub fn is_combining(&self) -> bool {
        matches!(
            self,
            RequirementType::AddSource
                | RequirementType::SubSource
                | RequirementType::AddHits
                | RequirementType::SubHits
                | RequirementType::AndNext
                | RequirementType::OrNext
                | RequirementType::AddAddress
                | RequirementType::ResetNextIf
        )
    }
}

/// One primitive condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub left: Field,
    pub operator: RequirementOperator,
    pub right: Field,
    pub requirement_type: RequirementType,
    /// 0 means "true every frame", N means "true on N frames"
    pub hit_count: u16,
}

impl Requirement {
    /// Comparison between two fields
    pub const fn compare(left: Field, operator: RequirementOperator, right: Field) -> Self {
        Self {
            left,
            operator,
            right,
            requirement_type: RequirementType::None,
            hit_count: 0,
        }
    }

    /// Row that only contributes its left field, e.g. an AddAddress entry
    pub const fn modifier(requirement_type: RequirementType, left: Field) -> Self {
        Self {
            left,
            operator: RequirementOperator::None,
            right: Field::value(0),
            requirement_type,
            hit_count: 0,
        }
    }

    /// The `1 == 1` sentinel
    pub const fn always_true() -> Self {
        Self::compare(Field::value(1), RequirementOperator::Equal, Field::value(1))
    }

    /// The `0 == 1` sentinel
    pub const fn always_false() -> Self {
        Self::compare(Field::value(0), RequirementOperator::Equal, Field::value(1))
    }

    #[must_use]
    pub const fn with_type(mut self, requirement_type: RequirementType) -> Self {
        self.requirement_type = requirement_type;
        self
    }

    #[must_use]
    pub const fn with_hit_count(mut self, hit_count: u16) -> Self {
        self.hit_count = hit_count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FieldSize;

    #[test]
    fn test_compare_defaults() {
        let req = Requirement::compare(
            Field::memory(FieldSize::Byte, 0x1234),
            RequirementOperator::Equal,
            Field::value(5),
        );
        assert_eq!(req.requirement_type, RequirementType::None);
        assert_eq!(req.hit_count, 0);
        assert!(req.operator.is_comparison());
    }

    #[test]
    fn test_modifier_row() {
        let req = Requirement::modifier(
            RequirementType::AddAddress,
            Field::memory(FieldSize::DWord, 0x10),
        );
        assert_eq!(req.operator, RequirementOperator::None);
        assert!(req.requirement_type.is_combining());
    }

    #[test]
    fn test_sentinels() {
        assert_ne!(Requirement::always_true(), Requirement::always_false());
        assert_eq!(Requirement::always_false().left.value, 0);
        assert_eq!(Requirement::always_false().right.value, 1);
    }

    #[test]
    fn test_serialized_shape() {
        let req = Requirement::always_true()
            .with_type(RequirementType::AddHits)
            .with_hit_count(3);
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(json["requirement_type"], "add_hits");
        assert_eq!(json["operator"], "equal");
        assert_eq!(json["hit_count"], 3);
        assert_eq!(json["left"]["field_type"], "value");
    }
}
