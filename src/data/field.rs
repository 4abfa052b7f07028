//! Requirement operands

use serde::{Deserialize, Serialize};

/// What a field's `value` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Current value at an address
    MemoryAddress,
    /// Literal value
    Value,
    /// Value at an address on the previous frame
    PreviousValue,
    /// Last different value at an address
    PriorValue,
    /// Value at an address, decoded from BCD
    BinaryCodedDecimal,
    /// Literal floating point value (IEEE-754 bits)
    Float,
}

/// How many bits are read from memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSize {
    Bit0,
    Bit1,
    Bit2,
    Bit3,
    Bit4,
    Bit5,
    Bit6,
    Bit7,
    LowNibble,
    HighNibble,
    Byte,
    Word,
    TByte,
    DWord,
    BitCount,
    BigEndianWord,
    BigEndianDWord,
    Float,
}

impl FieldSize {
    /// Name of the script function reading this size
    pub fn function_name(&self) -> &'static str {
        match self {
            FieldSize::Bit0 => "bit0",
            FieldSize::Bit1 => "bit1",
            FieldSize::Bit2 => "bit2",
            FieldSize::Bit3 => "bit3",
            FieldSize::Bit4 => "bit4",
            FieldSize::Bit5 => "bit5",
            FieldSize::Bit6 => "bit6",
            FieldSize::Bit7 => "bit7",
            FieldSize::LowNibble => "low4",
            FieldSize::HighNibble => "high4",
            FieldSize::Byte => "byte",
            FieldSize::Word => "word",
            FieldSize::TByte => "tbyte",
            FieldSize::DWord => "dword",
            FieldSize::BitCount => "bitcount",
            FieldSize::BigEndianWord => "word_be",
            FieldSize::BigEndianDWord => "dword_be",
            FieldSize::Float => "float",
        }
    }

    /// Every size that has an accessor function
    pub const ALL: [FieldSize; 18] = [
        FieldSize::Bit0,
        FieldSize::Bit1,
        FieldSize::Bit2,
        FieldSize::Bit3,
        FieldSize::Bit4,
        FieldSize::Bit5,
        FieldSize::Bit6,
        FieldSize::Bit7,
        FieldSize::LowNibble,
        FieldSize::HighNibble,
        FieldSize::Byte,
        FieldSize::Word,
        FieldSize::TByte,
        FieldSize::DWord,
        FieldSize::BitCount,
        FieldSize::BigEndianWord,
        FieldSize::BigEndianDWord,
        FieldSize::Float,
    ];
}

/// A typed, sized operand: a literal or a location in emulated memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub field_type: FieldType,
    pub size: FieldSize,
    pub value: u32,
}

impl Field {
    /// Read of `size` at `address`
    pub const fn memory(size: FieldSize, address: u32) -> Self {
        Self {
            field_type: FieldType::MemoryAddress,
            size,
            value: address,
        }
    }

    /// Literal integer operand
    pub const fn value(value: u32) -> Self {
        Self {
            field_type: FieldType::Value,
            size: FieldSize::Byte,
            value,
        }
    }

    /// Literal float operand
    pub fn float(value: f32) -> Self {
        Self {
            field_type: FieldType::Float,
            size: FieldSize::Float,
            value: value.to_bits(),
        }
    }

    /// True if the field reads memory instead of holding a literal
    pub fn is_memory_reference(&self) -> bool {
        matches!(
            self.field_type,
            FieldType::MemoryAddress
                | FieldType::PreviousValue
                | FieldType::PriorValue
                | FieldType::BinaryCodedDecimal
        )
    }

    /// Same field, pointing at a different address or holding a different literal
    #[must_use]
    pub const fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }
}
