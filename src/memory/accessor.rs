//! Memory reads and pointer chain construction
//!
//! A pointer chain is a list of `AddAddress` requirements. Each entry reads
//! its left field (offset by everything before it) and the result is added
//! to the address of the next read. The accessor's own field offset applies
//! after the whole chain.

use std::fmt;

use crate::data::{Field, FieldSize, Requirement, RequirementOperator, RequirementType};
use crate::error::{CompileError, CompileResult};
use crate::expr::{Expression, ExpressionKind};
use crate::trigger::TriggerBuilderContext;

use super::ModifiedMemoryAccessor;

/// A (possibly indirect) read of emulated memory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryAccessor {
    pub field: Field,
    pub pointer_chain: Vec<Requirement>,
}

impl MemoryAccessor {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            pointer_chain: Vec::new(),
        }
    }

    /// Direct read of `size` at `address`
    pub fn at(size: FieldSize, address: u32) -> Self {
        Self::new(Field::memory(size, address))
    }

    pub fn with_pointer_chain(field: Field, pointer_chain: Vec<Requirement>) -> Self {
        Self {
            field,
            pointer_chain,
        }
    }

    pub fn has_pointer_chain(&self) -> bool {
        !self.pointer_chain.is_empty()
    }

    /// Read of `size` at the address stored in this accessor's field
    ///
    /// The chain is copied, so `self` is never changed.
    pub fn dereference(&self, size: FieldSize) -> MemoryAccessor {
        let mut pointer_chain = Vec::with_capacity(self.pointer_chain.len() + 1);
        pointer_chain.extend_from_slice(&self.pointer_chain);
        pointer_chain.push(Requirement::modifier(RequirementType::AddAddress, self.field));

        MemoryAccessor {
            field: Field::memory(size, 0),
            pointer_chain,
        }
    }

    /// Same chain, final read moved to `offset`
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.field = self.field.with_value(offset);
        self
    }

    /// Build the accessor a `size` read of `address` refers to
    ///
    /// `address` must already be evaluated.
    pub fn resolve_address(size: FieldSize, address: &Expression) -> CompileResult<MemoryAccessor> {
        let result = match &address.kind {
            ExpressionKind::IntegerConstant(constant) => Ok(Self::at(size, constant.as_u32())),
            ExpressionKind::MemoryAccessor(accessor) => Ok(accessor.dereference(size)),
            ExpressionKind::ModifiedMemoryAccessor(modified) => Self::resolve_modified(size, modified),
            ExpressionKind::MemoryValue(value) => match value.single_term() {
                Some(term) => {
                    Self::resolve_modified(size, term).map(|a| a.with_offset(value.constant as u32))
                }
                None => Err(CompileError::conversion(
                    "Cannot construct single address lookup from multiple memory references",
                )),
            },
            _ => Err(CompileError::conversion(format!(
                "Cannot convert to an address: {}",
                address
            ))),
        };

        result.map_err(|e| e.with_location(address.location))
    }

    fn resolve_modified(size: FieldSize, modified: &ModifiedMemoryAccessor) -> CompileResult<MemoryAccessor> {
        if modified.modifier.is_none() {
            return Ok(modified.accessor.dereference(size));
        }

        // lower `a * k` into rows, every one of them feeds the address
        let mut context = TriggerBuilderContext::new();
        modified.build_trigger(&mut context);
        let pointer_chain = context
            .into_requirements()
            .into_iter()
            .map(|r| r.with_type(RequirementType::AddAddress))
            .collect();

        Ok(MemoryAccessor::with_pointer_chain(Field::memory(size, 0), pointer_chain))
    }

    /// Address part of the display form, without the size function
    fn fmt_address(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut base: Option<String> = None;
        for entry in &self.pointer_chain {
            let mut text = format!(
                "{}({})",
                entry.left.size.function_name(),
                offset_text(base.take(), entry.left.value)
            );
            if entry.operator != RequirementOperator::None {
                text = format!("{} {} {}", text, entry.operator.as_str(), field_text(&entry.right));
            }
            base = Some(text);
        }

        f.write_str(&offset_text(base, self.field.value))
    }
}

fn offset_text(base: Option<String>, offset: u32) -> String {
    match base {
        None => format!("0x{:06X}", offset),
        Some(base) if offset == 0 => base,
        Some(base) => format!("{} + 0x{:02X}", base, offset),
    }
}

/// Display text of a single field
pub(crate) fn field_text(field: &Field) -> String {
    if field.is_memory_reference() {
        format!("{}(0x{:06X})", field.size.function_name(), field.value)
    } else if field.field_type == crate::data::FieldType::Float {
        format!("{:?}", f32::from_bits(field.value))
    } else {
        field.value.to_string()
    }
}

impl fmt::Display for MemoryAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.field.size.function_name())?;
        self.fmt_address(f)?;
        f.write_str(")")
    }
}
