//! Condition primitives consumed by the achievement runtime
//!
//! A trigger is a core group plus zero or more alternate groups, each an
//! ordered list of [`Requirement`]s. Order matters: combining requirement
//! types (`AndNext`, `AddHits`, `AddAddress`, ...) apply to the requirement
//! that follows them.

mod field;
mod requirement;
mod trigger;

pub use field::{Field, FieldSize, FieldType};
pub use requirement::{Requirement, RequirementOperator, RequirementType};
pub use trigger::{RequirementGroup, Trigger};
