//! Achievement Triggers
//!
//! Compiler backend for achievement scripts. Takes a parsed expression tree,
//! evaluates it against an interpreter scope (variables, built-in and user
//! functions, constant folding) and lowers the result into a [`Trigger`]:
//! a core group and alternate groups of flat [`Requirement`] rows that an
//! emulator-side runtime checks once per frame.
//!
//! ```
//! use achievement_triggers::{compile_trigger, ComparisonOperation, Expression, InterpreterScope};
//!
//! let scope = InterpreterScope::new();
//! let expr = Expression::comparison(
//!     Expression::call("byte", vec![Expression::integer(0x1234)]),
//!     ComparisonOperation::Equal,
//!     Expression::integer(5),
//! );
//! let trigger = compile_trigger(&expr, &scope).unwrap();
//! assert_eq!(trigger.core.len(), 1);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod expr;
pub mod functions;
pub mod memory;
pub mod scope;
pub mod trigger;

// Re-export commonly used types
pub use config::CompilerConfig;
pub use data::{Field, FieldSize, FieldType, Requirement, RequirementOperator, RequirementType, Trigger};
pub use error::{CompileError, CompileErrorKind, CompileResult, Location, Position};
pub use expr::{ComparisonOperation, ConditionalOperation, Expression, ExpressionKind, MathematicOperation};
pub use functions::{FunctionDefinition, UserFunction};
pub use memory::MemoryAccessor;
pub use scope::InterpreterScope;
pub use trigger::{compile_trigger, AchievementBuilder, TriggerBuilderContext};
