//! Error types for trigger compilation

use std::fmt;

use thiserror::Error;

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

/// A position in the script source (1-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Source range an expression was parsed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A location covering a single line span
    pub const fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start: Position::new(line, start_column),
            end: Position::new(line, end_column),
        }
    }

    /// True if no location information was recorded
    pub fn is_empty(&self) -> bool {
        self.start.line == 0
    }

    /// Smallest location covering both `self` and `other`
    pub fn union(&self, other: &Location) -> Location {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Location {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// The kind of compile error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// Constant folding hit an undefined operation
    Fold,
    /// Expression could not be turned into an address or field
    Conversion,
    /// A function or modifier was used outside its rules
    Usage,
    /// Variable or function not found in scope
    UnresolvableReference,
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_str = match self {
            CompileErrorKind::Fold => "Fold",
            CompileErrorKind::Conversion => "Conversion",
            CompileErrorKind::Usage => "Usage",
            CompileErrorKind::UnresolvableReference => "Reference",
        };
        f.write_str(kind_str)
    }
}

/// Error raised while evaluating or compiling an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error{}: {message}", location_suffix(.location))]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

fn location_suffix(location: &Option<Location>) -> String {
    match location {
        Some(loc) if !loc.is_empty() => {
            format!(" at line {}, column {}", loc.start.line, loc.start.column)
        }
        _ => String::new(),
    }
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Create a new fold error
    pub fn fold(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Fold, message)
    }

    /// Create a new conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Conversion, message)
    }

    /// Create a new usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Usage, message)
    }

    /// Create an unresolvable reference error
    pub fn unresolved(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::UnresolvableReference, message)
    }

    /// Attach a location. An already attached location is kept, so the
    /// innermost expression wins.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        if self.location.map_or(true, |l| l.is_empty()) {
            self.location = Some(location);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_error() {
        let err = CompileError::fold("Division by zero");
        assert_eq!(err.kind, CompileErrorKind::Fold);
        assert!(err.location.is_none());
        assert_eq!(err.to_string(), "Fold error: Division by zero");
    }

    #[test]
    fn test_error_with_location() {
        let err = CompileError::conversion("Cannot convert to an address: \"a\"")
            .with_location(Location::on_line(5, 10, 13));
        assert_eq!(err.kind, CompileErrorKind::Conversion);
        let s = err.to_string();
        assert!(s.contains("line 5"));
        assert!(s.contains("column 10"));
        assert!(s.contains("Cannot convert to an address"));
    }

    #[test]
    fn test_innermost_location_wins() {
        let err = CompileError::usage("bad")
            .with_location(Location::on_line(2, 4, 6))
            .with_location(Location::on_line(1, 1, 20));
        assert_eq!(err.location.map(|l| l.start.line), Some(2));
    }

    #[test]
    fn test_empty_location_is_replaced() {
        let err = CompileError::unresolved("Unknown variable: x")
            .with_location(Location::default())
            .with_location(Location::on_line(3, 1, 2));
        assert_eq!(err.location.map(|l| l.start.line), Some(3));
        assert_eq!(err.kind, CompileErrorKind::UnresolvableReference);
    }

    #[test]
    fn test_location_union() {
        let a = Location::on_line(1, 5, 9);
        let b = Location::on_line(1, 12, 20);
        let u = a.union(&b);
        assert_eq!(u.start, Position::new(1, 5));
        assert_eq!(u.end, Position::new(1, 20));
        assert_eq!(Location::default().union(&b), b);
    }
}
