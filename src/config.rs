//! Compiler configuration
//!
//! Limits and switches for trigger compilation. Loaded from TOML, every field
//! is optional and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

fn default_max_alternate_groups() -> usize {
    32
}

fn default_expand_nested_or() -> bool {
    true
}

fn default_max_call_depth() -> usize {
    64
}

/// Settings applied to every compile started from a root scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Upper bound on alternate groups a single trigger may produce
    #[serde(default = "default_max_alternate_groups")]
    pub max_alternate_groups: usize,
    /// Expand `(a || b) && (c || d)` into the cross product of alternates
    #[serde(default = "default_expand_nested_or")]
    pub expand_nested_or: bool,
    /// Maximum nesting of user function calls
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_alternate_groups: default_max_alternate_groups(),
            expand_nested_or: default_expand_nested_or(),
            max_call_depth: default_max_call_depth(),
        }
    }
}

impl CompilerConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(source: &str) -> CompileResult<Self> {
        toml::from_str(source)
            .map_err(|e| CompileError::usage(format!("Invalid compiler configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.max_alternate_groups, 32);
        assert!(config.expand_nested_or);
        assert_eq!(config.max_call_depth, 64);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = CompilerConfig::from_toml_str(
            r#"
            max_alternate_groups = 4
            expand_nested_or = false
        "#,
        )
        .unwrap();

        assert_eq!(config.max_alternate_groups, 4);
        assert!(!config.expand_nested_or);
        assert_eq!(config.max_call_depth, 64);
    }

    #[test]
    fn test_invalid_toml() {
        let err = CompilerConfig::from_toml_str("max_call_depth = \"deep\"").unwrap_err();
        assert!(err.message.contains("Invalid compiler configuration"));
    }
}
