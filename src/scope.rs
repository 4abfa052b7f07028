//! Name resolution during evaluation
//!
//! Scopes nest by borrowing their parent. A lookup that misses locally
//! walks outward until the root, which owns the registered functions and
//! the [`CompilerConfig`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult};
use crate::expr::Expression;
use crate::functions::{self, FunctionDefinition};

/// Variables and functions visible to an expression
pub struct InterpreterScope<'p> {
    parent: Option<&'p InterpreterScope<'p>>,
    variables: HashMap<String, Expression>,
    functions: HashMap<String, Arc<dyn FunctionDefinition>>,
    in_trigger_clause: bool,
    config: CompilerConfig,
    depth: usize,
}

impl InterpreterScope<'static> {
    /// Root scope with the built-in functions and default configuration
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    /// Root scope with the built-in functions
    pub fn with_config(config: CompilerConfig) -> Self {
        let mut scope = Self::empty(config);
        for function in functions::builtins() {
            scope.define_function(function);
        }
        scope
    }

    /// Root scope with nothing registered
    pub fn empty(config: CompilerConfig) -> Self {
        Self {
            parent: None,
            variables: HashMap::new(),
            functions: HashMap::new(),
            in_trigger_clause: false,
            config,
            depth: 0,
        }
    }
}

impl Default for InterpreterScope<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> InterpreterScope<'p> {
    fn nested(&self, in_trigger_clause: bool, depth: usize) -> InterpreterScope<'_> {
        InterpreterScope {
            parent: Some(self),
            variables: HashMap::new(),
            functions: HashMap::new(),
            in_trigger_clause,
            config: self.config.clone(),
            depth,
        }
    }

    /// Plain nested scope
    pub fn child(&self) -> InterpreterScope<'_> {
        self.nested(false, self.depth)
    }

    /// Nested scope marking everything below it as part of a trigger
    pub fn trigger_clause(&self) -> InterpreterScope<'_> {
        self.nested(true, self.depth)
    }

    /// Nested scope for the body of a function call
    pub fn function_call(&self) -> CompileResult<InterpreterScope<'_>> {
        let depth = self.depth + 1;
        if depth > self.config.max_call_depth {
            return Err(CompileError::usage(format!(
                "Maximum call depth exceeded ({})",
                self.config.max_call_depth
            )));
        }
        Ok(self.nested(false, depth))
    }

    /// Find a variable, searching outward
    pub fn lookup(&self, name: &str) -> Option<&Expression> {
        match self.variables.get(name) {
            Some(value) => Some(value),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    pub fn define_variable(&mut self, name: impl Into<String>, value: Expression) {
        self.variables.insert(name.into(), value);
    }

    /// Register a function under its own name, replacing any previous one
    pub fn define_function(&mut self, function: Arc<dyn FunctionDefinition>) {
        self.functions.insert(function.name().to_string(), function);
    }

    /// Find a function, searching outward
    pub fn get_function(&self, name: &str) -> Option<Arc<dyn FunctionDefinition>> {
        match self.functions.get(name) {
            Some(function) => Some(Arc::clone(function)),
            None => self.parent.and_then(|parent| parent.get_function(name)),
        }
    }

    /// True if this scope or any enclosing scope is a trigger clause
    pub fn is_within_trigger_clause(&self) -> bool {
        self.in_trigger_clause
            || self
                .parent
                .map_or(false, |parent| parent.is_within_trigger_clause())
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Number of function calls between this scope and the root
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for InterpreterScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut variables: Vec<&String> = self.variables.keys().collect();
        variables.sort();
        f.debug_struct("InterpreterScope")
            .field("variables", &variables)
            .field("functions", &self.functions.len())
            .field("in_trigger_clause", &self.in_trigger_clause)
            .field("depth", &self.depth)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
