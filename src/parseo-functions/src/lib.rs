//! Function whitelist for parseo
//!
//! This crate provides the function registry consulted while compiling a
//! formula. Every callable name must be registered here; each entry carries
//! an arity rule, an optional host implementation bound at evaluation time,
//! and an optional structural rewrite applied at compile time (the built-in
//! `IF` is one). A small standard library registers itself through
//! `inventory` and is opted into by name.

#![allow(
    clippy::needless_pass_by_value,
    clippy::too_many_lines,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
    clippy::float_cmp,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

pub mod builtin;
mod conditional;
mod error;

// Re-export inventory for use by builtin modules
pub use inventory;

pub use conditional::{conditional_descriptor, ConditionalRewrite, CONDITIONAL_FUNCTION};
pub use error::{RegistryError, ValidationError};

use indexmap::IndexMap;
use log::warn;
use parseo_parser::Expr;
use parseo_shared::value::Value;
use parseo_shared::Result;
use std::fmt;
use std::sync::Arc;

/// Host function implementation
pub type HostFunction = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

inventory::collect!(FunctionRegistration);

/// A standard function submitted through `inventory`
pub struct FunctionRegistration {
    /// Function name as written in formulas
    pub name: &'static str,
    /// Accepted argument counts
    pub arity: Arity,
    /// Implementation
    pub func: fn(&[Value]) -> Result<Value>,
}

/// Accepted argument counts of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Any number of arguments
    Any,
    /// Exactly `n` arguments
    Exact(usize),
    /// `n` or more arguments
    AtLeast(usize),
    /// Between `min` and `max` arguments, inclusive
    Range(usize, usize),
}

impl Arity {
    /// Whether `count` arguments are acceptable
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Any => true,
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        match self {
            Arity::Any => write!(f, "any number of arguments"),
            Arity::Exact(n) => write!(f, "exactly {} {}", n, plural(*n)),
            Arity::AtLeast(n) => write!(f, "at least {} {}", n, plural(*n)),
            Arity::Range(min, max) => write!(f, "between {} and {} arguments", min, max),
        }
    }
}

/// Compile-time structural rewrite of a call
///
/// Implementations replace a call node with a different node, e.g. the
/// conditional rewrite turning `IF(c, a, b)` into a conditional.
pub trait CallRewrite: Send + Sync {
    /// Check argument kinds beyond arity
    fn validate(&self, name: &str, args: &[Expr]) -> std::result::Result<(), ValidationError> {
        let _ = (name, args);
        Ok(())
    }

    /// Produce the replacement node
    fn rewrite(&self, name: &str, args: Vec<Expr>) -> std::result::Result<Expr, ValidationError>;
}

/// A whitelisted function
#[derive(Clone)]
pub struct FunctionDescriptor {
    name: String,
    arity: Arity,
    implementation: Option<HostFunction>,
    rewrite: Option<Arc<dyn CallRewrite>>,
}

impl FunctionDescriptor {
    /// Function bound to a host implementation at evaluation time
    pub fn new<F>(name: impl Into<String>, arity: Arity, implementation: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            implementation: Some(Arc::new(implementation)),
            rewrite: None,
        }
    }

    /// Function replaced at compile time by `rewrite`
    pub fn rewriting<R>(name: impl Into<String>, arity: Arity, rewrite: R) -> Self
    where
        R: CallRewrite + 'static,
    {
        Self {
            name: name.into(),
            arity,
            implementation: None,
            rewrite: Some(Arc::new(rewrite)),
        }
    }

    /// Attach or replace the host implementation
    #[must_use]
    pub fn with_implementation(mut self, implementation: HostFunction) -> Self {
        self.implementation = Some(implementation);
        self
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accepted argument counts
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Host implementation, if any
    pub fn implementation(&self) -> Option<&HostFunction> {
        self.implementation.as_ref()
    }

    /// Structural rewrite, if any
    pub fn rewriter(&self) -> Option<&dyn CallRewrite> {
        self.rewrite.as_deref()
    }

    /// Validate a call's arguments: arity first, then the rewrite's own checks
    pub fn validate(&self, args: &[Expr]) -> std::result::Result<(), ValidationError> {
        if !self.arity.accepts(args.len()) {
            return Err(ValidationError::Arity {
                name: self.name.clone(),
                expected: self.arity,
                found: args.len(),
            });
        }
        match &self.rewrite {
            Some(rewrite) => rewrite.validate(&self.name, args),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("implementation", &self.implementation.is_some())
            .field("rewrite", &self.rewrite.is_some())
            .finish()
    }
}

/// Frozen registry of whitelisted functions
///
/// Registration order is preserved so whitelist messages list functions in
/// the order they were declared.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: IndexMap<String, FunctionDescriptor>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FunctionRegistry {{ functions: [{}] }}",
            self.names().join(", ")
        )
    }
}

impl FunctionRegistry {
    /// Start building a registry; the builder already holds `IF`
    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder::new()
    }

    /// Check if a function exists
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Get a descriptor by name
    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(name)
    }

    /// Get the number of registered functions
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// All function names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    /// Names and implementations of every function that is called at runtime
    pub fn implementations(&self) -> impl Iterator<Item = (&str, &HostFunction)> {
        self.functions
            .iter()
            .filter_map(|(name, d)| d.implementation().map(|f| (name.as_str(), f)))
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self {
            functions: IndexMap::from([(
                CONDITIONAL_FUNCTION.to_string(),
                conditional_descriptor(),
            )]),
        }
    }
}

/// Builder for [`FunctionRegistry`]
pub struct FunctionRegistryBuilder {
    functions: IndexMap<String, FunctionDescriptor>,
    unknown_standard: Vec<String>,
    reserved: Vec<String>,
}

impl FunctionRegistryBuilder {
    /// Create a builder holding only the built-in `IF`
    pub fn new() -> Self {
        Self {
            functions: FunctionRegistry::default().functions,
            unknown_standard: Vec::new(),
            reserved: Vec::new(),
        }
    }

    /// Register a function
    ///
    /// A duplicate name replaces the earlier descriptor in place. The
    /// built-in `IF` cannot be replaced; trying fails [`build`](Self::build).
    #[must_use]
    pub fn function(mut self, descriptor: FunctionDescriptor) -> Self {
        if descriptor.name() == CONDITIONAL_FUNCTION {
            self.reserved.push(descriptor.name().to_string());
            return self;
        }
        if self.functions.contains_key(descriptor.name()) {
            warn!(
                "Function '{}' registered twice, keeping the latest definition",
                descriptor.name()
            );
        }
        self.functions
            .insert(descriptor.name().to_string(), descriptor);
        self
    }

    /// Register one standard library function by name
    #[must_use]
    pub fn with_standard_function(mut self, name: &str) -> Self {
        match builtin::standard_function(name) {
            Some(descriptor) => self.function(descriptor),
            None => {
                self.unknown_standard.push(name.to_string());
                self
            }
        }
    }

    /// Register every standard library function
    #[must_use]
    pub fn with_standard_library(self) -> Self {
        builtin::standard_function_names()
            .into_iter()
            .fold(self, |builder, name| builder.with_standard_function(name))
    }

    /// Freeze the registry
    ///
    /// Fails on unknown standard function names, on attempts to replace
    /// `IF` and on descriptors that could never be evaluated.
    pub fn build(self) -> std::result::Result<FunctionRegistry, RegistryError> {
        if let Some(name) = self.reserved.into_iter().next() {
            return Err(RegistryError::ReservedName { name });
        }
        if let Some(name) = self.unknown_standard.into_iter().next() {
            return Err(RegistryError::UnknownStandardFunction {
                name,
                available: builtin::standard_function_names().join(", "),
            });
        }

        if let Some(descriptor) = self
            .functions
            .values()
            .find(|d| d.implementation().is_none() && d.rewriter().is_none())
        {
            return Err(RegistryError::NotCallable {
                name: descriptor.name().to_string(),
            });
        }

        Ok(FunctionRegistry {
            functions: self.functions,
        })
    }
}

impl Default for FunctionRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
