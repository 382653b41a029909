//! Error taxonomy of the engine
//!
//! Every failure aborts compilation or evaluation as a whole. Each variant
//! carries enough detail (allowed names, missing keys) for the formula
//! author to fix the expression or the supplied context.

use parseo_functions::{RegistryError, ValidationError};
use parseo_parser::ParseError;
use thiserror::Error;

/// Errors raised while building an engine, compiling or evaluating
#[derive(Debug, Error)]
pub enum EngineError {
    /// Expression text does not parse
    #[error("Syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// An identifier or attribute base matches no registered resolver
    #[error(
        "'{name}' is not an available variable name, supported names [{}]",
        .allowed.join(", ")
    )]
    ForbiddenVariableDefinition {
        /// Offending identifier (or `base.attr`)
        name: String,
        /// Display names of the resolvers of the matching kind
        allowed: Vec<String>,
    },

    /// A call target is not whitelisted
    #[error(
        "Forbidden function call {name}, possible functions [{}]",
        .allowed.join(", ")
    )]
    ForbiddenFunctionCall {
        /// Called name
        name: String,
        /// Whitelisted function names
        allowed: Vec<String>,
    },

    /// A whitelisted function was called with a bad argument shape
    #[error(transparent)]
    FunctionValidation(#[from] ValidationError),

    /// The evaluator was invoked without every required context key
    #[error("Awaited context wasn't provided [{}]", .missing.join(", "))]
    ContextMissMatch {
        /// Exactly the keys that are required but absent
        missing: Vec<String>,
    },

    /// The expression tree is nested deeper than the configured limit
    #[error("Expression nesting exceeds the limit of {limit}")]
    NestingTooDeep {
        /// Configured maximum depth
        limit: usize,
    },

    /// A variable pattern could not be compiled
    #[error("Invalid variable pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as supplied
        pattern: String,
        /// Reason
        message: String,
    },

    /// A matched identifier could not be turned into a binding
    #[error("Cannot bind variable '{name}': {message}")]
    InvalidBinding {
        /// Matched identifier
        name: String,
        /// Reason
        message: String,
    },

    /// The function registry could not be built
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A call survived compilation without an implementation to run
    #[error("No implementation bound for function {name}")]
    UnboundFunction {
        /// Function name
        name: String,
    },

    /// A host function implementation failed
    #[error(transparent)]
    Host(anyhow::Error),

    /// A value operation failed (type mismatch, division by zero, ...)
    #[error(transparent)]
    Evaluation(anyhow::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
