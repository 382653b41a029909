//! Error types for function validation and registry construction

use thiserror::Error;

use crate::Arity;

/// A whitelisted function was called with an unacceptable argument shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Wrong number of arguments
    #[error("{name}() expects {expected}, got {found}")]
    Arity {
        /// Function name
        name: String,
        /// Accepted argument counts
        expected: Arity,
        /// Number of arguments supplied
        found: usize,
    },

    /// Condition argument is not a boolean-producing node
    #[error(
        "{name}() condition must be a comparison, boolean operation or literal, got {found}"
    )]
    ConditionKind {
        /// Function name
        name: String,
        /// Kind of the offending node
        found: &'static str,
    },

    /// Any other structural violation reported by a host rewrite
    #[error("{name}(): {message}")]
    Invalid {
        /// Function name
        name: String,
        /// Description of the violation
        message: String,
    },
}

/// Errors raised while building a [`FunctionRegistry`](crate::FunctionRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A standard function was requested that does not exist
    #[error("Unknown standard function '{name}', available functions [{available}]")]
    UnknownStandardFunction {
        /// Requested name
        name: String,
        /// Comma separated list of standard function names
        available: String,
    },

    /// A descriptor tried to replace the built-in conditional
    #[error("Function '{name}' is built in and cannot be replaced")]
    ReservedName {
        /// Function name
        name: String,
    },

    /// A descriptor has neither an implementation nor a rewrite
    #[error("Function '{name}' has neither an implementation nor a rewrite")]
    NotCallable {
        /// Function name
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::Arity {
            name: "IF".to_string(),
            expected: Arity::Exact(3),
            found: 2,
        };
        assert_eq!(err.to_string(), "IF() expects exactly 3 arguments, got 2");

        let err = ValidationError::ConditionKind {
            name: "IF".to_string(),
            found: "name",
        };
        assert_eq!(
            err.to_string(),
            "IF() condition must be a comparison, boolean operation or literal, got name"
        );
    }

    #[test]
    fn test_registry_messages() {
        let err = RegistryError::NotCallable {
            name: "noop".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Function 'noop' has neither an implementation nor a rewrite"
        );

        let err = RegistryError::ReservedName {
            name: "IF".to_string(),
        };
        assert_eq!(err.to_string(), "Function 'IF' is built in and cannot be replaced");
    }
}
