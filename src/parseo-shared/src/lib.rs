//! Value model shared by the parseo crates
//!
//! Compiled formulas evaluate over [`Value`]s. The [`ops`] module holds the
//! arithmetic, comparison and boolean semantics the evaluator delegates to;
//! host functions use the same [`Result`] alias so their errors pass through
//! the engine untouched.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]

/// Result alias for value operations and host functions
pub type Result<T> = anyhow::Result<T>;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version details printed by `parseo --version`
#[derive(Debug, Clone, Default)]
pub struct BuildInfo {
    /// Package version
    pub version: &'static str,
    /// Short git commit hash
    pub git_hash: Option<&'static str>,
    /// Build date
    pub build_date: Option<&'static str>,
    /// rustc version used for the build
    pub rust_version: Option<&'static str>,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "parseo {}", self.version)?;
        let details = [
            ("Git hash", self.git_hash),
            ("Built", self.build_date),
            ("Rust", self.rust_version),
        ];
        for (label, value) in details {
            if let Some(value) = value {
                writeln!(f, "{label}: {value}")?;
            }
        }
        Ok(())
    }
}

/// Error constructors shared by value operations
pub mod error {
    /// Failure of a value operation
    pub fn operation_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Operation error: {}", msg.into())
    }

    /// Operator applied to operands of unsupported types
    pub fn type_error(op: &str, left: &str, right: &str) -> anyhow::Error {
        anyhow::anyhow!("Type error: cannot apply '{op}' to {left} and {right}")
    }
}

pub mod ops;
pub mod value;

pub use value::{is_truthy, series_to_values, values_to_series, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_build_info_display_full() {
        let build_info = BuildInfo {
            version: "1.0.0",
            git_hash: Some("abc123"),
            build_date: Some("2026-01-01"),
            rust_version: Some("1.80.0"),
        };

        let display = format!("{}", build_info);
        assert!(display.contains("parseo 1.0.0"));
        assert!(display.contains("Git hash: abc123"));
        assert!(display.contains("Built: 2026-01-01"));
        assert!(display.contains("Rust: 1.80.0"));
    }

    #[test]
    fn test_build_info_display_minimal() {
        let build_info = BuildInfo {
            version: "2.0.0",
            git_hash: None,
            build_date: None,
            rust_version: None,
        };

        assert_eq!(format!("{}", build_info), "parseo 2.0.0\n");
    }

    #[test]
    fn test_error_helpers() {
        let err = error::operation_error("boom");
        assert_eq!(err.to_string(), "Operation error: boom");

        let err = error::type_error("+", "string", "integer");
        assert_eq!(
            err.to_string(),
            "Type error: cannot apply '+' to string and integer"
        );
    }
}
