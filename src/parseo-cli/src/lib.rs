//! parseo-cli library
//!
//! Provides Config and Executor for programmatic use.

pub mod cli;
mod config;
mod executor;

pub use config::{create_default_config_file, validate_config, Config, VariableConfig};
pub use executor::{render, Executor};
