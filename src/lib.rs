//! # parseo
//!
//! A whitelisting compiler for small formula expressions evaluated against
//! named data sources.
//!
//! A formula such as `IF(C0 == 2, M0 + M1, 0)` may only mention variables
//! recognised by a registered resolver and call functions present in the
//! function registry. Everything else is rejected at compile time with a
//! named error that lists what would have been allowed.
//!
//! ```rust
//! use parseo::{AttributeVariable, BindMode, Context, Engine, PatternVariable, Value};
//! use std::collections::HashMap;
//!
//! let engine = Engine::builder()
//!     .variable(PatternVariable::new("C*", r"C(\d+)", "config", BindMode::Index)?)
//!     .variable(AttributeVariable::new("config", "config_map"))
//!     .build()?;
//!
//! let evaluator = engine.compile("IF(C0 == 2, config.high, config.low)")?;
//! let context = Context::new()
//!     .with("config", Value::array(vec![Value::Int(2)]))
//!     .with(
//!         "config_map",
//!         Value::object(HashMap::from([
//!             ("high".to_string(), Value::string("A")),
//!             ("low".to_string(), Value::string("B")),
//!         ])),
//!     );
//! assert_eq!(evaluator.call(&context)?, Value::string("A"));
//! # Ok::<(), parseo::EngineError>(())
//! ```
//!
//! The crates behind the facade:
//!
//! - [`parser`]: formula text to AST
//! - [`functions`]: function whitelist, the `IF` rewrite and optional standard functions
//! - [`engine`]: resolvers, validating rewrite, evaluation
//! - [`shared`]: the value model and value operations

pub use parseo_engine as engine;
pub use parseo_functions as functions;
pub use parseo_parser as parser;
pub use parseo_shared as shared;

pub use parseo_engine::{
    Arity, AttributeVariable, AttributedResolver, BindMode, Binding, BindingKey, CallRewrite,
    CompiledExpression, Context, ContextRequirement, Engine, EngineBuilder, EngineError,
    EngineOptions, Evaluator, Expr, ExpressionCache, FunctionDescriptor, FunctionRegistry,
    HostFunction, PatternVariable, Resolver, SimpleResolver, Value,
};
pub use parseo_functions::{RegistryError, ValidationError};
pub use parseo_parser::ParseError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
