//! # parseo-engine
//!
//! Whitelisting compiler and evaluator for parseo formulas.
//!
//! Formulas may only mention variables matched by a registered resolver and
//! call functions present in the function registry. Compilation parses the
//! text, rewrites every variable into a concrete read from a named context
//! value and produces an [`Evaluator`] that can be invoked any number of
//! times with fresh contexts.
//!
//! ```rust
//! use parseo_engine::{BindMode, Context, Engine, PatternVariable};
//! use parseo_shared::Value;
//!
//! let engine = Engine::builder()
//!     .variable(PatternVariable::new("M*", r"M(\d+)", "source", BindMode::Index)?)
//!     .build()?;
//!
//! assert_eq!(engine.test("M0 + M1")?, "(source[0] + source[1])");
//!
//! let evaluator = engine.compile("M0 + M1")?;
//! let context = Context::new().with("source", Value::array(vec![Value::Int(10), Value::Int(20)]));
//! assert_eq!(evaluator.call(&context)?, Value::Int(30));
//! # Ok::<(), parseo_engine::EngineError>(())
//! ```

#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::uninlined_format_args
)]

pub mod cache;
pub mod compiled;
pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod resolver;
pub mod rewriter;

pub use cache::{ExpressionCache, DEFAULT_CACHE_SIZE};
pub use compiled::CompiledExpression;
pub use context::Context;
pub use engine::{ContextRequirement, Engine, EngineBuilder, EngineOptions, DEFAULT_MAX_DEPTH};
pub use error::{EngineError, Result};
pub use eval::{EvaluationScope, Evaluator};
pub use resolver::{
    AttributeVariable, AttributedResolver, BindMode, PatternVariable, Resolver, ResolverRegistry,
    SimpleResolver,
};
pub use rewriter::Rewriter;

pub use parseo_functions::{Arity, CallRewrite, FunctionDescriptor, FunctionRegistry, HostFunction};
pub use parseo_parser::{Binding, BindingKey, Expr};
pub use parseo_shared::Value;
