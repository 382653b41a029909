//! The compiling engine
//!
//! An [`Engine`] holds the two frozen whitelists and turns expression text
//! into evaluators. It has no interior mutability, so one engine can compile
//! from many threads at once.

use log::debug;
use parseo_functions::{FunctionDescriptor, FunctionRegistry, FunctionRegistryBuilder};
use parseo_parser::ExpressionParser;
use serde::{Deserialize, Serialize};

use crate::compiled::CompiledExpression;
use crate::context::Context;
use crate::error::Result;
use crate::eval::Evaluator;
use crate::resolver::{Resolver, ResolverRegistry};
use crate::rewriter::Rewriter;
use parseo_shared::Value;

/// Default bound on rewrite recursion
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Which context keys a compiled expression demands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextRequirement {
    /// Keys of the resolvers that matched while rewriting
    #[default]
    Matched,
    /// Keys of every registered resolver
    Registered,
}

/// Engine behaviour switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Context keys demanded by evaluators
    pub context_requirement: ContextRequirement,
    /// Maximum nesting depth accepted by the rewriter
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            context_requirement: ContextRequirement::Matched,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Whitelisting compiler for formulas
#[derive(Debug, Clone)]
pub struct Engine {
    resolvers: ResolverRegistry,
    functions: FunctionRegistry,
    options: EngineOptions,
}

impl Engine {
    /// Start building an engine
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Canonical text of the rewritten tree, for diagnostics
    pub fn test(&self, text: &str) -> Result<String> {
        Ok(self.compile_expression(text)?.canonical())
    }

    /// Compile to a reusable evaluator
    pub fn compile(&self, text: &str) -> Result<Evaluator> {
        Ok(self.compile_expression(text)?.evaluator(&self.functions))
    }

    /// Parse and rewrite without binding functions
    pub fn compile_expression(&self, text: &str) -> Result<CompiledExpression> {
        let parsed = ExpressionParser::new().parse(text)?;
        debug!("Parsed expression: {}", parsed);

        let (expr, touched) =
            Rewriter::new(&self.resolvers, &self.functions, self.options.max_depth)
                .rewrite(parsed.expr)?;

        let required = match self.options.context_requirement {
            ContextRequirement::Matched => touched,
            ContextRequirement::Registered => self.resolvers.context_keys().clone(),
        };
        debug!(
            "Compiled '{}' requiring [{}]",
            text,
            required.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
        );

        Ok(CompiledExpression::new(text.to_string(), expr, required))
    }

    /// Compile and evaluate once
    pub fn evaluate(&self, text: &str, context: &Context) -> Result<Value> {
        self.compile(text)?.call(context)
    }

    /// Registered resolvers
    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    /// Registered functions
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Active options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

/// Builder for [`Engine`]
pub struct EngineBuilder {
    resolvers: Vec<Resolver>,
    functions: FunctionRegistryBuilder,
    options: EngineOptions,
}

impl EngineBuilder {
    /// Builder with no resolvers and only the built-in `IF`
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
            functions: FunctionRegistry::builder(),
            options: EngineOptions::default(),
        }
    }

    /// Register a variable resolver; earlier registrations match first
    #[must_use]
    pub fn variable(mut self, resolver: impl Into<Resolver>) -> Self {
        self.resolvers.push(resolver.into());
        self
    }

    /// Register a function
    #[must_use]
    pub fn function(mut self, descriptor: FunctionDescriptor) -> Self {
        self.functions = self.functions.function(descriptor);
        self
    }

    /// Whitelist one standard function by name
    #[must_use]
    pub fn standard_function(mut self, name: &str) -> Self {
        self.functions = self.functions.with_standard_function(name);
        self
    }

    /// Whitelist the whole standard library
    #[must_use]
    pub fn standard_library(mut self) -> Self {
        self.functions = self.functions.with_standard_library();
        self
    }

    /// Replace all options
    #[must_use]
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the context requirement policy
    #[must_use]
    pub fn context_requirement(mut self, requirement: ContextRequirement) -> Self {
        self.options.context_requirement = requirement;
        self
    }

    /// Set the nesting limit
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Freeze both registries
    pub fn build(self) -> Result<Engine> {
        let functions = self.functions.build()?;
        let resolvers = ResolverRegistry::new(self.resolvers);
        debug!(
            "Engine built with {} resolvers and functions [{}]",
            resolvers.len(),
            functions.names().join(", ")
        );

        Ok(Engine {
            resolvers,
            functions,
            options: self.options,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
