//! Compiled expressions

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parseo_functions::{FunctionRegistry, HostFunction};
use parseo_parser::Expr;

use crate::context::Context;
use crate::eval::Evaluator;

/// Validated, rewritten tree plus the context keys it needs
///
/// Immutable once built and reusable for any number of evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    expr: Expr,
    required_context: IndexSet<String>,
}

impl CompiledExpression {
    pub(crate) fn new(source: String, expr: Expr, required_context: IndexSet<String>) -> Self {
        Self {
            source,
            expr,
            required_context,
        }
    }

    /// Expression text as supplied
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Rewritten tree
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Context keys that must be supplied at evaluation time
    pub fn required_context(&self) -> &IndexSet<String> {
        &self.required_context
    }

    /// Canonical text of the rewritten tree
    pub fn canonical(&self) -> String {
        self.expr.to_string()
    }

    /// Required keys absent from `context`, in requirement order
    pub fn missing_keys(&self, context: &Context) -> Vec<String> {
        self.required_context
            .iter()
            .filter(|key| !context.contains_key(key))
            .cloned()
            .collect()
    }

    /// Evaluator bound to the registry's implementations
    pub fn evaluator(self, functions: &FunctionRegistry) -> Evaluator {
        self.evaluator_with(functions, std::iter::empty())
    }

    /// Evaluator bound to the registry's implementations plus `extra`
    ///
    /// Only functions the tree actually calls are bound. An extra callable
    /// overrides a registry implementation of the same name.
    pub fn evaluator_with<I>(self, functions: &FunctionRegistry, extra: I) -> Evaluator
    where
        I: IntoIterator<Item = (String, HostFunction)>,
    {
        let mut bound: IndexMap<String, HostFunction> = functions
            .implementations()
            .filter(|(name, _)| self.expr.calls(name))
            .map(|(name, func)| (name.to_string(), Arc::clone(func)))
            .collect();
        bound.extend(extra.into_iter().filter(|(name, _)| self.expr.calls(name)));

        Evaluator::new(Arc::new(self), bound)
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
