//! Tree-walking evaluation
//!
//! An [`Evaluator`] owns a compiled tree and the host functions it calls.
//! Each invocation builds an [`EvaluationScope`] over the caller's context
//! and walks the tree. Nothing is shared or mutated between invocations.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use parseo_functions::HostFunction;
use parseo_parser::{
    BinaryOperator, BindingKey, BoolOperator, CompareOperator, Expr, Literal, UnaryOperator,
};
use parseo_shared::ops::{self, Comparison};
use parseo_shared::{is_truthy, Value};

use crate::compiled::CompiledExpression;
use crate::context::Context;
use crate::error::{EngineError, Result};

/// Borrowed view used while walking one tree
pub struct EvaluationScope<'a> {
    context: &'a Context,
    functions: &'a IndexMap<String, HostFunction>,
}

impl<'a> EvaluationScope<'a> {
    /// Scope over a context and a bound function table
    pub fn new(context: &'a Context, functions: &'a IndexMap<String, HostFunction>) -> Self {
        Self { context, functions }
    }

    /// Evaluate `expr` in this scope
    pub fn evaluate(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),

            Expr::Binding(binding) => {
                let source = self.context.get(&binding.context).ok_or_else(|| {
                    EngineError::ContextMissMatch {
                        missing: vec![binding.context.clone()],
                    }
                })?;
                match &binding.key {
                    BindingKey::Index(i) => source.index(*i),
                    BindingKey::Key(k) => source.field(k),
                }
                .map_err(EngineError::Evaluation)
            }

            Expr::FunctionCall { name, args } => {
                let func = self
                    .functions
                    .get(name)
                    .ok_or_else(|| EngineError::UnboundFunction { name: name.clone() })?;
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>>>()?;
                func(&values).map_err(EngineError::Host)
            }

            Expr::UnaryOp { op, expr } => {
                let value = self.evaluate(expr)?;
                match op {
                    UnaryOperator::Neg => ops::neg_value(&value),
                    UnaryOperator::Not => ops::not_value(&value),
                }
                .map_err(EngineError::Evaluation)
            }

            Expr::BinaryOp { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match op {
                    BinaryOperator::Add => ops::add_values(&left, &right),
                    BinaryOperator::Sub => ops::sub_values(&left, &right),
                    BinaryOperator::Mul => ops::mul_values(&left, &right),
                    BinaryOperator::Div => ops::div_values(&left, &right),
                }
                .map_err(EngineError::Evaluation)
            }

            Expr::Compare { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                comparison(*op)
                    .apply(&left, &right)
                    .map_err(EngineError::Evaluation)
            }

            Expr::BoolOp { op, operands } => self.evaluate_bool_op(*op, operands),

            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.evaluate(condition)?;
                if condition.is_series() {
                    let then_value = self.evaluate(then_branch)?;
                    let else_value = self.evaluate(else_branch)?;
                    ops::select_values(&condition, &then_value, &else_value)
                        .map_err(EngineError::Evaluation)
                } else if is_truthy(&condition) {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }

            Expr::Name(name) => Err(EngineError::ForbiddenVariableDefinition {
                name: name.clone(),
                allowed: Vec::new(),
            }),
            Expr::Attribute { base, attr } => Err(EngineError::ForbiddenVariableDefinition {
                name: format!("{base}.{attr}"),
                allowed: Vec::new(),
            }),
        }
    }

    // Scalars short-circuit; once a column shows up the rest combine element-wise
    fn evaluate_bool_op(&self, op: BoolOperator, operands: &[Expr]) -> Result<Value> {
        let mut acc: Option<Value> = None;

        for operand in operands {
            if let Some(current) = &acc {
                if !current.is_series() {
                    let truthy = is_truthy(current);
                    match op {
                        BoolOperator::And if !truthy => return Ok(Value::Bool(false)),
                        BoolOperator::Or if truthy => return Ok(Value::Bool(true)),
                        _ => {}
                    }
                }
            }

            let value = self.evaluate(operand)?;
            acc = Some(match acc {
                None => value,
                Some(current) => match op {
                    BoolOperator::And => ops::and_values(&current, &value),
                    BoolOperator::Or => ops::or_values(&current, &value),
                }
                .map_err(EngineError::Evaluation)?,
            });
        }

        Ok(match acc {
            Some(value) if value.is_series() => value,
            Some(value) => Value::Bool(is_truthy(&value)),
            None => Value::Bool(op == BoolOperator::And),
        })
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Null => Value::Null,
    }
}

fn comparison(op: CompareOperator) -> Comparison {
    match op {
        CompareOperator::Eq => Comparison::Eq,
        CompareOperator::Ne => Comparison::Ne,
        CompareOperator::Lt => Comparison::Lt,
        CompareOperator::Le => Comparison::Le,
        CompareOperator::Gt => Comparison::Gt,
        CompareOperator::Ge => Comparison::Ge,
    }
}

/// Reusable callable produced from a [`CompiledExpression`]
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Evaluator {
    compiled: Arc<CompiledExpression>,
    functions: Arc<IndexMap<String, HostFunction>>,
}

impl Evaluator {
    pub(crate) fn new(
        compiled: Arc<CompiledExpression>,
        functions: IndexMap<String, HostFunction>,
    ) -> Self {
        Self {
            compiled,
            functions: Arc::new(functions),
        }
    }

    /// Evaluate against `context`
    ///
    /// Fails with [`EngineError::ContextMissMatch`] before touching the tree
    /// when a required key is absent.
    pub fn call(&self, context: &Context) -> Result<Value> {
        let missing = self.compiled.missing_keys(context);
        if !missing.is_empty() {
            return Err(EngineError::ContextMissMatch { missing });
        }

        debug!("Evaluating {}", self.compiled.canonical());
        EvaluationScope::new(context, &self.functions).evaluate(self.compiled.expr())
    }

    /// The compiled expression behind this evaluator
    pub fn compiled(&self) -> &CompiledExpression {
        &self.compiled
    }

    /// Context keys that must be supplied to [`call`](Self::call)
    pub fn required_context(&self) -> impl Iterator<Item = &str> {
        self.compiled.required_context().iter().map(String::as_str)
    }

    /// Names of the bound host functions
    pub fn bound_functions(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("expression", &self.compiled.canonical())
            .field("required_context", &self.compiled.required_context())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parseo_parser::Binding;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn binding(context: &str, index: i64) -> Expr {
        Expr::Binding(Binding::index(context, index))
    }

    fn int(i: i64) -> Expr {
        Expr::Literal(Literal::Int(i))
    }

    fn evaluate(expr: &Expr, context: &Context) -> Result<Value> {
        let functions = IndexMap::new();
        EvaluationScope::new(context, &functions).evaluate(expr)
    }

    #[test]
    fn test_binding_reads_context() {
        let ctx = Context::new().with("source", Value::array(vec![Value::Int(10), Value::Int(20)]));
        let expr = Expr::BinaryOp {
            left: Box::new(binding("source", 0)),
            op: BinaryOperator::Add,
            right: Box::new(binding("source", 1)),
        };
        assert_eq!(evaluate(&expr, &ctx).unwrap(), Value::Int(30));
    }

    #[test]
    fn test_missing_key_reads_null() {
        let ctx = Context::new().with("config_map", Value::object(Default::default()));
        let expr = Expr::Binding(Binding::key("config_map", "x"));
        assert_eq!(evaluate(&expr, &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_conditional_is_lazy_on_scalars() {
        // The untaken branch divides by zero
        let expr = Expr::Conditional {
            condition: Box::new(Expr::Literal(Literal::Bool(true))),
            then_branch: Box::new(int(1)),
            else_branch: Box::new(Expr::BinaryOp {
                left: Box::new(int(1)),
                op: BinaryOperator::Div,
                right: Box::new(int(0)),
            }),
        };
        assert_eq!(evaluate(&expr, &Context::new()).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_bool_op_short_circuits() {
        let failing = Expr::BinaryOp {
            left: Box::new(int(1)),
            op: BinaryOperator::Div,
            right: Box::new(int(0)),
        };
        let expr = Expr::BoolOp {
            op: BoolOperator::Or,
            operands: vec![Expr::Literal(Literal::Bool(true)), failing.clone()],
        };
        assert_eq!(evaluate(&expr, &Context::new()).unwrap(), Value::Bool(true));

        let expr = Expr::BoolOp {
            op: BoolOperator::And,
            operands: vec![int(0), failing],
        };
        assert_eq!(evaluate(&expr, &Context::new()).unwrap(), Value::Bool(false));

        let expr = Expr::BoolOp {
            op: BoolOperator::And,
            operands: vec![int(1), Expr::Literal(Literal::String("x".to_string()))],
        };
        assert_eq!(evaluate(&expr, &Context::new()).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_column_conditional() {
        let frame = df! { "m0" => [1i64, 5, 3] }.unwrap();
        let ctx = Context::new().with("source", Value::DataFrame(frame));
        let expr = Expr::Conditional {
            condition: Box::new(Expr::Compare {
                left: Box::new(binding("source", 0)),
                op: CompareOperator::Gt,
                right: Box::new(int(2)),
            }),
            then_branch: Box::new(Expr::Literal(Literal::String("hi".to_string()))),
            else_branch: Box::new(Expr::Literal(Literal::String("lo".to_string()))),
        };

        match evaluate(&expr, &ctx).unwrap() {
            Value::Series(s) => {
                let values: Vec<Option<&str>> = s.str().unwrap().into_iter().collect();
                assert_eq!(values, vec![Some("lo"), Some("hi"), Some("hi")]);
            }
            other => panic!("expected a column, got {other:?}"),
        }
    }

    #[test]
    fn test_column_bool_op() {
        let frame = df! { "m0" => [1i64, 5, 3] }.unwrap();
        let ctx = Context::new().with("source", Value::DataFrame(frame));
        let greater = |n| Expr::Compare {
            left: Box::new(binding("source", 0)),
            op: CompareOperator::Gt,
            right: Box::new(int(n)),
        };
        let expr = Expr::BoolOp {
            op: BoolOperator::And,
            operands: vec![greater(1), Expr::UnaryOp {
                op: UnaryOperator::Not,
                expr: Box::new(greater(4)),
            }],
        };

        match evaluate(&expr, &ctx).unwrap() {
            Value::Series(s) => {
                let values: Vec<Option<bool>> = s.bool().unwrap().into_iter().collect();
                assert_eq!(values, vec![Some(false), Some(false), Some(true)]);
            }
            other => panic!("expected a column, got {other:?}"),
        }
    }

    #[test]
    fn test_function_errors_propagate_unchanged() {
        let mut functions: IndexMap<String, HostFunction> = IndexMap::new();
        functions.insert(
            "fail".to_string(),
            Arc::new(|_: &[Value]| -> parseo_shared::Result<Value> {
                Err(anyhow::anyhow!("upstream unavailable"))
            }),
        );
        let ctx = Context::new();
        let expr = Expr::FunctionCall {
            name: "fail".to_string(),
            args: vec![],
        };
        let err = EvaluationScope::new(&ctx, &functions)
            .evaluate(&expr)
            .unwrap_err();
        assert!(matches!(err, EngineError::Host(_)));
        assert_eq!(err.to_string(), "upstream unavailable");
    }

    #[test]
    fn test_unbound_function() {
        let expr = Expr::FunctionCall {
            name: "ghost".to_string(),
            args: vec![],
        };
        assert!(matches!(
            evaluate(&expr, &Context::new()).unwrap_err(),
            EngineError::UnboundFunction { .. }
        ));
    }

    #[test]
    fn test_type_errors_are_evaluation_errors() {
        let expr = Expr::BinaryOp {
            left: Box::new(int(1)),
            op: BinaryOperator::Sub,
            right: Box::new(Expr::Literal(Literal::String("a".to_string()))),
        };
        assert!(matches!(
            evaluate(&expr, &Context::new()).unwrap_err(),
            EngineError::Evaluation(_)
        ));
    }
}
