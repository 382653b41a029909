//! Validating tree rewrite
//!
//! One pre-order pass over the parsed tree. Names and attributes are replaced
//! by bindings, calls are checked against the function whitelist and
//! structural rewrites (such as `IF`) are applied. The replacement of a
//! rewrite is visited like any other subtree, so calls it contains are
//! validated too.

use indexmap::IndexSet;
use log::{debug, trace};
use parseo_functions::FunctionRegistry;
use parseo_parser::Expr;

use crate::error::{EngineError, Result};
use crate::resolver::ResolverRegistry;

/// Rewrites one tree and records the context keys it touched
pub struct Rewriter<'a> {
    resolvers: &'a ResolverRegistry,
    functions: &'a FunctionRegistry,
    max_depth: usize,
    touched: IndexSet<String>,
}

impl<'a> Rewriter<'a> {
    /// Create a rewriter over frozen registries
    pub fn new(
        resolvers: &'a ResolverRegistry,
        functions: &'a FunctionRegistry,
        max_depth: usize,
    ) -> Self {
        Self {
            resolvers,
            functions,
            max_depth,
            touched: IndexSet::new(),
        }
    }

    /// Rewrite `expr`, returning the new tree and the touched context keys
    pub fn rewrite(mut self, expr: Expr) -> Result<(Expr, IndexSet<String>)> {
        let rewritten = self.visit(expr, 1)?;
        Ok((rewritten, self.touched))
    }

    fn visit(&mut self, expr: Expr, depth: usize) -> Result<Expr> {
        if depth > self.max_depth {
            return Err(EngineError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        match expr {
            Expr::FunctionCall { name, args } => self.visit_call(name, args, depth),
            Expr::Name(ident) => self.visit_name(&ident),
            Expr::Attribute { base, attr } => self.visit_attribute(&base, &attr),
            Expr::Literal(_) | Expr::Binding(_) => Ok(expr),
            Expr::UnaryOp { op, expr } => Ok(Expr::UnaryOp {
                op,
                expr: Box::new(self.visit(*expr, depth + 1)?),
            }),
            Expr::BinaryOp { left, op, right } => Ok(Expr::BinaryOp {
                left: Box::new(self.visit(*left, depth + 1)?),
                op,
                right: Box::new(self.visit(*right, depth + 1)?),
            }),
            Expr::Compare { left, op, right } => Ok(Expr::Compare {
                left: Box::new(self.visit(*left, depth + 1)?),
                op,
                right: Box::new(self.visit(*right, depth + 1)?),
            }),
            Expr::BoolOp { op, operands } => Ok(Expr::BoolOp {
                op,
                operands: self.visit_all(operands, depth + 1)?,
            }),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => Ok(Expr::Conditional {
                condition: Box::new(self.visit(*condition, depth + 1)?),
                then_branch: Box::new(self.visit(*then_branch, depth + 1)?),
                else_branch: Box::new(self.visit(*else_branch, depth + 1)?),
            }),
        }
    }

    fn visit_all(&mut self, exprs: Vec<Expr>, depth: usize) -> Result<Vec<Expr>> {
        exprs
            .into_iter()
            .map(|expr| self.visit(expr, depth))
            .collect()
    }

    fn visit_call(&mut self, name: String, args: Vec<Expr>, depth: usize) -> Result<Expr> {
        let functions = self.functions;
        let Some(descriptor) = functions.get(&name) else {
            return Err(EngineError::ForbiddenFunctionCall {
                name,
                allowed: functions.names().into_iter().map(str::to_string).collect(),
            });
        };

        descriptor.validate(&args)?;

        match descriptor.rewriter() {
            Some(rewrite) => {
                debug!("Rewriting call to {}", name);
                let replacement = rewrite.rewrite(&name, args)?;
                self.visit(replacement, depth + 1)
            }
            None => Ok(Expr::FunctionCall {
                args: self.visit_all(args, depth + 1)?,
                name,
            }),
        }
    }

    fn visit_name(&mut self, ident: &str) -> Result<Expr> {
        let resolvers = self.resolvers;
        let resolver = resolvers.find_simple(ident).ok_or_else(|| {
            EngineError::ForbiddenVariableDefinition {
                name: ident.to_string(),
                allowed: resolvers.simple_names(),
            }
        })?;

        trace!(
            "Identifier '{}' matched resolver '{}'",
            ident,
            resolver.display_name()
        );
        let binding = resolver.bind(ident)?;
        self.touched.insert(resolver.context_key().to_string());
        Ok(binding)
    }

    fn visit_attribute(&mut self, base: &str, attr: &str) -> Result<Expr> {
        let resolvers = self.resolvers;
        let resolver = resolvers.find_attributed(base).ok_or_else(|| {
            EngineError::ForbiddenVariableDefinition {
                name: format!("{base}.{attr}"),
                allowed: resolvers.attributed_names(),
            }
        })?;

        trace!(
            "Attribute '{}.{}' matched resolver '{}'",
            base,
            attr,
            resolver.display_name()
        );
        self.touched.insert(resolver.context_key().to_string());
        Ok(resolver.bind(base, attr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{AttributeVariable, BindMode, PatternVariable, Resolver};
    use parseo_functions::{Arity, CallRewrite, FunctionDescriptor, ValidationError};
    use parseo_parser::{Binding, ExpressionParser, Literal};
    use parseo_shared::Value;
    use pretty_assertions::assert_eq;

    fn resolvers() -> ResolverRegistry {
        ResolverRegistry::new([
            Resolver::from(PatternVariable::new("M*", r"M(\d+)", "source", BindMode::Index).unwrap()),
            Resolver::from(PatternVariable::new("C*", r"C(\d+)", "config", BindMode::Index).unwrap()),
            Resolver::from(AttributeVariable::new("config", "config_map")),
        ])
    }

    fn functions() -> FunctionRegistry {
        FunctionRegistry::builder()
            .function(FunctionDescriptor::new("double", Arity::Exact(1), |args: &[Value]| {
                parseo_shared::ops::mul_values(&args[0], &Value::Int(2))
            }))
            .build()
            .unwrap()
    }

    fn rewrite(text: &str) -> Result<(Expr, IndexSet<String>)> {
        let parsed = ExpressionParser::new().parse(text)?;
        let resolvers = resolvers();
        let functions = functions();
        Rewriter::new(&resolvers, &functions, 64).rewrite(parsed.expr)
    }

    #[test]
    fn test_names_become_bindings() {
        let (expr, keys) = rewrite("M0 + M1").unwrap();
        assert_eq!(expr.to_string(), "(source[0] + source[1])");
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["source"]);
    }

    #[test]
    fn test_attributes_become_key_bindings() {
        let (expr, keys) = rewrite("config.x").unwrap();
        assert_eq!(expr, Expr::Binding(Binding::key("config_map", "x")));
        assert!(keys.contains("config_map"));
    }

    #[test]
    fn test_conditional_rewrite_recurses() {
        let (expr, keys) = rewrite("IF(C0 == 2, M1, double(M2))").unwrap();
        assert_eq!(
            expr.to_string(),
            "if (config[0] == 2) then source[1] else double(source[2]) end"
        );
        assert!(!expr.calls("IF"));
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["config", "source"]
        );
    }

    #[test]
    fn test_nested_conditionals() {
        let (expr, _) = rewrite("IF(M0 > 1, IF(M1 > 1, 'a', 'b'), 'c')").unwrap();
        assert!(!expr.calls("IF"));
        assert_eq!(
            expr.to_string(),
            r#"if (source[0] > 1) then if (source[1] > 1) then "a" else "b" end else "c" end"#
        );
    }

    #[test]
    fn test_unknown_function() {
        match rewrite("UNKNOWN_FUNC(1)").unwrap_err() {
            EngineError::ForbiddenFunctionCall { name, allowed } => {
                assert_eq!(name, "UNKNOWN_FUNC");
                assert_eq!(allowed, vec!["IF", "double"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_function_inside_arguments() {
        let err = rewrite("double(system(1))").unwrap_err();
        assert!(matches!(err, EngineError::ForbiddenFunctionCall { ref name, .. } if name == "system"));
    }

    #[test]
    fn test_unknown_name_lists_simple_resolvers() {
        match rewrite("Z9").unwrap_err() {
            EngineError::ForbiddenVariableDefinition { name, allowed } => {
                assert_eq!(name, "Z9");
                assert_eq!(allowed, vec!["M*", "C*"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_attribute_lists_attributed_resolvers() {
        match rewrite("settings.x").unwrap_err() {
            EngineError::ForbiddenVariableDefinition { name, allowed } => {
                assert_eq!(name, "settings.x");
                assert_eq!(allowed, vec!["config"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            rewrite("IF(C0 == 1, 'A')").unwrap_err(),
            EngineError::FunctionValidation(_)
        ));
        assert!(matches!(
            rewrite("IF(C0, 'A', 'B')").unwrap_err(),
            EngineError::FunctionValidation(_)
        ));
        assert!(matches!(
            rewrite("double(1, 2)").unwrap_err(),
            EngineError::FunctionValidation(_)
        ));
    }

    #[test]
    fn test_negated_condition_is_not_boolean_kind() {
        match rewrite("IF(not C0 == 1, 'A', 'B')").unwrap_err() {
            EngineError::FunctionValidation(ValidationError::ConditionKind { name, found }) => {
                assert_eq!(name, "IF");
                assert_eq!(found, "logical not");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(rewrite("IF(not_set == 1, 'A', 'B')").is_err());
        assert!(rewrite("IF(C0 != 1, 'A', 'B')").is_ok());
    }

    struct KeepName;

    impl CallRewrite for KeepName {
        fn validate(&self, name: &str, args: &[Expr]) -> std::result::Result<(), ValidationError> {
            if matches!(args.first(), Some(Expr::Name(_))) {
                Ok(())
            } else {
                Err(ValidationError::Invalid {
                    name: name.to_string(),
                    message: "expects a bare name".to_string(),
                })
            }
        }

        fn rewrite(&self, _name: &str, mut args: Vec<Expr>) -> std::result::Result<Expr, ValidationError> {
            Ok(args.remove(0))
        }
    }

    #[test]
    fn test_host_rewrite_refusal_is_a_validation_error() {
        let resolvers = resolvers();
        let functions = FunctionRegistry::builder()
            .function(FunctionDescriptor::rewriting("raw", Arity::Exact(1), KeepName))
            .build()
            .unwrap();
        let rewrite = |text: &str| {
            let parsed = ExpressionParser::new().parse(text).unwrap();
            Rewriter::new(&resolvers, &functions, 64).rewrite(parsed.expr)
        };

        let (expr, _) = rewrite("raw(M3)").unwrap();
        assert_eq!(expr, Expr::Binding(Binding::index("source", 3)));

        match rewrite("raw(1)").unwrap_err() {
            EngineError::FunctionValidation(err) => {
                assert_eq!(err.to_string(), "raw(): expects a bare name");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_literals_pass_through() {
        let (expr, keys) = rewrite("'text'").unwrap();
        assert_eq!(expr, Expr::Literal(Literal::String("text".to_string())));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let parsed = ExpressionParser::new().parse("-(-(-(-M0)))").unwrap();
        let resolvers = resolvers();
        let functions = functions();
        let err = Rewriter::new(&resolvers, &functions, 3)
            .rewrite(parsed.expr)
            .unwrap_err();
        assert!(matches!(err, EngineError::NestingTooDeep { limit: 3 }));
    }
}
