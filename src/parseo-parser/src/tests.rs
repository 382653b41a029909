//! Tests for the formula parser
//!
//! These tests cover every construct of the formula language, the
//! precedence rules, and the error reported for each class of bad input.

use super::*;
use pretty_assertions::assert_eq;

fn parse_success(input: &str) -> Expression {
    let parser = ExpressionParser::new();
    parser
        .parse(input)
        .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", input, e))
}

fn parse_failure(input: &str) -> ParseError {
    let parser = ExpressionParser::new();
    match parser.parse(input) {
        Ok(expression) => panic!(
            "Expected parse failure for: {}, but got: {:?}",
            input, expression
        ),
        Err(e) => e,
    }
}

fn canonical(input: &str) -> String {
    parse_success(input).to_string()
}

fn name(n: &str) -> Box<Expr> {
    Box::new(Expr::Name(n.to_string()))
}

#[test]
fn test_integer_and_float_literals() {
    assert_eq!(parse_success("42").expr, Expr::Literal(Literal::Int(42)));
    assert_eq!(parse_success("1.5").expr, Expr::Literal(Literal::Float(1.5)));
    assert_eq!(parse_success("2e3").expr, Expr::Literal(Literal::Float(2000.0)));
    assert_eq!(
        parse_success("2.5E-1").expr,
        Expr::Literal(Literal::Float(0.25))
    );
}

#[test]
fn test_integer_overflow_falls_back_to_float() {
    assert_eq!(
        parse_success("9223372036854775808").expr,
        Expr::Literal(Literal::Float(9_223_372_036_854_775_808.0))
    );
}

#[test]
fn test_negative_literals_fold() {
    assert_eq!(parse_success("-3").expr, Expr::Literal(Literal::Int(-3)));
    assert_eq!(parse_success("- 0.5").expr, Expr::Literal(Literal::Float(-0.5)));
    assert_eq!(
        parse_success("-M0").expr,
        Expr::UnaryOp {
            op: UnaryOperator::Neg,
            expr: name("M0")
        }
    );
}

#[test]
fn test_string_literals() {
    assert_eq!(
        parse_success("'Успех'").expr,
        Expr::Literal(Literal::String("Успех".to_string()))
    );
    assert_eq!(
        parse_success(r#""a\"b\n""#).expr,
        Expr::Literal(Literal::String("a\"b\n".to_string()))
    );
    // Single-quoted strings keep backslashes verbatim
    assert_eq!(
        parse_success(r"'a\n'").expr,
        Expr::Literal(Literal::String("a\\n".to_string()))
    );
}

#[test]
fn test_boolean_and_null_literals() {
    for (input, expected) in [
        ("true", Literal::Bool(true)),
        ("True", Literal::Bool(true)),
        ("false", Literal::Bool(false)),
        ("False", Literal::Bool(false)),
        ("null", Literal::Null),
        ("None", Literal::Null),
    ] {
        assert_eq!(parse_success(input).expr, Expr::Literal(expected));
    }
}

#[test]
fn test_names_and_keyword_prefixes() {
    assert_eq!(parse_success("M3").expr, Expr::Name("M3".to_string()));
    assert_eq!(parse_success("_tmp1").expr, Expr::Name("_tmp1".to_string()));
    assert_eq!(parse_success("notable").expr, Expr::Name("notable".to_string()));
    assert_eq!(parse_success("Trueish").expr, Expr::Name("Trueish".to_string()));
    assert_eq!(parse_success("order").expr, Expr::Name("order".to_string()));
}

#[test]
fn test_attribute_access() {
    assert_eq!(
        parse_success("config.x").expr,
        Expr::Attribute {
            base: "config".to_string(),
            attr: "x".to_string()
        }
    );
}

#[test]
fn test_function_calls() {
    assert_eq!(
        parse_success("f()").expr,
        Expr::FunctionCall {
            name: "f".to_string(),
            args: vec![]
        }
    );

    let expression = parse_success("IF( C0 == 0 , 'Успех', 'Неудача' )");
    match expression.expr {
        Expr::FunctionCall { name, args } => {
            assert_eq!(name, "IF");
            assert_eq!(args.len(), 3);
            assert!(matches!(args[0], Expr::Compare { op: CompareOperator::Eq, .. }));
        }
        other => panic!("expected call, got {:?}", other),
    }

    assert_eq!(canonical("max(M0, min(M1, 2))"), "max(M0, min(M1, 2))");
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(canonical("M0 + M1 * M2"), "(M0 + (M1 * M2))");
    assert_eq!(canonical("(M0 + M1) * M2"), "((M0 + M1) * M2)");
    assert_eq!(canonical("a - b - c"), "((a - b) - c)");
    assert_eq!(canonical("a / b * c"), "((a / b) * c)");
    assert_eq!(canonical("-a * b"), "(-a * b)");
}

#[test]
fn test_comparison_binds_looser_than_arithmetic() {
    assert_eq!(canonical("M0 + 1 >= M1 * 2"), "((M0 + 1) >= (M1 * 2))");
    for (input, op) in [
        ("a == b", CompareOperator::Eq),
        ("a != b", CompareOperator::Ne),
        ("a < b", CompareOperator::Lt),
        ("a <= b", CompareOperator::Le),
        ("a > b", CompareOperator::Gt),
        ("a >= b", CompareOperator::Ge),
    ] {
        assert_eq!(
            parse_success(input).expr,
            Expr::Compare {
                left: name("a"),
                op,
                right: name("b")
            }
        );
    }
}

#[test]
fn test_boolean_operators() {
    assert_eq!(
        parse_success("a and b and c").expr,
        Expr::BoolOp {
            op: BoolOperator::And,
            operands: vec![*name("a"), *name("b"), *name("c")]
        }
    );
    assert_eq!(canonical("a or b and c"), "(a or (b and c))");
    assert_eq!(canonical("not a == b"), "not (a == b)");
    assert_eq!(canonical("not a and b"), "(not a and b)");
    assert_eq!(canonical("(a or b) and not c"), "((a or b) and not c)");
}

#[test]
fn test_whitespace_is_insignificant() {
    assert_eq!(canonical("  M0+M1  "), canonical("M0 + M1"));
    assert_eq!(canonical("f(\n a,\tb\n)"), "f(a, b)");
}

#[test]
fn test_canonical_text_reparses_to_same_tree() {
    for input in [
        "IF(C0 == 0, 'ok', \"fail\")",
        "M0 + M1 + C0",
        "-(a + b) / 2.0",
        "not (a < 1 or b > 2.5)",
        "config.rate * 100",
    ] {
        let first = parse_success(input);
        let second = parse_success(&first.to_string());
        assert_eq!(first, second, "canonical text of {:?} changed the tree", input);
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(parse_failure(""), ParseError::EmptyInput);
    assert_eq!(parse_failure("   \n"), ParseError::EmptyInput);
}

#[test]
fn test_trailing_input_is_unexpected_token() {
    assert_eq!(
        parse_failure("M0 M1"),
        ParseError::UnexpectedToken {
            found: "M1".to_string(),
            position: 3
        }
    );
    assert_eq!(
        parse_failure("a < b < c"),
        ParseError::UnexpectedToken {
            found: "<".to_string(),
            position: 6
        }
    );
    assert!(matches!(
        parse_failure("a = b"),
        ParseError::UnexpectedToken { ref found, .. } if found == "="
    ));
}

#[test]
fn test_nested_attribute_access_is_rejected() {
    assert!(matches!(
        parse_failure("a.b.c"),
        ParseError::UnexpectedToken { ref found, position: 3 } if found == "."
    ));
    assert!(matches!(
        parse_failure("f(x).y"),
        ParseError::UnexpectedToken { ref found, .. } if found == "."
    ));
}

#[test]
fn test_unterminated_strings() {
    assert_eq!(
        parse_failure("'abc"),
        ParseError::UnterminatedString { position: 0 }
    );
    assert_eq!(
        parse_failure("f(1, \"abc)"),
        ParseError::UnterminatedString { position: 5 }
    );
}

#[test]
fn test_invalid_syntax() {
    assert!(matches!(parse_failure("()"), ParseError::InvalidSyntax { .. }));
    assert!(matches!(parse_failure("* 2"), ParseError::InvalidSyntax { .. }));
    assert!(matches!(parse_failure("and"), ParseError::InvalidSyntax { .. }));
    assert!(parse_failure("f(a,)").position().is_some());
}

#[test]
fn test_nesting_up_to_the_limit_parses() {
    let input = format!("{}M0{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_eq!(parse_success(&input).expr, Expr::Name("M0".to_string()));
}

#[test]
fn test_nesting_past_the_limit_is_an_error() {
    let depth = MAX_NESTING + 1;
    let input = format!("{}M0{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(
        parse_failure(&input),
        ParseError::NestingTooDeep {
            limit: MAX_NESTING,
            position: MAX_NESTING
        }
    );
}

#[test]
fn test_thousands_of_nested_levels_fail_without_overflowing() {
    let inputs = [
        format!("{}1{}", "(".repeat(5000), ")".repeat(5000)),
        "(".repeat(5000),
        format!("{}1", "-".repeat(5000)),
        format!("{}true", "not ".repeat(5000)),
        format!("{}M0{}", "abs(".repeat(5000), ")".repeat(5000)),
        format!("{}1{}", "IF(a, b, ".repeat(3000), ")".repeat(3000)),
    ];
    for input in &inputs {
        assert!(
            matches!(parse_failure(input), ParseError::NestingTooDeep { .. }),
            "expected a nesting error for input starting {:?}",
            &input[..12]
        );
    }
}

#[test]
fn test_long_operator_chains_are_not_nesting() {
    let input = format!("{}1", "M0 + ".repeat(2000));
    assert!(matches!(
        parse_success(&input).expr,
        Expr::BinaryOp {
            op: BinaryOperator::Add,
            ..
        }
    ));
}

#[test]
fn test_statements_are_not_expressions() {
    parse_failure("x = 1");
    parse_failure("M0; M1");
    parse_failure("lambda: 1");
}

#[test]
fn test_ast_serializes_to_json() {
    let expression = parse_success("M0 + 1");
    let json = serde_json::to_value(&expression).unwrap();
    assert_eq!(json["expr"]["BinaryOp"]["op"], "Add");
    assert_eq!(json["expr"]["BinaryOp"]["left"]["Name"], "M0");
}

#[test]
fn test_version_is_exported() {
    assert!(!VERSION.is_empty());
}
