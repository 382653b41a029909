//! Abstract Syntax Tree (AST) definitions for the parseo formula language
//!
//! This module defines the AST nodes produced by the parser and rewritten
//! by the engine. Nodes are immutable values; rewriting builds new trees.

use std::fmt;

/// Represents a complete parsed formula
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Expression {
    /// The root expression
    pub expr: Expr,
}

/// Core expression types
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Expr {
    /// Literal value
    Literal(Literal),

    /// Bare identifier (`M3`)
    Name(String),

    /// One-level attribute access (`config.x`)
    Attribute {
        /// Base identifier
        base: String,
        /// Attribute name
        attr: String,
    },

    /// Function call (`func(args...)`)
    FunctionCall {
        /// Function name
        name: String,
        /// Positional arguments
        args: Vec<Expr>,
    },

    /// Unary operation (`-x`, `not x`)
    UnaryOp {
        /// Operator
        op: UnaryOperator,
        /// Operand
        expr: Box<Expr>,
    },

    /// Arithmetic operation (left op right)
    BinaryOp {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: BinaryOperator,
        /// Right operand
        right: Box<Expr>,
    },

    /// Comparison (left op right)
    Compare {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: CompareOperator,
        /// Right operand
        right: Box<Expr>,
    },

    /// Boolean combinator over two or more operands
    BoolOp {
        /// Operator
        op: BoolOperator,
        /// Operands, evaluated left to right
        operands: Vec<Expr>,
    },

    /// Conditional expression
    Conditional {
        /// Condition expression
        condition: Box<Expr>,
        /// Value when the condition holds
        then_branch: Box<Expr>,
        /// Value otherwise
        else_branch: Box<Expr>,
    },

    /// Read of a context value by index or key
    Binding(Binding),
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum BinaryOperator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum CompareOperator {
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
}

/// Boolean combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum BoolOperator {
    /// Logical and
    And,
    /// Logical or
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum UnaryOperator {
    /// Arithmetic negation (-)
    Neg,
    /// Logical not
    Not,
}

/// Literal values
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Literal {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Bool(bool),
    /// Null literal
    Null,
}

/// A concrete data-access path: `context[key]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Binding {
    /// Context key the value is read from
    pub context: String,
    /// Position or key inside that context value
    pub key: BindingKey,
}

/// Subscript used by a [`Binding`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub enum BindingKey {
    /// Positional subscript
    Index(i64),
    /// Named subscript
    Key(String),
}

impl Binding {
    /// Binding that reads `context[index]`
    pub fn index(context: impl Into<String>, index: i64) -> Self {
        Self {
            context: context.into(),
            key: BindingKey::Index(index),
        }
    }

    /// Binding that reads `context["key"]`
    pub fn key(context: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            key: BindingKey::Key(key.into()),
        }
    }
}

impl Expr {
    /// Whether this node produces a boolean by construction
    ///
    /// Comparisons, `and`/`or` and constant literals qualify. A `not` does
    /// not: it negates truthiness of any operand.
    #[must_use]
    pub fn is_boolean_kind(&self) -> bool {
        matches!(
            self,
            Expr::Compare { .. } | Expr::BoolOp { .. } | Expr::Literal(_)
        )
    }

    /// Short human-readable name of the node kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Name(_) => "name",
            Expr::Attribute { .. } => "attribute",
            Expr::FunctionCall { .. } => "function call",
            Expr::UnaryOp {
                op: UnaryOperator::Neg,
                ..
            } => "negation",
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                ..
            } => "logical not",
            Expr::BinaryOp { .. } => "arithmetic operation",
            Expr::Compare { .. } => "comparison",
            Expr::BoolOp { .. } => "boolean operation",
            Expr::Conditional { .. } => "conditional",
            Expr::Binding(_) => "binding",
        }
    }

    /// Direct children of this node, left to right
    #[must_use]
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(_) | Expr::Name(_) | Expr::Attribute { .. } | Expr::Binding(_) => {
                Vec::new()
            }
            Expr::FunctionCall { args, .. } => args.iter().collect(),
            Expr::UnaryOp { expr, .. } => vec![expr],
            Expr::BinaryOp { left, right, .. } | Expr::Compare { left, right, .. } => {
                vec![left, right]
            }
            Expr::BoolOp { operands, .. } => operands.iter().collect(),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => vec![condition, then_branch, else_branch],
        }
    }

    /// Whether `predicate` holds for this node or any descendant
    pub fn any(&self, predicate: &dyn Fn(&Expr) -> bool) -> bool {
        predicate(self) || self.children().into_iter().any(|child| child.any(predicate))
    }

    /// Whether the tree contains a call to `name`
    #[must_use]
    pub fn calls(&self, name: &str) -> bool {
        self.any(&|node| matches!(node, Expr::FunctionCall { name: called, .. } if called == name))
    }

    /// Height of the tree (a leaf has depth 1)
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::depth)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Name(name) => write!(f, "{name}"),
            Expr::Attribute { base, attr } => write!(f, "{base}.{attr}"),
            Expr::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Neg => write!(f, "-{expr}"),
                UnaryOperator::Not => write!(f, "not {expr}"),
            },
            Expr::BinaryOp { left, op, right } => write!(f, "({left} {op} {right})"),
            Expr::Compare { left, op, right } => write!(f, "({left} {op} {right})"),
            Expr::BoolOp { op, operands } => {
                write!(f, "(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {op} ")?;
                    }
                    write!(f, "{operand}")?;
                }
                write!(f, ")")
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "if {condition} then {then_branch} else {else_branch} end"),
            Expr::Binding(binding) => write!(f, "{binding}"),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            BindingKey::Index(i) => write!(f, "{}[{}]", self.context, i),
            BindingKey::Key(k) => {
                write!(f, "{}[", self.context)?;
                write_quoted(f, k)?;
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        };
        write!(f, "{op}")
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            CompareOperator::Eq => "==",
            CompareOperator::Ne => "!=",
            CompareOperator::Lt => "<",
            CompareOperator::Le => "<=",
            CompareOperator::Gt => ">",
            CompareOperator::Ge => ">=",
        };
        write!(f, "{op}")
    }
}

impl fmt::Display for BoolOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOperator::And => write!(f, "and"),
            BoolOperator::Or => write!(f, "or"),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Neg => write!(f, "-"),
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{i}"),
            // Debug keeps the fractional part (`2.0`), so floats stay floats when reparsed
            Literal::Float(fl) => write!(f, "{fl:?}"),
            Literal::String(s) => write_quoted(f, s),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => write!(f, "null"),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for ch in s.chars() {
        match ch {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}
