//! Syntax tree for predicate expressions.

use std::fmt;

/// A literal appearing in a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal (single or double quoted).
    Str(String),
    /// `True`/`False` (or `true`/`false`).
    Bool(bool),
}

/// Built-in functions a predicate may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `len(x)`: characters in a string or elements in a list.
    Len,
    /// `abs(x)`: absolute value, or modulus for complex numbers.
    Abs,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Boolean `not`.
    Not,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (true division)
    Div,
    /// `%` (result takes the sign of the divisor)
    Mod,
}

/// Short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `and`
    And,
    /// `or`
    Or,
}

/// Comparison operators. Consecutive comparisons chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>=`
    Ge,
    /// `>`
    Gt,
    /// `in`
    In,
    /// `not in`
    NotIn,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::In => "in",
            Self::NotIn => "not in",
        })
    }
}

/// A predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal.
    Literal(Literal),
    /// A list literal, `[a, b, c]`.
    List(Vec<Expr>),
    /// The owning keyword's value.
    Value,
    /// `user['section']['keyword']`: a resolved value elsewhere in the input.
    UserPath(Vec<String>),
    /// Indexing into a list, `x[i]`.
    Index(Box<Expr>, Box<Expr>),
    /// A built-in function call.
    Call(Builtin, Box<Expr>),
    /// A unary operation.
    Unary(UnaryOp, Box<Expr>),
    /// An arithmetic operation.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// A boolean `and`/`or`.
    Logical(LogicalOp, Box<Expr>, Box<Expr>),
    /// A comparison chain: `first op1 e1 op2 e2 ...`.
    Compare(Box<Expr>, Vec<(CompareOp, Expr)>),
}

impl Expr {
    /// Collects every `user[...]` path the expression reads, in source order.
    #[must_use]
    pub fn user_paths(&self) -> Vec<&[String]> {
        let mut paths = Vec::new();
        self.collect_user_paths(&mut paths);
        paths
    }

    fn collect_user_paths<'a>(&'a self, out: &mut Vec<&'a [String]>) {
        match self {
            Self::Literal(_) | Self::Value => {}
            Self::UserPath(path) => out.push(path),
            Self::List(items) => items.iter().for_each(|e| e.collect_user_paths(out)),
            Self::Call(_, arg) | Self::Unary(_, arg) => arg.collect_user_paths(out),
            Self::Index(lhs, rhs) | Self::Binary(_, lhs, rhs) | Self::Logical(_, lhs, rhs) => {
                lhs.collect_user_paths(out);
                rhs.collect_user_paths(out);
            }
            Self::Compare(first, rest) => {
                first.collect_user_paths(out);
                for (_, e) in rest {
                    e.collect_user_paths(out);
                }
            }
        }
    }
}
