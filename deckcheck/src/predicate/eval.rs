//! Evaluation of predicate expressions over typed values.
//!
//! Evaluation is pure: it reads the keyword's value and the resolved tree and
//! produces a boolean. There is no truthiness; `and`, `or` and `not` take
//! booleans only, and the predicate as a whole must yield a boolean.

use std::cmp::Ordering;

use thiserror::Error;

use super::ast::{BinaryOp, Builtin, CompareOp, Expr, Literal, LogicalOp, UnaryOp};
use crate::types::{Complex, Value};

/// Read access to already-resolved values, addressed by section/keyword path.
pub trait Lookup {
    /// Returns the resolved value at `path`, if it has been resolved.
    fn lookup(&self, path: &[String]) -> Option<&Value>;
}

/// Why a predicate could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The expression reads a `user[...]` path with no resolved value.
    #[error("{} has no resolved value", render_user_path(.path))]
    Unresolved {
        /// The path that was read.
        path: Vec<String>,
    },

    /// The expression is well-formed but cannot be evaluated safely
    /// (mismatched operand types, division by zero, overflow, ...).
    #[error("{0}")]
    Unsupported(String),
}

/// Renders a path the way predicates spell it: `user['scf']['energy']`.
#[must_use]
pub fn render_user_path(path: &[String]) -> String {
    let mut out = String::from("user");
    for key in path {
        out.push_str("['");
        out.push_str(key);
        out.push_str("']");
    }
    out
}

/// Evaluates a parsed expression against a keyword value and the resolved tree.
///
/// # Errors
///
/// Returns [`EvalError::Unresolved`] when a `user[...]` path has no value yet,
/// and [`EvalError::Unsupported`] when evaluation cannot proceed or the result
/// is not a boolean.
pub fn evaluate<L: Lookup + ?Sized>(
    expr: &Expr,
    value: &Value,
    user: &L,
) -> Result<bool, EvalError> {
    Evaluator { value, user }.truth(expr)
}

fn unsupported(message: impl Into<String>) -> EvalError {
    EvalError::Unsupported(message.into())
}

struct Evaluator<'a, L: ?Sized> {
    value: &'a Value,
    user: &'a L,
}

impl<L: Lookup + ?Sized> Evaluator<'_, L> {
    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(lit) => Ok(literal(lit)),
            Expr::List(items) => items
                .iter()
                .map(|e| self.eval(e))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Value => Ok(self.value.clone()),
            Expr::UserPath(path) => {
                self.user
                    .lookup(path)
                    .cloned()
                    .ok_or_else(|| EvalError::Unresolved { path: path.clone() })
            }
            Expr::Index(base, index) => index_into(&self.eval(base)?, &self.eval(index)?),
            Expr::Call(builtin, arg) => call(*builtin, &self.eval(arg)?),
            Expr::Unary(UnaryOp::Neg, arg) => negate(&self.eval(arg)?),
            Expr::Unary(UnaryOp::Not, arg) => Ok(Value::Bool(!self.truth(arg)?)),
            Expr::Binary(op, lhs, rhs) => arithmetic(*op, &self.eval(lhs)?, &self.eval(rhs)?),
            Expr::Logical(LogicalOp::And, lhs, rhs) => {
                Ok(Value::Bool(self.truth(lhs)? && self.truth(rhs)?))
            }
            Expr::Logical(LogicalOp::Or, lhs, rhs) => {
                Ok(Value::Bool(self.truth(lhs)? || self.truth(rhs)?))
            }
            Expr::Compare(first, rest) => self.compare_chain(first, rest).map(Value::Bool),
        }
    }

    fn truth(&self, expr: &Expr) -> Result<bool, EvalError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(unsupported(format!(
                "expected a boolean, found {} {other}",
                other.kind()
            ))),
        }
    }

    /// `a < b < c` means `a < b and b < c`, with `b` evaluated once.
    fn compare_chain(&self, first: &Expr, rest: &[(CompareOp, Expr)]) -> Result<bool, EvalError> {
        let mut lhs = self.eval(first)?;
        for (op, expr) in rest {
            let rhs = self.eval(expr)?;
            if !compare(*op, &lhs, &rhs)? {
                return Ok(false);
            }
            lhs = rhs;
        }
        Ok(true)
    }
}

fn literal(lit: &Literal) -> Value {
    match lit {
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(x) => Value::Float(*x),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

// ============================================================================
// Numbers
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
    Complex(Complex),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Self::Int(*i)),
            Value::Float(x) => Some(Self::Float(*x)),
            Value::Complex(z) => Some(Self::Complex(*z)),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn real(self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(i as f64),
            Self::Float(x) => Some(x),
            Self::Complex(_) => None,
        }
    }

    fn complex(self) -> Complex {
        match self {
            Self::Complex(z) => z,
            other => Complex::from_real(other.real().unwrap_or_default()),
        }
    }
}

const fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if let (BinaryOp::Add, Value::Str(a), Value::Str(b)) = (op, lhs, rhs) {
        return Ok(Value::Str(format!("{a}{b}")));
    }

    let (Some(a), Some(b)) = (Num::of(lhs), Num::of(rhs)) else {
        return Err(unsupported(format!(
            "operator '{}' is not defined for {} and {}",
            symbol(op),
            lhs.kind(),
            rhs.kind()
        )));
    };

    match (a, b) {
        (Num::Int(x), Num::Int(y)) => int_arithmetic(op, x, y),
        (Num::Complex(_), _) | (_, Num::Complex(_)) => {
            complex_arithmetic(op, a.complex(), b.complex())
        }
        _ => float_arithmetic(
            op,
            a.real().unwrap_or_default(),
            b.real().unwrap_or_default(),
        ),
    }
}

fn int_arithmetic(op: BinaryOp, x: i64, y: i64) -> Result<Value, EvalError> {
    let overflow = || unsupported(format!("integer overflow in {x} {} {y}", symbol(op)));
    match op {
        BinaryOp::Add => x.checked_add(y).map(Value::Int).ok_or_else(overflow),
        BinaryOp::Sub => x.checked_sub(y).map(Value::Int).ok_or_else(overflow),
        BinaryOp::Mul => x.checked_mul(y).map(Value::Int).ok_or_else(overflow),
        BinaryOp::Div => {
            if y == 0 {
                return Err(unsupported("division by zero"));
            }
            #[allow(clippy::cast_precision_loss)]
            let quotient = x as f64 / y as f64;
            Ok(Value::Float(quotient))
        }
        BinaryOp::Mod => {
            if y == 0 {
                return Err(unsupported("modulo by zero"));
            }
            let r = x.checked_rem(y).ok_or_else(overflow)?;
            // The remainder takes the sign of the divisor.
            Ok(Value::Int(if r != 0 && (r < 0) != (y < 0) { r + y } else { r }))
        }
    }
}

fn float_arithmetic(op: BinaryOp, x: f64, y: f64) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => Ok(Value::Float(x + y)),
        BinaryOp::Sub => Ok(Value::Float(x - y)),
        BinaryOp::Mul => Ok(Value::Float(x * y)),
        BinaryOp::Div if y == 0.0 => Err(unsupported("division by zero")),
        BinaryOp::Div => Ok(Value::Float(x / y)),
        BinaryOp::Mod if y == 0.0 => Err(unsupported("modulo by zero")),
        BinaryOp::Mod => {
            let r = x % y;
            Ok(Value::Float(if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r + y
            } else {
                r
            }))
        }
    }
}

fn complex_arithmetic(op: BinaryOp, a: Complex, b: Complex) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => Ok(Value::Complex(a + b)),
        BinaryOp::Sub => Ok(Value::Complex(a - b)),
        BinaryOp::Mul => Ok(Value::Complex(a * b)),
        BinaryOp::Div if b == Complex::default() => Err(unsupported("division by zero")),
        BinaryOp::Div => Ok(Value::Complex(a / b)),
        BinaryOp::Mod => Err(unsupported("operator '%' is not defined for complex")),
    }
}

fn negate(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(i) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| unsupported(format!("integer overflow negating {i}"))),
        Value::Float(x) => Ok(Value::Float(-x)),
        Value::Complex(z) => Ok(Value::Complex(-*z)),
        other => Err(unsupported(format!("cannot negate {}", other.kind()))),
    }
}

// ============================================================================
// Comparisons
// ============================================================================

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    match op {
        CompareOp::Eq => Ok(equals(lhs, rhs)),
        CompareOp::Ne => Ok(!equals(lhs, rhs)),
        CompareOp::In => contains(rhs, lhs),
        CompareOp::NotIn => contains(rhs, lhs).map(|found| !found),
        CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => {
            let ordering = order(lhs, rhs).ok_or_else(|| {
                unsupported(format!(
                    "operator '{op}' is not defined for {lhs} ({}) and {rhs} ({})",
                    lhs.kind(),
                    rhs.kind()
                ))
            })?;
            Ok(match op {
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Le => ordering != Ordering::Greater,
                CompareOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
    }
}

/// Equality never fails: values of unrelated kinds are simply unequal.
fn equals(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(x, y))
        }
        _ => match (Num::of(lhs), Num::of(rhs)) {
            (Some(Num::Int(x)), Some(Num::Int(y))) => x == y,
            (Some(a @ Num::Complex(_)), Some(b)) | (Some(a), Some(b @ Num::Complex(_))) => {
                a.complex() == b.complex()
            }
            (Some(a), Some(b)) => a.real() == b.real(),
            _ => false,
        },
    }
}

fn order(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => {
            let a = Num::of(lhs)?.real()?;
            let b = Num::of(rhs)?.real()?;
            a.partial_cmp(&b)
        }
    }
}

fn contains(container: &Value, item: &Value) -> Result<bool, EvalError> {
    match (container, item) {
        (Value::List(items), _) => Ok(items.iter().any(|x| equals(x, item))),
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        _ => Err(unsupported(format!(
            "membership test is not defined for {} in {}",
            item.kind(),
            container.kind()
        ))),
    }
}

// ============================================================================
// Builtins and indexing
// ============================================================================

fn call(builtin: Builtin, arg: &Value) -> Result<Value, EvalError> {
    match (builtin, arg) {
        (Builtin::Len, Value::Str(s)) => length(s.chars().count()),
        (Builtin::Len, Value::List(items)) => length(items.len()),
        (Builtin::Abs, Value::Int(i)) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| unsupported(format!("integer overflow in abs({i})"))),
        (Builtin::Abs, Value::Float(x)) => Ok(Value::Float(x.abs())),
        (Builtin::Abs, Value::Complex(z)) => Ok(Value::Float(z.norm())),
        (Builtin::Len, other) => Err(unsupported(format!(
            "len() is not defined for {}",
            other.kind()
        ))),
        (Builtin::Abs, other) => Err(unsupported(format!(
            "abs() is not defined for {}",
            other.kind()
        ))),
    }
}

fn length(n: usize) -> Result<Value, EvalError> {
    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| unsupported("length does not fit in an integer"))
}

fn index_into(base: &Value, index: &Value) -> Result<Value, EvalError> {
    let (Value::List(items), Value::Int(i)) = (base, index) else {
        return Err(unsupported(format!(
            "cannot index {} with {}",
            base.kind(),
            index.kind()
        )));
    };

    // Negative indices count from the end.
    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let position = if *i < 0 { len + i } else { *i };
    usize::try_from(position)
        .ok()
        .and_then(|p| items.get(p))
        .cloned()
        .ok_or_else(|| unsupported(format!("list index {i} out of range")))
}
