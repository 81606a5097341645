//! Literal and parameter builders.

use crate::ast::{Expr, Value};

/// Create a literal expression from any convertible value
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// Create an integer literal expression
pub fn int(value: i64) -> Expr {
    Expr::Literal(Value::Int(value))
}

/// Create a float literal expression
pub fn float(value: f64) -> Expr {
    Expr::Literal(Value::Float(value))
}

/// Create a string literal expression
pub fn text(value: &str) -> Expr {
    Expr::Literal(Value::String(value.to_string()))
}

/// Create a boolean literal
pub fn boolean(value: bool) -> Expr {
    Expr::Literal(Value::Bool(value))
}

/// Create a null literal
pub fn null() -> Expr {
    Expr::Literal(Value::Null)
}

/// Create an enumeration literal, rendered by its symbolic name
pub fn symbol(name: &str) -> Expr {
    Expr::Literal(Value::Symbol(name.to_string()))
}

/// Bind a runtime value as a named parameter instead of inlining it.
///
/// The compiler registers the value with the parameter collector and
/// references it as `?name`; a duplicate preferred name gets a numeric
/// suffix (`name_2`, `name_3`, ...).
pub fn param(name: &str, value: impl Into<Value>) -> Expr {
    Expr::Param {
        name: name.to_string(),
        value: value.into(),
    }
}
