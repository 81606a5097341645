//! Temporal builders: relative instants and span literals.
//!
//! Relative instants stay symbolic in the AST so the compiler can fold
//! them into `NOW()` arithmetic at render time.

use crate::ast::{Expr, TimeUnit, Value};

/// The current instant: `NOW()`.
pub fn now() -> Expr {
    Expr::Now
}

/// An instant in the past: `NOW() - amount unit`.
pub fn ago(amount: i64, unit: TimeUnit) -> Expr {
    Expr::NowOffset {
        amount: amount.saturating_neg(),
        unit,
    }
}

/// An instant in the future: `NOW() + amount unit`.
pub fn from_now(amount: i64, unit: TimeUnit) -> Expr {
    Expr::NowOffset { amount, unit }
}

/// Midnight of the current day: `DATE_TRUNC(1 day, NOW())`.
pub fn start_of_day() -> Expr {
    Expr::StartOfDay
}

/// A span literal, e.g. `5 minutes` or `1 day`.
pub fn span(amount: i64, unit: TimeUnit) -> Expr {
    Expr::Literal(Value::Span { amount, unit })
}
