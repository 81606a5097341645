//! Scalar function builders.
//!
//! A thin layer over [`Expr::Call`]: every helper renders as the
//! corresponding uppercase ES|QL function. For a function without a
//! helper, use [`func`] directly.

use crate::ast::{Expr, TimeUnit, Value};

use super::{int, null, span, text};

/// Arbitrary function call: `NAME(arg, ...)`.
pub fn func(name: &str, args: impl IntoIterator<Item = impl Into<Expr>>) -> Expr {
    Expr::Call {
        name: name.to_string(),
        args: args.into_iter().map(Into::into).collect(),
    }
}

/// `CONCAT(a, b, ...)`
pub fn concat(args: impl IntoIterator<Item = impl Into<Expr>>) -> Expr {
    func("CONCAT", args)
}

/// `COALESCE(a, b, ...)`
pub fn coalesce(args: impl IntoIterator<Item = impl Into<Expr>>) -> Expr {
    func("COALESCE", args)
}

/// `MATCH(field, "query")` - full-text match
pub fn match_query(field: impl Into<Expr>, query: &str) -> Expr {
    func("MATCH", [field.into(), text(query)])
}

/// `CATEGORIZE(expr)` - pattern-based text grouping
pub fn categorize(expr: impl Into<Expr>) -> Expr {
    func("CATEGORIZE", [expr.into()])
}

/// `BUCKET(expr, buckets)` with a target bucket count
pub fn bucket(expr: impl Into<Expr>, buckets: i64) -> Expr {
    func("BUCKET", [expr.into(), int(buckets)])
}

/// `BUCKET(expr, span)` with a fixed time span per bucket
pub fn bucket_span(expr: impl Into<Expr>, amount: i64, unit: TimeUnit) -> Expr {
    func("BUCKET", [expr.into(), span(amount, unit)])
}

/// `DATE_TRUNC(span, expr)`
pub fn date_trunc(amount: i64, unit: TimeUnit, expr: impl Into<Expr>) -> Expr {
    func("DATE_TRUNC", [span(amount, unit), expr.into()])
}

/// `ROUND(expr)`
pub fn round(expr: impl Into<Expr>) -> Expr {
    func("ROUND", [expr.into()])
}

/// `ROUND(expr, decimals)`
pub fn round_to(expr: impl Into<Expr>, decimals: i64) -> Expr {
    func("ROUND", [expr.into(), int(decimals)])
}

/// `ABS(expr)`
pub fn abs(expr: impl Into<Expr>) -> Expr {
    func("ABS", [expr.into()])
}

/// `TO_LOWER(expr)`
pub fn lower(expr: impl Into<Expr>) -> Expr {
    func("TO_LOWER", [expr.into()])
}

/// `TO_UPPER(expr)`
pub fn upper(expr: impl Into<Expr>) -> Expr {
    func("TO_UPPER", [expr.into()])
}

/// `LENGTH(expr)`
pub fn length(expr: impl Into<Expr>) -> Expr {
    func("LENGTH", [expr.into()])
}

/// `STARTS_WITH(expr, "prefix")`
pub fn starts_with(expr: impl Into<Expr>, prefix: &str) -> Expr {
    func("STARTS_WITH", [expr.into(), text(prefix)])
}

/// `ENDS_WITH(expr, "suffix")`
pub fn ends_with(expr: impl Into<Expr>, suffix: &str) -> Expr {
    func("ENDS_WITH", [expr.into(), text(suffix)])
}

/// Start a `CASE` chain: `when(cond, value).when(..).otherwise(default)`.
///
/// ```ignore
/// let status = when(field("code").gte(lit(500)), text("error"))
///     .when(field("code").gte(lit(400)), text("warn"))
///     .otherwise(text("ok"));
/// ```
pub fn when(condition: impl Into<Expr>, then: impl Into<Expr>) -> CaseBuilder {
    CaseBuilder {
        branches: vec![(condition.into(), then.into())],
    }
}

/// Accumulates `CASE` branches; finished by [`CaseBuilder::otherwise`].
#[derive(Debug, Clone)]
pub struct CaseBuilder {
    branches: Vec<(Expr, Expr)>,
}

impl CaseBuilder {
    /// Add another condition/value branch.
    pub fn when(mut self, condition: impl Into<Expr>, then: impl Into<Expr>) -> Self {
        self.branches.push((condition.into(), then.into()));
        self
    }

    /// Close the chain with a default value.
    pub fn otherwise(self, otherwise: impl Into<Expr>) -> Expr {
        let mut expr = otherwise.into();
        for (condition, then) in self.branches.into_iter().rev() {
            expr = Expr::Conditional {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise: Box::new(expr),
            };
        }
        expr
    }

    /// Close the chain with a `null` default.
    pub fn build(self) -> Expr {
        self.otherwise(null())
    }
}

impl From<CaseBuilder> for Expr {
    fn from(builder: CaseBuilder) -> Self {
        builder.build()
    }
}

/// Fold a list of values into a literal array, e.g. for `IN` lists.
pub fn array(values: impl IntoIterator<Item = impl Into<Value>>) -> Expr {
    Expr::Literal(Value::Array(values.into_iter().map(Into::into).collect()))
}
