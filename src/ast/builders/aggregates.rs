//! Aggregate builders for stats projections.
//!
//! An aggregate expression is only valid inside `group_by`/`aggregate`;
//! anywhere else the compiler rejects it.

use crate::ast::{AggregateFunc, Expr};

use super::{float, int};

fn aggregate(func: AggregateFunc, args: Vec<Expr>) -> Expr {
    Expr::Aggregate { func, args }
}

/// `COUNT(*)` - count of all rows in the group
pub fn count() -> Expr {
    aggregate(AggregateFunc::Count, vec![])
}

/// `COUNT(expr)` - count of non-null values
pub fn count_of(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Count, vec![expr.into()])
}

/// `COUNT_DISTINCT(expr)`
pub fn count_distinct(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::CountDistinct, vec![expr.into()])
}

/// `SUM(expr)`
pub fn sum(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Sum, vec![expr.into()])
}

/// `AVG(expr)`
pub fn avg(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Avg, vec![expr.into()])
}

/// `MIN(expr)`
pub fn min(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Min, vec![expr.into()])
}

/// `MAX(expr)`
pub fn max(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Max, vec![expr.into()])
}

/// `MEDIAN(expr)`
pub fn median(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Median, vec![expr.into()])
}

/// `MEDIAN_ABSOLUTE_DEVIATION(expr)`
pub fn median_absolute_deviation(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::MedianAbsoluteDeviation, vec![expr.into()])
}

/// `PERCENTILE(expr, p)`
pub fn percentile(expr: impl Into<Expr>, p: f64) -> Expr {
    aggregate(
        AggregateFunc::Percentile,
        vec![expr.into(), float(p)],
    )
}

/// `STD_DEV(expr)`
pub fn std_dev(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::StdDev, vec![expr.into()])
}

/// `FIRST(expr)`
pub fn first(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::First, vec![expr.into()])
}

/// `LAST(expr)`
pub fn last(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Last, vec![expr.into()])
}

/// `SAMPLE(expr, limit)`
pub fn sample(expr: impl Into<Expr>, limit: i64) -> Expr {
    aggregate(
        AggregateFunc::Sample,
        vec![expr.into(), int(limit)],
    )
}

/// `VALUES(expr)` - all distinct values in the group
pub fn values(expr: impl Into<Expr>) -> Expr {
    aggregate(AggregateFunc::Values, vec![expr.into()])
}
