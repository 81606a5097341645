//! Ergonomic builder functions for ES|QL AST expressions.
//!
//! This module provides convenient helper functions to construct AST nodes
//! without the verbosity of creating structs directly.
//!
//! # Modules
//!
//! - `columns` - Member and field references
//! - `literals` - Literal values (text, int, float, boolean) and parameters
//! - `aggregates` - Aggregate functions (COUNT, SUM, AVG, etc.)
//! - `functions` - Scalar function calls (CONCAT, ROUND, CASE, etc.)
//! - `time` - Temporal helpers (NOW, ago, spans)
//!
//! # Example
//! ```ignore
//! use esql::prelude::*;
//!
//! let query = Esql::<Log>::from(&registry, "logs-*")?
//!     .filter(member("duration").gt(lit(5000)))?
//!     .filter(member("timestamp").gte(ago(15, TimeUnit::Minute)))?
//!     .select([("message", member("message")), ("took", member("duration"))])?
//!     .take(50)?;
//! ```

pub mod columns;
pub mod literals;
pub mod aggregates;
pub mod functions;
pub mod time;

// Re-export everything for convenient `use esql::ast::builders::*;`

// Columns
pub use columns::{member, field, keyword, subfield};

// Literals
pub use literals::{lit, int, float, text, boolean, null, symbol, param};

// Aggregates
pub use aggregates::{
    avg, count, count_distinct, count_of, first, last, max, median,
    median_absolute_deviation, min, percentile, sample, std_dev, sum, values,
};

// Functions
pub use functions::{
    abs, array, bucket, bucket_span, categorize, coalesce, concat, date_trunc, ends_with, func,
    length, lower, match_query, round, round_to, starts_with, upper, when, CaseBuilder,
};

// Time
pub use time::{now, ago, from_now, start_of_day, span};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AggregateFunc, BinaryOp, Expr, TimeUnit, Value};

    #[test]
    fn test_member_comparison() {
        let expr = member("duration").gt(lit(5000));
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Gt, .. }));
    }

    #[test]
    fn test_keyword_subfield() {
        let expr = keyword("level");
        assert!(matches!(expr, Expr::Member { subfield: Some(s), .. } if s == "keyword"));
    }

    #[test]
    fn test_count_star_has_no_args() {
        let expr = count();
        assert!(matches!(expr, Expr::Aggregate { func: AggregateFunc::Count, args } if args.is_empty()));
    }

    #[test]
    fn test_percentile_carries_fraction() {
        let expr = percentile(member("duration"), 95.0);
        let Expr::Aggregate { func, args } = expr else {
            panic!("expected aggregate");
        };
        assert_eq!(func, AggregateFunc::Percentile);
        assert_eq!(args.len(), 2);
        assert!(matches!(&args[1], Expr::Literal(Value::Float(p)) if *p == 95.0));
    }

    #[test]
    fn test_ago_negates_amount() {
        let expr = ago(15, TimeUnit::Minute);
        assert!(matches!(
            expr,
            Expr::NowOffset { amount: -15, unit: TimeUnit::Minute }
        ));
    }

    #[test]
    fn test_ago_saturates_at_minimum() {
        let expr = ago(i64::MIN, TimeUnit::Hour);
        assert!(matches!(expr, Expr::NowOffset { amount: i64::MAX, .. }));
    }

    #[test]
    fn test_case_chain_nests_right() {
        let expr = when(member("code").gte(lit(500)), text("error"))
            .when(member("code").gte(lit(400)), text("warn"))
            .otherwise(text("ok"));
        let Expr::Conditional { otherwise, .. } = expr else {
            panic!("expected conditional");
        };
        assert!(matches!(*otherwise, Expr::Conditional { .. }));
    }

    #[test]
    fn test_array_folds_values() {
        let expr = array(["a", "b"]);
        assert!(matches!(expr, Expr::Literal(Value::Array(items)) if items.len() == 2));
    }
}
