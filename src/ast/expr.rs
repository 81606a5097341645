use crate::ast::{AggregateFunc, BinaryOp, TimeUnit, UnaryOp, Value};
use serde::{Deserialize, Serialize};

/// A captured query expression.
///
/// Expressions are data, never executable code: the compiler inspects their
/// structure and renders text, it does not evaluate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Member access on the queried element type, resolved through the
    /// field registry.
    Member {
        name: String,
        /// Multi-field suffix (e.g. the exact-match `keyword` variant).
        subfield: Option<String>,
    },
    /// A field referenced by name, bypassing member resolution. The naming
    /// policy still applies, segment by segment.
    Field {
        name: String,
        subfield: Option<String>,
    },
    /// Inline literal.
    Literal(Value),
    /// Named bind parameter, registered with the collector at compile time
    /// and referenced as `?name`.
    Param { name: String, value: Value },
    /// Current instant, folded to `NOW()`.
    Now,
    /// Current instant shifted by a fixed span, folded to `NOW() +/- n unit`.
    NowOffset { amount: i64, unit: TimeUnit },
    /// Midnight of the current day, folded to `DATE_TRUNC(1 day, NOW())`.
    StartOfDay,
    /// Binary expression (left op right).
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Unary expression, prefix or postfix depending on the operator.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Scalar function call.
    Call { name: String, args: Vec<Expr> },
    /// Aggregate call. Only valid inside a stats projection.
    Aggregate {
        func: AggregateFunc,
        args: Vec<Expr>,
    },
    /// Ternary conditional, rendered as `CASE(condition, then, otherwise)`.
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Anonymous record construction, consumed by projections.
    Record(Vec<(String, Expr)>),
}

impl Expr {
    fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    /// `self == other`
    pub fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Eq, other)
    }

    /// `self != other`
    pub fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Ne, other)
    }

    /// `self > other`
    pub fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Gt, other)
    }

    /// `self >= other`
    pub fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Gte, other)
    }

    /// `self < other`
    pub fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Lt, other)
    }

    /// `self <= other`
    pub fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Lte, other)
    }

    /// Logical conjunction. Mixed AND/OR groups are parenthesized when
    /// rendered.
    pub fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::And, other)
    }

    /// Logical disjunction.
    pub fn or(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Or, other)
    }

    pub fn add(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Add, other)
    }

    pub fn sub(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Sub, other)
    }

    pub fn mul(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Mul, other)
    }

    pub fn div(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Div, other)
    }

    pub fn rem(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Rem, other)
    }

    /// Wildcard pattern match: `self LIKE "pattern"`
    pub fn like(self, pattern: &str) -> Expr {
        self.binary(BinaryOp::Like, Expr::Literal(Value::String(pattern.to_string())))
    }

    /// Regex pattern match: `self RLIKE "pattern"`
    pub fn rlike(self, pattern: &str) -> Expr {
        self.binary(BinaryOp::RLike, Expr::Literal(Value::String(pattern.to_string())))
    }

    /// Membership test: `self IN (v1, v2, ...)`
    pub fn in_list<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        let items = values.into_iter().map(Into::into).collect();
        self.binary(BinaryOp::In, Expr::Literal(Value::Array(items)))
    }

    /// Logical negation. Compound operands are parenthesized when rendered.
    pub fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    /// Arithmetic negation.
    pub fn neg(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(self),
        }
    }

    /// `self IS NULL`
    pub fn is_null(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::IsNull,
            operand: Box::new(self),
        }
    }

    /// `self IS NOT NULL`
    pub fn is_not_null(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::IsNotNull,
            operand: Box::new(self),
        }
    }

    /// Whether this expression is a bare field reference (member or
    /// anonymous field, with or without a sub-field suffix).
    pub fn is_field_ref(&self) -> bool {
        matches!(self, Expr::Member { .. } | Expr::Field { .. })
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_builds_binary() {
        let expr = Expr::Member {
            name: "duration".to_string(),
            subfield: None,
        }
        .gt(Expr::Literal(Value::Int(5000)));
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Gt, .. }));
    }

    #[test]
    fn test_in_list_collects_literals() {
        let expr = Expr::Field {
            name: "level".to_string(),
            subfield: None,
        }
        .in_list(["info", "warn"]);
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::In);
        assert!(matches!(*right, Expr::Literal(Value::Array(ref items)) if items.len() == 2));
    }

    #[test]
    fn test_not_wraps_operand() {
        let expr = Expr::Literal(Value::Bool(true)).not();
        assert!(matches!(expr, Expr::Unary { op: UnaryOp::Not, .. }));
    }
}
