//! Scalar expression lowering: [`Expr`] graphs to condition/expression text.
//!
//! Lowering resolves field references, folds relative-time expressions,
//! binds parameters, and parenthesizes exactly where the rendered text
//! would otherwise change meaning or obscure the author's grouping.

use std::any::TypeId;
use std::collections::HashSet;

use crate::ast::{AggregateFunc, BinaryOp, Expr, UnaryOp, Value};
use crate::error::{EsqlError, EsqlResult};
use crate::params::ParamCollector;
use crate::schema::FieldRegistry;
use crate::transpiler::value::{format_span, format_value, quote_field};

/// Resolution context for one builder operation.
///
/// Aliases introduced by earlier pipeline stages shadow the registry:
/// a member that matches an alias refers to the computed column, not to
/// the original field of the element type.
pub(crate) struct Scope<'a> {
    pub registry: &'a FieldRegistry,
    pub element: TypeId,
    pub element_name: &'static str,
    pub aliases: &'a HashSet<String>,
    pub params: &'a mut ParamCollector,
}

impl Scope<'_> {
    fn resolve_member(&self, name: &str, subfield: Option<&str>) -> EsqlResult<String> {
        let candidate = self.registry.resolve_anonymous(name);
        let resolved = if self.aliases.contains(&candidate) {
            candidate
        } else {
            self.registry
                .resolve_by_id(self.element, self.element_name, name)?
        };
        Ok(quote_field(&with_subfield(resolved, subfield)))
    }

    fn resolve_field(&self, name: &str, subfield: Option<&str>) -> String {
        let resolved = self.registry.resolve_anonymous(name);
        quote_field(&with_subfield(resolved, subfield))
    }
}

fn with_subfield(field: String, subfield: Option<&str>) -> String {
    match subfield {
        Some(sub) => format!("{}.{}", field, sub),
        None => field,
    }
}

/// Render an expression graph to ES|QL text.
pub(crate) fn lower(expr: &Expr, scope: &mut Scope<'_>) -> EsqlResult<String> {
    match expr {
        Expr::Member { name, subfield } => scope.resolve_member(name, subfield.as_deref()),
        Expr::Field { name, subfield } => Ok(scope.resolve_field(name, subfield.as_deref())),
        Expr::Literal(value) => Ok(format_value(value)),
        Expr::Param { name, value } => {
            let unique = scope.params.add(name, value.clone())?;
            Ok(format!("?{}", unique))
        }
        Expr::Now => Ok("NOW()".to_string()),
        Expr::NowOffset { amount, unit } => Ok(match *amount {
            0 => "NOW()".to_string(),
            n if n < 0 => format!("NOW() - {}", format_span(n.saturating_neg(), *unit)),
            n => format!("NOW() + {}", format_span(n, *unit)),
        }),
        Expr::StartOfDay => Ok("DATE_TRUNC(1 day, NOW())".to_string()),
        Expr::Binary {
            left,
            op: BinaryOp::In,
            right,
        } => lower_in(left, right, scope),
        Expr::Binary { left, op, right } => {
            let l = lower_operand(left, *op, false, scope)?;
            let r = lower_operand(right, *op, true, scope)?;
            Ok(format!("{} {} {}", l, op.symbol(), r))
        }
        Expr::Unary { op, operand } => lower_unary(*op, operand, scope),
        Expr::Call { name, args } => {
            let rendered = lower_args(args, scope)?;
            Ok(format!("{}({})", name, rendered.join(", ")))
        }
        Expr::Aggregate { func, .. } => Err(EsqlError::unsupported(format!(
            "{} is an aggregate and only valid inside a stats projection",
            func
        ))),
        Expr::Conditional { .. } => lower_conditional(expr, scope),
        Expr::Record(_) => Err(EsqlError::unsupported(
            "record construction is only valid as a projection target",
        )),
    }
}

/// Wrap a binary child in parentheses when precedence demands it, or when
/// AND and OR mix at the same nesting level. Same-operator logical chains
/// and flat-chaining arithmetic stay unparenthesized.
fn lower_operand(
    expr: &Expr,
    parent: BinaryOp,
    is_right: bool,
    scope: &mut Scope<'_>,
) -> EsqlResult<String> {
    let rendered = lower(expr, scope)?;
    let Expr::Binary { op, .. } = expr else {
        return Ok(rendered);
    };
    let child = *op;
    let wrap = if parent.is_logical() && child.is_logical() {
        parent != child
    } else if child.precedence() < parent.precedence() {
        true
    } else if is_right && child.precedence() == parent.precedence() {
        !parent.chains_flat()
    } else {
        false
    };
    if wrap {
        Ok(format!("({})", rendered))
    } else {
        Ok(rendered)
    }
}

fn lower_in(left: &Expr, right: &Expr, scope: &mut Scope<'_>) -> EsqlResult<String> {
    let Expr::Literal(Value::Array(items)) = right else {
        return Err(EsqlError::unsupported(
            "IN requires a literal list on the right-hand side",
        ));
    };
    let l = lower_operand(left, BinaryOp::In, false, scope)?;
    let rendered: Vec<String> = items.iter().map(format_value).collect();
    Ok(format!("{} IN ({})", l, rendered.join(", ")))
}

fn lower_unary(op: UnaryOp, operand: &Expr, scope: &mut Scope<'_>) -> EsqlResult<String> {
    let rendered = lower(operand, scope)?;
    let wrapped = if matches!(operand, Expr::Binary { .. }) {
        format!("({})", rendered)
    } else {
        rendered
    };
    Ok(match op {
        UnaryOp::Not => format!("NOT {}", wrapped),
        UnaryOp::Neg => format!("-{}", wrapped),
        UnaryOp::IsNull | UnaryOp::IsNotNull => format!("{} {}", wrapped, op.symbol()),
    })
}

/// Nested conditionals flatten into one variadic `CASE` call:
/// `CASE(c1, v1, c2, v2, ..., default)`.
fn lower_conditional(expr: &Expr, scope: &mut Scope<'_>) -> EsqlResult<String> {
    let mut parts = Vec::new();
    let mut current = expr;
    while let Expr::Conditional {
        condition,
        then,
        otherwise,
    } = current
    {
        parts.push(lower(condition, scope)?);
        parts.push(lower(then, scope)?);
        current = otherwise;
    }
    parts.push(lower(current, scope)?);
    Ok(format!("CASE({})", parts.join(", ")))
}

fn lower_args(args: &[Expr], scope: &mut Scope<'_>) -> EsqlResult<Vec<String>> {
    args.iter().map(|arg| lower(arg, scope)).collect()
}

/// Render one aggregate assignment for a stats projection. Argument-less
/// `COUNT` renders as `COUNT(*)`.
pub(crate) fn lower_aggregate(expr: &Expr, scope: &mut Scope<'_>) -> EsqlResult<String> {
    let Expr::Aggregate { func, args } = expr else {
        return Err(EsqlError::unsupported(
            "stats projections accept aggregate calls only",
        ));
    };
    if args.is_empty() {
        return match func {
            AggregateFunc::Count => Ok("COUNT(*)".to_string()),
            other => Err(EsqlError::invalid(format!(
                "{} requires at least one argument",
                other
            ))),
        };
    }
    let rendered = lower_args(args, scope)?;
    Ok(format!("{}({})", func, rendered.join(", ")))
}
