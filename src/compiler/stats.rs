//! Grouping lowering: keys and aggregate projections to one Stats command.

use crate::ast::{Command, Expr};
use crate::compiler::scalar::{lower, lower_aggregate, Scope};
use crate::error::{EsqlError, EsqlResult};
use crate::transpiler::value::quote_field;

/// Lower grouping keys and aggregate assignments. Zero keys is valid and
/// yields a Stats command without a `BY` clause; zero aggregates is not.
/// A key whose rendered expression already equals its output name is kept
/// bare rather than self-assigned.
pub(crate) fn compile_stats(
    keys: Vec<(String, Expr)>,
    aggregates: Vec<(String, Expr)>,
    scope: &mut Scope<'_>,
) -> EsqlResult<(Command, Vec<String>)> {
    if aggregates.is_empty() {
        return Err(EsqlError::invalid(
            "stats requires at least one aggregation",
        ));
    }

    let mut introduced = Vec::with_capacity(aggregates.len() + keys.len());
    let mut assignments = Vec::with_capacity(aggregates.len());
    for (name, expr) in aggregates {
        let rendered = lower_aggregate(&expr, scope)?;
        assignments.push((quote_field(&name), rendered));
        introduced.push(name);
    }

    let mut by = Vec::with_capacity(keys.len());
    for (name, expr) in keys {
        let alias = quote_field(&name);
        let rendered = lower(&expr, scope)?;
        if rendered == alias {
            by.push((None, rendered));
        } else {
            by.push((Some(alias), rendered));
        }
        introduced.push(name);
    }

    Ok((
        Command::Stats {
            aggregates: assignments,
            by,
        },
        introduced,
    ))
}
