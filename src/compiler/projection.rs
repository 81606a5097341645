//! Projection lowering: anonymous records to Keep/Eval commands.
//!
//! A selected member whose output name equals its resolved field is a
//! pass-through and lands in one Keep command. Everything else (computed
//! expressions, renamed pass-throughs) becomes an Eval assignment. Keep
//! precedes Eval in the emitted pipeline.

use crate::ast::{Command, Expr};
use crate::compiler::scalar::{lower, Scope};
use crate::error::{EsqlError, EsqlResult};
use crate::transpiler::value::quote_field;

/// Lower an anonymous-record construction. The record's field names are
/// already policy-applied and unquoted; returns the commands to append
/// plus the column names the projection introduces. Any other expression
/// shape is not a projection.
pub(crate) fn compile_projection(
    projection: Expr,
    scope: &mut Scope<'_>,
) -> EsqlResult<(Vec<Command>, Vec<String>)> {
    let Expr::Record(outputs) = projection else {
        return Err(EsqlError::unsupported(
            "projection requires an anonymous record of named outputs",
        ));
    };
    let mut keep_fields = Vec::new();
    let mut eval_assignments = Vec::new();
    let mut introduced = Vec::with_capacity(outputs.len());

    for (output, expr) in outputs {
        let target = quote_field(&output);
        let rendered = lower(&expr, scope)?;
        if expr.is_field_ref() && rendered == target {
            keep_fields.push(target);
        } else {
            eval_assignments.push((target, rendered));
        }
        introduced.push(output);
    }

    if keep_fields.is_empty() && eval_assignments.is_empty() {
        return Err(EsqlError::invalid("projection selects no fields"));
    }

    let mut commands = Vec::new();
    if !keep_fields.is_empty() {
        commands.push(Command::Keep {
            fields: keep_fields,
        });
    }
    if !eval_assignments.is_empty() {
        commands.push(Command::Eval {
            assignments: eval_assignments,
        });
    }
    Ok((commands, introduced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::params::ParamCollector;
    use crate::schema::{FieldRegistry, NamingPolicy, TypeMapping};
    use crate::transpiler::ToEsql;
    use std::any::TypeId;
    use std::collections::HashSet;

    struct Log;

    fn compile(projection: Expr) -> EsqlResult<(Vec<Command>, Vec<String>)> {
        let mut registry = FieldRegistry::new(NamingPolicy::Preserve);
        registry.register::<Log>(
            TypeMapping::new()
                .member("message")
                .member("duration")
                .member_as("timestamp", "@timestamp"),
        );
        let aliases = HashSet::new();
        let mut params = ParamCollector::new();
        let mut scope = Scope {
            registry: &registry,
            element: TypeId::of::<Log>(),
            element_name: "Log",
            aliases: &aliases,
            params: &mut params,
        };
        compile_projection(projection, &mut scope)
    }

    #[test]
    fn test_pass_through_members_emit_keep_only() {
        let (commands, introduced) = compile(Expr::Record(vec![
            ("message".to_string(), member("message")),
            ("duration".to_string(), member("duration")),
        ]))
        .unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].to_esql(), "KEEP message, duration");
        assert_eq!(introduced, vec!["message", "duration"]);
    }

    #[test]
    fn test_renamed_member_emits_eval() {
        let (commands, _) = compile(Expr::Record(vec![(
            "timestamp".to_string(),
            member("timestamp"),
        )]))
        .unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].to_esql(), "EVAL timestamp = @timestamp");
    }

    #[test]
    fn test_keep_precedes_eval() {
        let (commands, _) = compile(Expr::Record(vec![
            ("message".to_string(), member("message")),
            ("took".to_string(), member("duration").div(lit(1000))),
        ]))
        .unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].to_esql(), "KEEP message");
        assert_eq!(commands[1].to_esql(), "EVAL took = duration / 1000");
    }

    #[test]
    fn test_empty_record_is_invalid() {
        let err = compile(Expr::Record(vec![])).unwrap_err();
        assert!(matches!(err, EsqlError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_record_projection_rejected() {
        let err = compile(member("message")).unwrap_err();
        assert!(matches!(err, EsqlError::UnsupportedOperation(_)));
    }
}
