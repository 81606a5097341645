//! Wire-text generation: command IR to ES|QL source.
//!
//! The generator is pure concatenation over strings the compiler already
//! rendered and validated. It never inspects, re-quotes, or reorders its
//! input, so rendering the same IR twice yields byte-identical text.

pub mod value;

use crate::ast::{Command, Query};

/// Render to ES|QL source text.
pub trait ToEsql {
    fn to_esql(&self) -> String;
}

impl ToEsql for Query {
    /// Commands joined by a newline and pipe; the first command carries
    /// no pipe prefix.
    fn to_esql(&self) -> String {
        self.commands
            .iter()
            .map(Command::to_esql)
            .collect::<Vec<_>>()
            .join("\n| ")
    }
}

impl ToEsql for Command {
    fn to_esql(&self) -> String {
        match self {
            Command::Source { pattern } => format!("FROM {}", pattern),
            Command::Row { assignments } => {
                format!("ROW {}", join_assignments(assignments))
            }
            Command::Filter { condition } => format!("WHERE {}", condition),
            Command::Eval { assignments } => {
                format!("EVAL {}", join_assignments(assignments))
            }
            Command::Stats { aggregates, by } => {
                let mut out = format!("STATS {}", join_assignments(aggregates));
                if !by.is_empty() {
                    let keys: Vec<String> = by
                        .iter()
                        .map(|(alias, expr)| match alias {
                            Some(alias) => format!("{} = {}", alias, expr),
                            None => expr.clone(),
                        })
                        .collect();
                    out.push_str(" BY ");
                    out.push_str(&keys.join(", "));
                }
                out
            }
            Command::Sort { fields } => {
                let keys: Vec<String> = fields
                    .iter()
                    .map(|(field, descending)| {
                        if *descending {
                            format!("{} DESC", field)
                        } else {
                            field.clone()
                        }
                    })
                    .collect();
                format!("SORT {}", keys.join(", "))
            }
            Command::Limit { count } => format!("LIMIT {}", count),
            Command::Keep { fields } => format!("KEEP {}", fields.join(", ")),
            Command::Drop { fields } => format!("DROP {}", fields.join(", ")),
            Command::Rename { pairs } => {
                let renames: Vec<String> = pairs
                    .iter()
                    .map(|(old, new)| format!("{} AS {}", old, new))
                    .collect();
                format!("RENAME {}", renames.join(", "))
            }
            Command::LookupJoin { source, condition } => {
                format!("LOOKUP JOIN {} ON {}", source, condition)
            }
            Command::Completion {
                prompt,
                inference_id,
                column,
            } => {
                let target = match column {
                    Some(column) => format!("{} = ", column),
                    None => String::new(),
                };
                format!(
                    "COMPLETION {}{} WITH {{ \"inference_id\" : \"{}\" }}",
                    target, prompt, inference_id
                )
            }
        }
    }
}

fn join_assignments(assignments: &[(String, String)]) -> String {
    assignments
        .iter()
        .map(|(name, expr)| format!("{} = {}", name, expr))
        .collect::<Vec<_>>()
        .join(", ")
}
