use crate::params::ParamCollector;
use serde::{Deserialize, Serialize};

/// One pipeline stage of a compiled query.
///
/// Every field holds rendered text. Resolution, formatting and validation
/// all happen in the compiler; a command is pure output shape, so rendering
/// a well-formed command never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// `FROM <pattern>` - pattern is non-empty.
    Source { pattern: String },
    /// `ROW <name> = <literal>, ...` - at least one assignment.
    Row { assignments: Vec<(String, String)> },
    /// `WHERE <condition>` - a single fully rendered boolean condition.
    Filter { condition: String },
    /// `EVAL <name> = <expr>, ...` - order preserved.
    Eval { assignments: Vec<(String, String)> },
    /// `STATS <name> = <agg>(...) [BY <keys>]` - aggregations non-empty.
    /// A grouping key with no alias renders as the bare expression.
    Stats {
        aggregates: Vec<(String, String)>,
        by: Vec<(Option<String>, String)>,
    },
    /// `SORT <field> [DESC], ...` - at least one field.
    Sort { fields: Vec<(String, bool)> },
    /// `LIMIT <n>`
    Limit { count: u64 },
    /// `KEEP <field>, ...` - order preserved.
    Keep { fields: Vec<String> },
    /// `DROP <field>, ...` - order preserved.
    Drop { fields: Vec<String> },
    /// `RENAME <old> AS <new>, ...`
    Rename { pairs: Vec<(String, String)> },
    /// `LOOKUP JOIN <source> ON <condition>` - both non-empty.
    LookupJoin { source: String, condition: String },
    /// `COMPLETION [<column> =] <prompt> WITH { "inference_id" : "<id>" }`
    Completion {
        prompt: String,
        inference_id: String,
        column: Option<String>,
    },
}

/// An ordered command pipeline plus its bound parameters.
///
/// Built sequentially on one logical thread under exclusive ownership, then
/// immutable once rendered; the rendered text and the query itself are safe
/// to share and cache after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Commands in builder-call order. The first is always Source or Row.
    pub commands: Vec<Command>,
    /// Rust type name of the element the pipeline started from.
    pub element: String,
    pub params: ParamCollector,
}

impl Query {
    /// Render the pipeline to wire-format query text.
    ///
    /// Rendering is deterministic: identical pipelines produce byte-identical
    /// output.
    pub fn render(&self) -> String {
        let text = crate::transpiler::ToEsql::to_esql(self);
        tracing::debug!("rendered {} commands: {} bytes", self.commands.len(), text.len());
        text
    }
}
