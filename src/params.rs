//! Named wire parameters collected during compilation.
//!
//! Every [`Expr::Param`](crate::ast::Expr::Param) the compiler lowers lands
//! here. Names are deduplicated with a numeric suffix (`p`, `p_2`, `p_3`)
//! and rendered into the query text as `?name`; the values travel
//! out-of-band in the request body via [`ParamCollector::to_wire`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::error::{EsqlError, EsqlResult};
use crate::transpiler::value::{format_span, iso_date, iso_instant, iso_time};

/// Ordered collection of named parameter bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamCollector {
    entries: Vec<(String, Value)>,
    counts: HashMap<String, usize>,
}

impl ParamCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding under `preferred`, suffixing on collision.
    ///
    /// Returns the unique name actually assigned. Fails if the suffixed
    /// name was itself already taken by an explicit binding.
    pub fn add(&mut self, preferred: &str, value: Value) -> EsqlResult<String> {
        let count = {
            let entry = self.counts.entry(preferred.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        let name = if count == 1 {
            preferred.to_string()
        } else {
            format!("{}_{}", preferred, count)
        };
        if self.entries.iter().any(|(n, _)| n == &name) {
            return Err(EsqlError::AmbiguousParameterName(name));
        }
        tracing::trace!("bound parameter {}: {}", name, value);
        self.entries.push((name.clone(), value));
        Ok(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in insertion order.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// JSON array of single-entry objects, the shape the `params` key
    /// of a query request expects.
    pub fn to_wire(&self) -> serde_json::Value {
        let params = self
            .entries
            .iter()
            .map(|(name, value)| {
                let mut entry = serde_json::Map::with_capacity(1);
                entry.insert(name.clone(), wire_value(value));
                serde_json::Value::Object(entry)
            })
            .collect();
        serde_json::Value::Array(params)
    }
}

fn wire_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) if f.is_finite() => serde_json::Value::from(*f),
        Value::Float(_) => serde_json::Value::Null,
        Value::String(s) => serde_json::Value::from(s.as_str()),
        Value::DateTime(dt) => serde_json::Value::from(iso_instant(dt)),
        Value::Date(d) => serde_json::Value::from(iso_date(d)),
        Value::Time(t) => serde_json::Value::from(iso_time(t)),
        Value::Uuid(u) => serde_json::Value::from(u.to_string()),
        Value::Symbol(s) => serde_json::Value::from(s.as_str()),
        Value::Span { amount, unit } => serde_json::Value::from(format_span(*amount, *unit)),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(wire_value).collect()),
    }
}
