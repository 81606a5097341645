//! Literal formatting: [`Value`] to ES|QL source text.
//!
//! Formatting is total and deterministic. Anything that cannot be
//! expressed as an ES|QL literal (non-finite floats) degrades to `null`
//! rather than producing invalid query text.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::ast::{TimeUnit, Value};

/// Render a value as an ES|QL literal.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::Float(_) => "null".to_string(),
        Value::String(s) => quote_string(s),
        Value::DateTime(dt) => quote_string(&iso_instant(dt)),
        Value::Date(d) => quote_string(&iso_date(d)),
        Value::Time(t) => quote_string(&iso_time(t)),
        Value::Uuid(u) => quote_string(&u.to_string()),
        Value::Symbol(s) => quote_string(s),
        Value::Span { amount, unit } => format_span(*amount, *unit),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", rendered.join(", "))
        }
    }
}

/// Double-quote a string, escaping backslash, quote, newline, and tab.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

pub(crate) fn iso_instant(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(crate) fn iso_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn iso_time(t: &NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

/// Span text, singular unit iff the magnitude is exactly one.
pub(crate) fn format_span(amount: i64, unit: TimeUnit) -> String {
    if amount.unsigned_abs() == 1 {
        format!("{} {}", amount, unit.singular())
    } else {
        format!("{} {}", amount, unit)
    }
}

/// Quote a dotted field path, backticking each segment that needs it.
pub(crate) fn quote_field(path: &str) -> String {
    path.split('.')
        .map(quote_segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_segment(segment: &str) -> String {
    let plain = !segment.is_empty()
        && !segment.starts_with(|c: char| c.is_ascii_digit())
        && segment
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '@');
    if plain {
        segment.to_string()
    } else {
        format!("`{}`", segment.replace('`', "``"))
    }
}
