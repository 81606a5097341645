//! Field reference builders.

use crate::ast::Expr;

/// Reference a member of the queried element type.
///
/// Resolved through the field registry at compile time; an unmapped member
/// fails the builder call with `FieldNotFound`.
pub fn member(name: &str) -> Expr {
    Expr::Member {
        name: name.to_string(),
        subfield: None,
    }
}

/// Reference a field by its physical name, bypassing member resolution.
///
/// The naming policy still applies, one dotted segment at a time.
pub fn field(name: &str) -> Expr {
    Expr::Field {
        name: name.to_string(),
        subfield: None,
    }
}

/// Reference the exact-match `keyword` sub-field of a member.
///
/// # Example
/// ```ignore
/// keyword("level")  // resolves to e.g. log.level.keyword
/// ```
pub fn keyword(name: &str) -> Expr {
    Expr::Member {
        name: name.to_string(),
        subfield: Some("keyword".to_string()),
    }
}

/// Reference an arbitrary sub-field of a member.
pub fn subfield(name: &str, sub: &str) -> Expr {
    Expr::Member {
        name: name.to_string(),
        subfield: Some(sub.to_string()),
    }
}
