//! Field registry: maps typed members to index field names.
//!
//! Queries are built against marker types; the registry records, per type,
//! which index field each member resolves to. Resolution happens while the
//! pipeline is assembled, so a typo surfaces as [`EsqlError::FieldNotFound`]
//! with a suggestion instead of a runtime search failure.

use std::any::TypeId;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::error::{EsqlError, EsqlResult};

/// How member names are rewritten into field names when no explicit
/// mapping overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingPolicy {
    /// Use the member name as written.
    #[default]
    Preserve,
    /// `requestCount` becomes `request_count`.
    SnakeCase,
    /// `request_count` becomes `requestCount`.
    CamelCase,
    /// `RequestCount` becomes `requestcount`.
    LowerCase,
}

impl NamingPolicy {
    /// Apply the policy to each dotted segment of `name` independently.
    pub fn apply(&self, name: &str) -> String {
        name.split('.')
            .map(|segment| self.apply_segment(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn apply_segment(&self, segment: &str) -> String {
        match self {
            NamingPolicy::Preserve => segment.to_string(),
            NamingPolicy::SnakeCase => to_snake(segment),
            NamingPolicy::CamelCase => to_camel(segment),
            NamingPolicy::LowerCase => segment.to_lowercase(),
        }
    }
}

fn to_snake(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    let mut prev_lower = false;
    for ch in segment.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

fn to_camel(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for (i, ch) in segment.chars().enumerate() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else if i == 0 {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Declares the queryable members of one marker type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMapping {
    members: Vec<MemberDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MemberDef {
    name: String,
    #[serde(default)]
    field: Option<String>,
}

impl TypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// A member whose field name follows the registry's naming policy.
    pub fn member(mut self, name: &str) -> Self {
        self.members.push(MemberDef {
            name: name.to_string(),
            field: None,
        });
        self
    }

    /// A member pinned to an explicit field name, bypassing the policy.
    pub fn member_as(mut self, name: &str, field: &str) -> Self {
        self.members.push(MemberDef {
            name: name.to_string(),
            field: Some(field.to_string()),
        });
        self
    }
}

#[derive(Debug)]
struct TypeEntry {
    type_name: &'static str,
    fields: Vec<(String, String)>,
}

/// Member-to-field resolution for every registered marker type.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    policy: NamingPolicy,
    types: HashMap<TypeId, TypeEntry>,
}

impl FieldRegistry {
    pub fn new(policy: NamingPolicy) -> Self {
        Self {
            policy,
            types: HashMap::new(),
        }
    }

    pub fn policy(&self) -> NamingPolicy {
        self.policy
    }

    /// Register the members of `T`, applying the naming policy to any
    /// member without an explicit field override.
    pub fn register<T: 'static>(&mut self, mapping: TypeMapping) -> &mut Self {
        let fields: Vec<(String, String)> = mapping
            .members
            .into_iter()
            .map(|m| {
                let field = m.field.unwrap_or_else(|| self.policy.apply(&m.name));
                (m.name, field)
            })
            .collect();
        let type_name = std::any::type_name::<T>();
        tracing::debug!("registered {} with {} members", type_name, fields.len());
        self.types.insert(
            TypeId::of::<T>(),
            TypeEntry { type_name, fields },
        );
        self
    }

    /// Resolve `member` on `T` to its field name.
    pub fn resolve<T: 'static>(&self, member: &str) -> EsqlResult<String> {
        self.resolve_by_id(TypeId::of::<T>(), std::any::type_name::<T>(), member)
    }

    pub(crate) fn resolve_by_id(
        &self,
        id: TypeId,
        type_name: &'static str,
        member: &str,
    ) -> EsqlResult<String> {
        let Some(entry) = self.types.get(&id) else {
            return Err(EsqlError::FieldNotFound {
                type_name,
                member: member.to_string(),
                suggestion: None,
            });
        };
        if let Some((_, field)) = entry.fields.iter().find(|(name, _)| name == member) {
            return Ok(field.clone());
        }
        let names: Vec<&str> = entry.fields.iter().map(|(name, _)| name.as_str()).collect();
        Err(EsqlError::FieldNotFound {
            type_name: entry.type_name,
            member: member.to_string(),
            suggestion: did_you_mean(member, &names),
        })
    }

    /// Field name for an alias or ad-hoc column, policy applied, no lookup.
    pub fn resolve_anonymous(&self, name: &str) -> String {
        self.policy.apply(name)
    }

    /// Registered members of `T` in declaration order, if known.
    pub fn members_of<T: 'static>(&self) -> Option<&[(String, String)]> {
        self.types
            .get(&TypeId::of::<T>())
            .map(|entry| entry.fields.as_slice())
    }
}

/// Find the best match with Levenshtein distance within threshold.
fn did_you_mean(input: &str, candidates: &[impl AsRef<str>]) -> Option<String> {
    let mut best_match = None;
    let mut min_dist = usize::MAX;

    for cand in candidates {
        let cand_str = cand.as_ref();
        let dist = levenshtein(input, cand_str);

        // Dynamic threshold based on length
        let threshold = match input.len() {
            0..=2 => 0, // Precise match only for very short strings
            3..=5 => 2, // Allow 2 char diff (e.g. durtion -> duration)
            _ => 3,     // Allow 3 char diff for longer strings
        };

        if dist <= threshold && dist < min_dist {
            min_dist = dist;
            best_match = Some(cand_str.to_string());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Log;
    struct User;

    #[test]
    fn test_snake_case_policy() {
        let policy = NamingPolicy::SnakeCase;
        assert_eq!(policy.apply("requestCount"), "request_count");
        assert_eq!(policy.apply("HTTPStatus"), "httpstatus");
        assert_eq!(policy.apply("log.levelName"), "log.level_name");
    }

    #[test]
    fn test_camel_case_policy() {
        let policy = NamingPolicy::CamelCase;
        assert_eq!(policy.apply("request_count"), "requestCount");
        assert_eq!(policy.apply("log.level_name"), "log.levelName");
    }

    #[test]
    fn test_preserve_policy_is_identity() {
        let policy = NamingPolicy::Preserve;
        assert_eq!(policy.apply("@timestamp"), "@timestamp");
        assert_eq!(policy.apply("log.level"), "log.level");
    }

    #[test]
    fn test_resolve_registered_member() {
        let mut registry = FieldRegistry::new(NamingPolicy::Preserve);
        registry.register::<Log>(
            TypeMapping::new()
                .member("message")
                .member_as("timestamp", "@timestamp"),
        );
        assert_eq!(registry.resolve::<Log>("message").unwrap(), "message");
        assert_eq!(registry.resolve::<Log>("timestamp").unwrap(), "@timestamp");
    }

    #[test]
    fn test_policy_applies_without_override() {
        let mut registry = FieldRegistry::new(NamingPolicy::SnakeCase);
        registry.register::<User>(TypeMapping::new().member("createdAt"));
        assert_eq!(registry.resolve::<User>("createdAt").unwrap(), "created_at");
    }

    #[test]
    fn test_unknown_member_suggests_closest() {
        let mut registry = FieldRegistry::new(NamingPolicy::Preserve);
        registry.register::<Log>(TypeMapping::new().member("duration").member("message"));
        let err = registry.resolve::<Log>("durtion").unwrap_err();
        assert!(matches!(
            err,
            EsqlError::FieldNotFound { suggestion: Some(s), .. } if s == "duration"
        ));
    }

    #[test]
    fn test_unregistered_type_has_no_suggestion() {
        let registry = FieldRegistry::new(NamingPolicy::Preserve);
        let err = registry.resolve::<Log>("message").unwrap_err();
        assert!(matches!(
            err,
            EsqlError::FieldNotFound { suggestion: None, .. }
        ));
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let mut registry = FieldRegistry::new(NamingPolicy::Preserve);
        registry.register::<Log>(TypeMapping::new().member("b").member("a"));
        let members = registry.members_of::<Log>().unwrap();
        assert_eq!(members[0].0, "b");
        assert_eq!(members[1].0, "a");
    }
}
