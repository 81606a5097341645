//! Builder-to-IR compilation.
//!
//! [`Esql<T>`] is the fluent surface: each call lowers its expression
//! graphs through the field registry and parameter collector, appends
//! fully rendered [`Command`] nodes to the pipeline, and fails fast on
//! anything unresolvable. By the time a query renders, no validation
//! remains to do.

pub(crate) mod projection;
pub(crate) mod scalar;
pub(crate) mod stats;

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::ast::{Command, Expr, Query, Value};
use crate::error::{EsqlError, EsqlResult};
use crate::params::ParamCollector;
use crate::schema::FieldRegistry;
use crate::transpiler::value::{format_value, quote_field};
use crate::transpiler::ToEsql;

use scalar::Scope;

/// Typed query pipeline over element type `T`.
///
/// Construction is sequential and single-owner: every method consumes the
/// builder and returns it (or the error that ended compilation). Errors
/// surface on the call that caused them, never at render time.
pub struct Esql<T> {
    query: Query,
    registry: Arc<FieldRegistry>,
    aliases: HashSet<String>,
    element: PhantomData<T>,
}

impl<T> Clone for Esql<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            registry: Arc::clone(&self.registry),
            aliases: self.aliases.clone(),
            element: PhantomData,
        }
    }
}

// Manual impl: a derive would bound `T: Debug`, and the marker carries no
// state worth printing.
impl<T> fmt::Debug for Esql<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Esql")
            .field("query", &self.query)
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl<T: 'static> Esql<T> {
    /// Start a pipeline from an index pattern: `FROM <pattern>`.
    pub fn from(registry: &Arc<FieldRegistry>, pattern: &str) -> EsqlResult<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(EsqlError::invalid("index pattern must not be empty"));
        }
        tracing::debug!("pipeline from {}", pattern);
        Ok(Self {
            query: Query {
                commands: vec![Command::Source {
                    pattern: pattern.to_string(),
                }],
                element: std::any::type_name::<T>().to_string(),
                params: ParamCollector::new(),
            },
            registry: Arc::clone(registry),
            aliases: HashSet::new(),
            element: PhantomData,
        })
    }

    /// Start a pipeline from inline literals: `ROW <name> = <value>, ...`.
    ///
    /// The assigned names are the only columns in scope afterwards.
    pub fn row<S, V>(
        registry: &Arc<FieldRegistry>,
        values: impl IntoIterator<Item = (S, V)>,
    ) -> EsqlResult<Self>
    where
        S: AsRef<str>,
        V: Into<Value>,
    {
        let mut aliases = HashSet::new();
        let mut assignments = Vec::new();
        for (name, value) in values {
            let resolved = registry.resolve_anonymous(name.as_ref());
            assignments.push((quote_field(&resolved), format_value(&value.into())));
            aliases.insert(resolved);
        }
        if assignments.is_empty() {
            return Err(EsqlError::invalid("row requires at least one assignment"));
        }
        Ok(Self {
            query: Query {
                commands: vec![Command::Row { assignments }],
                element: std::any::type_name::<T>().to_string(),
                params: ParamCollector::new(),
            },
            registry: Arc::clone(registry),
            aliases,
            element: PhantomData,
        })
    }

    fn scope(&mut self) -> Scope<'_> {
        Scope {
            registry: &self.registry,
            element: TypeId::of::<T>(),
            element_name: std::any::type_name::<T>(),
            aliases: &self.aliases,
            params: &mut self.query.params,
        }
    }

    /// Append a `WHERE` stage. Each call is its own command; successive
    /// filters are not merged.
    pub fn filter(mut self, condition: impl Into<Expr>) -> EsqlResult<Self> {
        let expr = condition.into();
        let rendered = {
            let mut scope = self.scope();
            scalar::lower(&expr, &mut scope)?
        };
        tracing::debug!("compiled filter: {}", rendered);
        self.query.commands.push(Command::Filter {
            condition: rendered,
        });
        Ok(self)
    }

    /// Project named outputs. Pass-through members become one `KEEP`;
    /// renamed or computed outputs become one `EVAL` after it.
    pub fn select<S, E>(
        mut self,
        outputs: impl IntoIterator<Item = (S, E)>,
    ) -> EsqlResult<Self>
    where
        S: AsRef<str>,
        E: Into<Expr>,
    {
        let record = Expr::Record(
            outputs
                .into_iter()
                .map(|(name, expr)| (self.registry.resolve_anonymous(name.as_ref()), expr.into()))
                .collect(),
        );
        let (commands, introduced) = {
            let mut scope = self.scope();
            projection::compile_projection(record, &mut scope)?
        };
        self.query.commands.extend(commands);
        self.aliases.extend(introduced);
        Ok(self)
    }

    /// Project onto a registered target type. The target's declared field
    /// names (including overrides) become the output names; the members
    /// themselves resolve against the current element.
    pub fn select_into<U: 'static>(mut self) -> EsqlResult<Esql<U>> {
        let Some(members) = self.registry.members_of::<U>() else {
            return Err(EsqlError::invalid(format!(
                "projection target {} is not registered",
                std::any::type_name::<U>()
            )));
        };
        let record = Expr::Record(
            members
                .iter()
                .map(|(name, field)| {
                    (
                        field.clone(),
                        Expr::Member {
                            name: name.clone(),
                            subfield: None,
                        },
                    )
                })
                .collect(),
        );
        let (commands, introduced) = {
            let mut scope = self.scope();
            projection::compile_projection(record, &mut scope)?
        };
        self.query.commands.extend(commands);
        self.aliases.extend(introduced);
        self.query.element = std::any::type_name::<U>().to_string();
        Ok(Esql {
            query: self.query,
            registry: self.registry,
            aliases: self.aliases,
            element: PhantomData,
        })
    }

    /// Append an `EVAL` stage computing one named column.
    pub fn eval(mut self, name: impl AsRef<str>, expr: impl Into<Expr>) -> EsqlResult<Self> {
        let resolved = self.registry.resolve_anonymous(name.as_ref());
        let expr = expr.into();
        let rendered = {
            let mut scope = self.scope();
            scalar::lower(&expr, &mut scope)?
        };
        self.query.commands.push(Command::Eval {
            assignments: vec![(quote_field(&resolved), rendered)],
        });
        self.aliases.insert(resolved);
        Ok(self)
    }

    /// Append a `KEEP` stage listing members to retain.
    pub fn keep<S: AsRef<str>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> EsqlResult<Self> {
        let rendered = self.resolve_field_list(fields, "keep")?;
        self.query.commands.push(Command::Keep { fields: rendered });
        Ok(self)
    }

    /// Append a `DROP` stage listing members to discard.
    pub fn drop_fields<S: AsRef<str>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> EsqlResult<Self> {
        let rendered = self.resolve_field_list(fields, "drop")?;
        self.query.commands.push(Command::Drop { fields: rendered });
        Ok(self)
    }

    fn resolve_field_list<S: AsRef<str>>(
        &mut self,
        fields: impl IntoIterator<Item = S>,
        operation: &str,
    ) -> EsqlResult<Vec<String>> {
        let exprs: Vec<Expr> = fields
            .into_iter()
            .map(|name| Expr::Member {
                name: name.as_ref().to_string(),
                subfield: None,
            })
            .collect();
        if exprs.is_empty() {
            return Err(EsqlError::invalid(format!(
                "{} requires at least one field",
                operation
            )));
        }
        let mut scope = self.scope();
        exprs.iter().map(|expr| scalar::lower(expr, &mut scope)).collect()
    }

    /// Append a `RENAME` stage. The new names enter the alias scope for
    /// later stages.
    pub fn rename<S1, S2>(
        mut self,
        pairs: impl IntoIterator<Item = (S1, S2)>,
    ) -> EsqlResult<Self>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let named: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(old, new)| {
                (
                    old.as_ref().to_string(),
                    self.registry.resolve_anonymous(new.as_ref()),
                )
            })
            .collect();
        if named.is_empty() {
            return Err(EsqlError::invalid("rename requires at least one pair"));
        }
        let mut rendered = Vec::with_capacity(named.len());
        {
            let mut scope = self.scope();
            for (old, new) in &named {
                let source = scalar::lower(
                    &Expr::Member {
                        name: old.clone(),
                        subfield: None,
                    },
                    &mut scope,
                )?;
                rendered.push((source, quote_field(new)));
            }
        }
        self.query.commands.push(Command::Rename { pairs: rendered });
        self.aliases.extend(named.into_iter().map(|(_, new)| new));
        Ok(self)
    }

    /// Append a `STATS` stage with grouping keys and aggregations. Keys may
    /// be bare members or function calls; aggregations must be aggregate
    /// calls. Zero keys drops the `BY` clause.
    pub fn group_by<KS, KE, AS, AE>(
        mut self,
        keys: impl IntoIterator<Item = (KS, KE)>,
        aggregates: impl IntoIterator<Item = (AS, AE)>,
    ) -> EsqlResult<Self>
    where
        KS: AsRef<str>,
        KE: Into<Expr>,
        AS: AsRef<str>,
        AE: Into<Expr>,
    {
        let keys: Vec<(String, Expr)> = keys
            .into_iter()
            .map(|(name, expr)| (self.registry.resolve_anonymous(name.as_ref()), expr.into()))
            .collect();
        let aggregates: Vec<(String, Expr)> = aggregates
            .into_iter()
            .map(|(name, expr)| (self.registry.resolve_anonymous(name.as_ref()), expr.into()))
            .collect();
        let (command, introduced) = {
            let mut scope = self.scope();
            stats::compile_stats(keys, aggregates, &mut scope)?
        };
        self.query.commands.push(command);
        self.aliases.extend(introduced);
        Ok(self)
    }

    /// Aggregate over the whole result set: a `STATS` stage with no `BY`.
    pub fn aggregate<AS, AE>(
        self,
        aggregates: impl IntoIterator<Item = (AS, AE)>,
    ) -> EsqlResult<Self>
    where
        AS: AsRef<str>,
        AE: Into<Expr>,
    {
        self.group_by(Vec::<(String, Expr)>::new(), aggregates)
    }

    /// Append an ascending `SORT` stage. Each call is an independent
    /// pipeline stage; stacked sorts are deliberately not merged into one
    /// multi-key command.
    pub fn sort(self, field: impl Into<Expr>) -> EsqlResult<Self> {
        self.sort_inner(field.into(), false)
    }

    /// Append a descending `SORT` stage.
    pub fn sort_desc(self, field: impl Into<Expr>) -> EsqlResult<Self> {
        self.sort_inner(field.into(), true)
    }

    fn sort_inner(mut self, field: Expr, descending: bool) -> EsqlResult<Self> {
        if !field.is_field_ref() {
            return Err(EsqlError::unsupported(
                "SORT requires a field reference; compute the key with eval first",
            ));
        }
        let rendered = {
            let mut scope = self.scope();
            scalar::lower(&field, &mut scope)?
        };
        self.query.commands.push(Command::Sort {
            fields: vec![(rendered, descending)],
        });
        Ok(self)
    }

    /// Append a `LIMIT` stage. The count must be non-negative.
    pub fn take(mut self, count: i64) -> EsqlResult<Self> {
        if count < 0 {
            return Err(EsqlError::invalid(format!(
                "limit must be non-negative, got {}",
                count
            )));
        }
        self.query.commands.push(Command::Limit {
            count: count as u64,
        });
        Ok(self)
    }

    /// Append a `LOOKUP JOIN` stage against a secondary source.
    pub fn lookup_join(mut self, source: &str, on: impl Into<Expr>) -> EsqlResult<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(EsqlError::invalid("lookup join source must not be empty"));
        }
        let on = on.into();
        let condition = {
            let mut scope = self.scope();
            scalar::lower(&on, &mut scope)?
        };
        self.query.commands.push(Command::LookupJoin {
            source: source.to_string(),
            condition,
        });
        Ok(self)
    }

    /// Append a `COMPLETION` stage writing to the engine's default output
    /// column.
    pub fn completion(self, prompt: impl Into<Expr>, inference_id: &str) -> EsqlResult<Self> {
        self.completion_inner(prompt.into(), inference_id, None)
    }

    /// Append a `COMPLETION` stage writing to a named output column.
    pub fn completion_as(
        self,
        column: impl AsRef<str>,
        prompt: impl Into<Expr>,
        inference_id: &str,
    ) -> EsqlResult<Self> {
        let column = column.as_ref().to_string();
        self.completion_inner(prompt.into(), inference_id, Some(column))
    }

    fn completion_inner(
        mut self,
        prompt: Expr,
        inference_id: &str,
        column: Option<String>,
    ) -> EsqlResult<Self> {
        let inference_id = inference_id.trim();
        if inference_id.is_empty() {
            return Err(EsqlError::invalid("inference id must not be empty"));
        }
        let rendered = {
            let mut scope = self.scope();
            scalar::lower(&prompt, &mut scope)?
        };
        let column = column.map(|c| self.registry.resolve_anonymous(&c));
        if let Some(ref resolved) = column {
            self.aliases.insert(resolved.clone());
        }
        self.query.commands.push(Command::Completion {
            prompt: rendered,
            inference_id: inference_id.to_string(),
            column: column.map(|c| quote_field(&c)),
        });
        Ok(self)
    }
}

impl<T> Esql<T> {
    /// The compiled pipeline.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Consume the builder, yielding the compiled pipeline.
    pub fn into_query(self) -> Query {
        self.query
    }

    /// Parameters bound so far, in insertion order.
    pub fn params(&self) -> &ParamCollector {
        &self.query.params
    }

    /// Render the pipeline to query text.
    pub fn render(&self) -> String {
        self.query.render()
    }
}

impl<T> ToEsql for Esql<T> {
    fn to_esql(&self) -> String {
        self.query.to_esql()
    }
}
