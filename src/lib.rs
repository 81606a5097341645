//! Type-safe ES|QL query builder with AST-native design.
//!
//! Build pipelines as typed AST, not strings. Field names resolve through
//! a registry at build time, so typos fail before anything reaches the
//! engine.
//!
//! ```ignore
//! use esql::prelude::*;
//!
//! let text = Esql::<Log>::from(&registry, "logs-*")?
//!     .filter(member("duration").gt(lit(5000)))?
//!     .sort_desc(member("duration"))?
//!     .select([("message", member("message")), ("duration", member("duration"))])?
//!     .take(50)?
//!     .render();
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod params;
pub mod schema;
pub mod transpiler;

/// Ergonomic alias for the typed pipeline builder.
pub type Esql<T> = compiler::Esql<T>;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::{Command, Expr, Query, TimeUnit, Value};
    pub use crate::error::{EsqlError, EsqlResult};
    pub use crate::params::ParamCollector;
    pub use crate::schema::{FieldRegistry, NamingPolicy, TypeMapping};
    pub use crate::transpiler::ToEsql;
    pub use crate::Esql;
}
