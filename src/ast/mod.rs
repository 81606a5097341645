//! Query AST: captured expressions, literal values, and the command IR.

pub mod builders;
pub mod command;
pub mod expr;
pub mod operators;
pub mod values;

pub use command::{Command, Query};
pub use expr::Expr;
pub use operators::{AggregateFunc, BinaryOp, UnaryOp};
pub use values::{TimeUnit, Value};
