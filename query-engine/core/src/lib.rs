//! Resolution of GraphQL-style selection sets against a relational data source.
//!
//! A document flows through four stages:
//! - [`SelectionBuilder`] normalizes the raw query tree into a canonical [`Selection`].
//! - [`QueryGraphBuilder`] binds it to the [`Schema`](query_structure::Schema), one bound
//!   selection per concrete type.
//! - [`ReadInterpreter`] plans and executes batched reads level by level.
//! - Results come back as [`QueryResult`]s keyed by output key.
//!
//! [`QueryExecutor`] runs all of them.

pub mod config;
pub mod error;
pub mod executor;
pub mod interpreter;
pub mod protocol_adapter;
pub mod query_document;
pub mod query_graph_builder;
pub mod result_ast;

pub use config::*;
pub use error::*;
pub use executor::*;
pub use interpreter::*;
pub use protocol_adapter::*;
pub use query_document::*;
pub use query_graph_builder::*;
pub use result_ast::*;

pub type CoreResult<T> = Result<T, CoreError>;
