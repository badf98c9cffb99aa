//! A [`ReadOperations`](query_connector::ReadOperations) implementation over in-memory tables.
//!
//! Every read is recorded in a [`QueryLog`], which makes the connector suitable for asserting
//! how many round trips a resolution needed.

mod database;
mod evaluate;
mod query_log;

pub use database::*;
pub use query_log::*;

pub type Row = indexmap::IndexMap<String, query_structure::GraphValue>;
