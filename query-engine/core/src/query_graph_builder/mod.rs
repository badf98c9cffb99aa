//! Query graph builder module: binds canonical selections to the schema.

mod arguments;
mod binder;
mod bound;
mod builder;
mod dispatcher;
mod error;

pub(crate) use arguments::*;
pub use binder::{EntryPoint, TypeBinder};
pub use bound::*;
pub use dispatcher::AssociationDispatcher;
pub use error::*;

pub use builder::QueryGraphBuilder;

/// Query graph builder sub-result type.
pub type QueryGraphBuilderResult<T> = Result<T, QueryGraphBuilderError>;
