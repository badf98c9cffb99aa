//! Query document: the raw AST of an incoming query and the canonical [`Selection`] tree built
//! from it.

mod builder;
mod error;
mod raw;
mod selection;

pub use builder::*;
pub use error::*;
pub use raw::*;
pub use selection::*;

/// Name of the root operation type; fragments on the root use it as their type condition.
pub const ROOT_TYPE_NAME: &str = "Query";
