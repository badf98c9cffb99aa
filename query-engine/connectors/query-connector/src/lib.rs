pub mod error;

mod interface;
mod query_arguments;

pub use interface::*;
pub use query_arguments::*;

pub type Result<T> = std::result::Result<T, error::ConnectorError>;
