mod association;
mod cursor;
mod error;
mod field;
mod filter;
mod model;
mod order_by;
mod record;
mod schema;

pub use association::*;
pub use cursor::*;
pub use error::*;
pub use field::*;
pub use filter::*;
pub use model::*;
pub use order_by::*;
pub use record::*;
pub use schema::*;

// Re-exports
pub use graph_value::*;
