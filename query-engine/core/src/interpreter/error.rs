use connector::error::ConnectorError;
use query_structure::DomainError;
use thiserror::Error;

/// Failures while executing query plans: invariant violations of the planner or data access
/// failures, never problems of the query itself.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("Order expressions diverge across the concrete types of `{}`: {}", position, details)]
    DivergentOrder { position: String, details: String },

    #[error("Expected at most one record for `{}`, found {}.", position, found)]
    TooManyRecords { position: String, found: usize },

    #[error("Required association `{}` resolved to no record for join key {}.", position, key)]
    MissingRequiredRecord { position: String, key: String },

    #[error("Error in connector: {}", _0)]
    ConnectorError(ConnectorError),

    #[error("Error in domain logic: {}", _0)]
    DomainError(DomainError),
}

impl From<ConnectorError> for InterpreterError {
    fn from(e: ConnectorError) -> Self {
        InterpreterError::ConnectorError(e)
    }
}

impl From<DomainError> for InterpreterError {
    fn from(e: DomainError) -> Self {
        InterpreterError::DomainError(e)
    }
}
