use query_structure::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{}", kind)]
pub struct ConnectorError {
    /// The error information for internal use.
    pub kind: ErrorKind,
}

impl ConnectorError {
    pub fn from_kind(kind: ErrorKind) -> Self {
        ConnectorError { kind }
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("Column '{}' does not exist.", column)]
    ColumnDoesNotExist { column: String },

    #[error("Table '{}' does not exist.", table)]
    TableDoesNotExist { table: String },

    #[error("Error querying the data store: {}", _0)]
    QueryError(Box<dyn std::error::Error + Send + Sync>),

    #[error("{}", _0)]
    DomainError(DomainError),
}

impl From<DomainError> for ConnectorError {
    fn from(e: DomainError) -> ConnectorError {
        ConnectorError::from_kind(ErrorKind::DomainError(e))
    }
}
