use crate::{InterpreterError, QueryGraphBuilderError, QueryParserError};
use connector::error::ConnectorError;
use query_structure::DomainError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    QueryParserError(QueryParserError),

    #[error("Error in query graph construction: {}", _0)]
    QueryGraphBuilderError(QueryGraphBuilderError),

    #[error("{}", _0)]
    InterpreterError(InterpreterError),

    #[error("Error in connector: {}", _0)]
    ConnectorError(ConnectorError),

    #[error("Error in domain logic: {}", _0)]
    DomainError(DomainError),

    #[error("Query resolution was cancelled.")]
    Cancelled,

    #[error("Query resolution timed out after {} ms.", _0.as_millis())]
    Timeout(Duration),
}

/// Category of a [`UserFacingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserFacingErrorKind {
    QueryValidation,
    DataAccess,
    Cancelled,
    Internal,
}

/// The part of an error that may be shown to whoever sent the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFacingError {
    pub kind: UserFacingErrorKind,
    pub message: String,
}

impl CoreError {
    /// Whether the error was caused by the query itself rather than by the data or the engine.
    pub fn is_malformed_query(&self) -> bool {
        match self {
            CoreError::QueryParserError(_) => true,
            CoreError::QueryGraphBuilderError(err) => err.is_user_error(),
            _ => false,
        }
    }

    /// Malformed queries keep their message, everything else is reported generically.
    pub fn user_facing(&self) -> UserFacingError {
        let (kind, message) = match self {
            err if err.is_malformed_query() => (UserFacingErrorKind::QueryValidation, err.to_string()),
            CoreError::ConnectorError(_) | CoreError::InterpreterError(InterpreterError::ConnectorError(_)) => (
                UserFacingErrorKind::DataAccess,
                "The data store failed to answer the query.".to_owned(),
            ),
            CoreError::Cancelled | CoreError::Timeout(_) => (UserFacingErrorKind::Cancelled, self.to_string()),
            _ => (
                UserFacingErrorKind::Internal,
                "An internal error occurred while resolving the query.".to_owned(),
            ),
        };

        UserFacingError { kind, message }
    }
}

impl From<QueryParserError> for CoreError {
    fn from(e: QueryParserError) -> CoreError {
        CoreError::QueryParserError(e)
    }
}

impl From<QueryGraphBuilderError> for CoreError {
    fn from(e: QueryGraphBuilderError) -> CoreError {
        match e {
            QueryGraphBuilderError::QueryParserError(e) => CoreError::QueryParserError(e),
            e => CoreError::QueryGraphBuilderError(e),
        }
    }
}

impl From<InterpreterError> for CoreError {
    fn from(e: InterpreterError) -> CoreError {
        match e {
            InterpreterError::ConnectorError(e) => CoreError::ConnectorError(e),
            e => CoreError::InterpreterError(e),
        }
    }
}

impl From<ConnectorError> for CoreError {
    fn from(e: ConnectorError) -> CoreError {
        CoreError::ConnectorError(e)
    }
}

impl From<DomainError> for CoreError {
    fn from(e: DomainError) -> CoreError {
        CoreError::DomainError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QueryParserErrorKind, QueryPath};
    use connector::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn malformed_queries_keep_their_message() {
        let err: CoreError = QueryGraphBuilderError::MissingPaginationArgument {
            field: "posts".into(),
            path: QueryPath::new("Query").add("posts"),
        }
        .into();

        let user_facing = err.user_facing();

        assert_eq!(user_facing.kind, UserFacingErrorKind::QueryValidation);
        assert!(user_facing.message.contains("`posts`"));
        assert!(user_facing.message.contains("Query.posts"));
    }

    #[test]
    fn wrapped_parser_errors_are_unwrapped() {
        let parser_error = QueryParserError::new(
            QueryPath::new("Query"),
            QueryParserErrorKind::UnknownFragment { name: "X".into() },
        );
        let err: CoreError = QueryGraphBuilderError::from(parser_error.clone()).into();

        assert!(matches!(&err, CoreError::QueryParserError(e) if *e == parser_error));
        assert!(err.is_malformed_query());
    }

    #[test]
    fn data_access_failures_are_generic() {
        let err: CoreError = InterpreterError::from(ConnectorError::from_kind(ErrorKind::QueryError(
            "relation \"secret_table\" does not exist".into(),
        )))
        .into();

        let user_facing = err.user_facing();

        assert_eq!(user_facing.kind, UserFacingErrorKind::DataAccess);
        assert!(!user_facing.message.contains("secret_table"));
    }

    #[test]
    fn invariant_violations_are_internal() {
        let err: CoreError = InterpreterError::TooManyRecords {
            position: "Query.node".into(),
            found: 2,
        }
        .into();

        assert_eq!(err.user_facing().kind, UserFacingErrorKind::Internal);
        assert!(!err.is_malformed_query());
    }
}
