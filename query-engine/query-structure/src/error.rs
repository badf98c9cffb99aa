use graph_value::ConversionFailure;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Type `{}` not found.", name)]
    TypeNotFound { name: String },

    #[error("Field `{}` not found on type `{}`.", field, type_name)]
    FieldNotFound { type_name: String, field: String },

    #[error("Column `{}` is missing from a fetched `{}` record.", column, type_name)]
    ColumnNotFound { type_name: String, column: String },

    #[error("Association `{}.{}` is invalid: {}", type_name, association, reason)]
    InvalidAssociation {
        type_name: String,
        association: String,
        reason: String,
    },

    #[error("Invalid schema: {}", _0)]
    InvalidSchema(String),

    #[error("Invalid cursor: {}", _0)]
    InvalidCursor(String),

    #[error("Argument `{}` expects {}, got `{}`.", argument, expected, got)]
    InvalidArgumentValue {
        argument: String,
        expected: &'static str,
        got: String,
    },

    #[error("{}", _0)]
    ConversionFailure(#[from] ConversionFailure),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
