use thiserror::Error;

/// Rejections raised while building or submitting a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Make sure the value is not empty")]
    EmptyValue,

    #[error("Make sure to provide at least one query")]
    EmptyQuery,

    #[error("operator {operator} is not allowed for {column}")]
    OperatorNotAllowed { column: &'static str, operator: &'static str },

    #[error("{column} expects a number, got '{value}'")]
    NotNumeric { column: &'static str, value: String },

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("malformed filter '{0}', expected <attribute><operator><value>")]
    MalformedFilter(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("row limit {0} out of range (1..=1000000)")]
    RowLimitOutOfRange(u32),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
