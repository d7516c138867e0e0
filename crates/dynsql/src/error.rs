use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DynSqlError>;

/// Stable identifier for each error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyStructure,
    NonRenderingClause,
    DuplicateAlias,
    AliasInUse,
    UnsupportedOperation,
    MissingRequiredField,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyStructure => "EMPTY_STRUCTURE",
            ErrorCode::NonRenderingClause => "NON_RENDERING_CLAUSE",
            ErrorCode::DuplicateAlias => "DUPLICATE_ALIAS",
            ErrorCode::AliasInUse => "ALIAS_IN_USE",
            ErrorCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ErrorCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction and render-time validation failures.
///
/// None of these are retryable: a render either produces a complete
/// statement with its parameters or fails with one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DynSqlError {
    #[error("[{code}] {structure} cannot be empty", code = ErrorCode::EmptyStructure)]
    EmptyStructure { structure: &'static str },

    #[error(
        "[{code}] The {clause} clause did not render, and the statement does not allow a non-rendering {clause} clause",
        code = ErrorCode::NonRenderingClause
    )]
    NonRenderingClause { clause: &'static str },

    #[error(
        "[{code}] Table \"{table}\" is already aliased \"{existing}\" and cannot also be aliased \"{requested}\"",
        code = ErrorCode::DuplicateAlias
    )]
    DuplicateAlias {
        table: String,
        existing: String,
        requested: String,
    },

    #[error(
        "[{code}] Alias \"{alias}\" cannot be assigned to table \"{table}\", it is already used by table \"{other_table}\"",
        code = ErrorCode::AliasInUse
    )]
    AliasInUse {
        alias: String,
        table: String,
        other_table: String,
    },

    #[error("[{code}] {operation} is not supported by {subject}", code = ErrorCode::UnsupportedOperation)]
    UnsupportedOperation {
        subject: String,
        operation: &'static str,
    },

    #[error("[{code}] {statement} statement requires {field}", code = ErrorCode::MissingRequiredField)]
    MissingRequiredField {
        statement: &'static str,
        field: &'static str,
    },
}

impl DynSqlError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DynSqlError::EmptyStructure { .. } => ErrorCode::EmptyStructure,
            DynSqlError::NonRenderingClause { .. } => ErrorCode::NonRenderingClause,
            DynSqlError::DuplicateAlias { .. } => ErrorCode::DuplicateAlias,
            DynSqlError::AliasInUse { .. } => ErrorCode::AliasInUse,
            DynSqlError::UnsupportedOperation { .. } => ErrorCode::UnsupportedOperation,
            DynSqlError::MissingRequiredField { .. } => ErrorCode::MissingRequiredField,
        }
    }

    pub(crate) fn unsupported_by_strategy(strategy: &str, operation: &'static str) -> Self {
        DynSqlError::UnsupportedOperation {
            subject: format!("the \"{strategy}\" rendering strategy"),
            operation,
        }
    }
}

/// Fails with [`DynSqlError::EmptyStructure`] when `items` is empty.
pub(crate) fn ensure_not_empty<T>(items: Vec<T>, structure: &'static str) -> Result<Vec<T>> {
    if items.is_empty() {
        Err(DynSqlError::EmptyStructure { structure })
    } else {
        Ok(items)
    }
}

/// Errors raised while loading [`crate::config::GlobalConfiguration`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid boolean value \"{value}\" for {name}")]
    InvalidFlag { name: String, value: String },
}
