use dynsql::error::{ConfigError, DynSqlError};
use model::core::jdbc_type::JdbcTypeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the statement file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to deserialize the statement document: {0}")]
    DocumentDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Invalid statement document: {0}")]
    InvalidDocument(String),

    #[error("Invalid column type: {0}")]
    ColumnType(#[from] JdbcTypeError),

    #[error("Unknown rendering strategy: {0}")]
    UnknownStrategy(String),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to render the statement: {0}")]
    Render(#[from] DynSqlError),
}
