use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid ISO3 country code: '{0}'")]
    InvalidIso3(String),
    #[error("invalid UN numeric location code: '{0}'")]
    InvalidUnCode(String),
    #[error("invalid table name: '{0}'")]
    InvalidTableName(String),
    #[error("unknown indicator: '{0}'")]
    UnknownIndicator(String),
    #[error("unknown source: '{0}'")]
    UnknownSource(String),
    #[error("source registry: {0}")]
    Registry(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
