use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid id format: {0}")]
    InvalidId(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("database connection error: {0}")]
    Connect(String),
}
