use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Not connected to DB")]
    NotConnected,

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Config error: {0}")]
    Config(#[from] figment::Error),

    #[error("URL parse error: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl StoreError {
    /// True when the driver rejected a write for a unique or primary-key conflict.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::Database(SqlxError::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}
