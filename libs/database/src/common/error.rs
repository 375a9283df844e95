/// Errors raised while establishing or probing a database connection
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Index creation or other startup setup failed
    #[error("Setup failed: {0}")]
    SetupFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
