use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Fatal, whole-run errors. Per-collector failures never reach this level;
/// they degrade the affected field instead (see `collectors::probe`).
#[derive(Error, Debug)]
pub enum AppError {
    /// No network interface exposes a usable hardware address
    #[error("no usable hardware address found; cannot key the inventory record")]
    IdentityUnavailable,

    /// Datastore connectivity or query failure
    #[error("datastore error: {0}")]
    Datastore(#[from] sqlx::Error),

    /// Record rendering failed
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
