use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid preset choice \"{label}\"")]
    InvalidChoice { label: String },

    #[error("Invalid name \"{name}\" (must be non-empty and not contain / . $ # [ ])")]
    InvalidName { name: String },

    #[error("History store unavailable: {0}")]
    StoreUnavailable(StoreError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Interrupted")]
    Interrupted,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected value at {path}")]
    Malformed { path: String },

    #[error("invalid key \"{name}\"")]
    InvalidKey { name: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidKey { name } => AppError::InvalidName { name },
            other => AppError::StoreUnavailable(other),
        }
    }
}
