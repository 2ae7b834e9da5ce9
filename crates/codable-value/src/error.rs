use codable_core::{DecodingError, EncodingError};

/// Errors from the top-level value and JSON entry points.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    /// Malformed JSON text, or a JSON writer failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for value backend operations.
pub type ValueResult<T> = Result<T, ValueError>;
