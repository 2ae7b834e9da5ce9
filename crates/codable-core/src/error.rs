use thiserror::Error;

use crate::key::AnyKey;
use crate::path::CodingPath;

/// Errors raised while decoding. Every variant carries the path at the
/// point of failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DecodingError {
    /// A keyed container has no entry for a non-optional key.
    #[error("key not found: {key} at {path}")]
    KeyNotFound { key: AnyKey, path: CodingPath },

    /// The stored value is null but a non-optional value was requested.
    #[error("value not found: expected {expected} at {path}: {description}")]
    ValueNotFound {
        expected: String,
        path: CodingPath,
        description: String,
    },

    /// The stored value's runtime kind cannot be converted to the request.
    #[error("type mismatch: expected {expected} at {path}: {description}")]
    TypeMismatch {
        expected: String,
        path: CodingPath,
        description: String,
    },

    /// Structurally invalid input.
    #[error("data corrupted at {path}: {description}")]
    DataCorrupted { path: CodingPath, description: String },
}

impl DecodingError {
    pub fn key_not_found(key: AnyKey, path: &CodingPath) -> Self {
        Self::KeyNotFound {
            key,
            path: path.clone(),
        }
    }

    pub fn value_not_found(
        expected: impl Into<String>,
        path: &CodingPath,
        description: impl Into<String>,
    ) -> Self {
        Self::ValueNotFound {
            expected: expected.into(),
            path: path.clone(),
            description: description.into(),
        }
    }

    pub fn type_mismatch(
        expected: impl Into<String>,
        path: &CodingPath,
        description: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            path: path.clone(),
            description: description.into(),
        }
    }

    pub fn data_corrupted(path: &CodingPath, description: impl Into<String>) -> Self {
        Self::DataCorrupted {
            path: path.clone(),
            description: description.into(),
        }
    }

    /// The path at which decoding failed.
    pub fn path(&self) -> &CodingPath {
        match self {
            Self::KeyNotFound { path, .. }
            | Self::ValueNotFound { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::DataCorrupted { path, .. } => path,
        }
    }
}

/// Errors raised while encoding.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EncodingError {
    /// The value cannot be represented by the backend.
    #[error("invalid value {value} at {path}: {description}")]
    InvalidValue {
        value: String,
        path: CodingPath,
        description: String,
    },
}

impl EncodingError {
    pub fn invalid_value(
        value: impl Into<String>,
        path: &CodingPath,
        description: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            value: value.into(),
            path: path.clone(),
            description: description.into(),
        }
    }

    pub fn path(&self) -> &CodingPath {
        match self {
            Self::InvalidValue { path, .. } => path,
        }
    }
}

/// Result alias for decode operations.
pub type DecodingResult<T> = Result<T, DecodingError>;

/// Result alias for encode operations.
pub type EncodingResult<T> = Result<T, EncodingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_exposes_its_path() {
        let path = CodingPath::root().appending(&AnyKey::string("a"));
        let errors = [
            DecodingError::key_not_found(AnyKey::string("b"), &path),
            DecodingError::value_not_found("i32", &path, "null"),
            DecodingError::type_mismatch("bool", &path, "found string"),
            DecodingError::data_corrupted(&path, "bad"),
        ];
        for err in &errors {
            assert_eq!(err.path(), &path);
        }
    }

    #[test]
    fn display_mentions_key_and_path() {
        let path = CodingPath::root().appending(&AnyKey::string("user"));
        let err = DecodingError::key_not_found(AnyKey::string("id"), &path);
        assert_eq!(err.to_string(), "key not found: \"id\" at user");
    }

    #[test]
    fn encoding_error_display() {
        let err = EncodingError::invalid_value("NaN", &CodingPath::root(), "not finite");
        assert_eq!(err.to_string(), "invalid value NaN at <root>: not finite");
    }
}
