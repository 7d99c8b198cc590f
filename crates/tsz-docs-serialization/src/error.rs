//! Errors and recoverable issues raised while reviving serialized projects.

use thiserror::Error;

/// Failure that prevents a project from being revived at all.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("expected a serialized project object, found {found}")]
    NotAProject { found: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DeserializeResult<T> = Result<T, DeserializeError>;

/// Problem found in otherwise readable input. The affected value is left
/// unset or broken and reviving continues.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeserializeIssue {
    #[error("{context} refers to reflection {old_id}, which is not part of the serialized project")]
    MissingReflection { old_id: u32, context: &'static str },

    #[error("file {old_id} is not listed in the serialized file registry")]
    MissingFile { old_id: u32 },

    #[error("unknown reflection variant `{variant}`")]
    UnknownVariant { variant: String },

    #[error("unknown type kind `{kind}`")]
    UnknownTypeKind { kind: String },

    #[error("a `{variant}` reflection cannot be nested inside another reflection")]
    MisplacedVariant { variant: String },
}

#[cfg(test)]
#[path = "../tests/error_tests.rs"]
mod tests;
