use thiserror::Error;

/// Canonical error taxonomy for bucket store operations.
///
/// The HTTP boundary maps each variant to a status code; variants carry the
/// detail that is safe to log, not necessarily what is rendered to clients.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No credential was supplied with the request.
    #[error("no API key provided")]
    MissingCredential,

    /// The supplied credential does not match any registered key.
    ///
    /// Surfaces as 403 rather than 401, a compatibility quirk preserved from
    /// the original API.
    #[error("invalid API key")]
    InvalidCredential,

    /// Request body was absent or not valid JSON.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Human-readable description of what was wrong with the input.
        message: String,
    },

    /// Entity does not exist, or exists but belongs to another owner.
    ///
    /// The two cases are deliberately indistinguishable to prevent existence
    /// leakage.
    #[error("{entity} `{id}` was not found")]
    NotFound {
        /// Entity type name (e.g. `"bucket"`).
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// A rate-limit window ceiling was reached.
    #[error("rate limit exceeded: {message}")]
    RateExceeded {
        /// Which quota was exceeded, in human-readable form.
        message: String,
    },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted content could not be parsed back as JSON.
    ///
    /// Should not occur given that create/update validate on the way in;
    /// treated as an internal fault.
    #[error("malformed stored content: {0}")]
    MalformedStorage(String),
}

impl CoreError {
    /// Creates a `NotFound` variant.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an `InvalidInput` variant.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a `Storage` variant.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// Convenient result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
