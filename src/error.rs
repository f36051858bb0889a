use thiserror::Error;

/// Failure classes of a petition request.
///
/// Each variant is owned by a different party: the caller fixes `Input`, the
/// operator fixes `Configuration`, and `Provider` comes from upstream.
#[derive(Debug, Error)]
pub enum PetitionError {
    /// Payload missing, empty, or incomplete under the active validation policy
    #[error("invalid input: {0}")]
    Input(String),

    /// Required provider credential or setting is missing
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any failure reported by the generation provider
    #[error("provider error: {cause}")]
    Provider { cause: String },
}

impl PetitionError {
    pub fn provider(cause: impl Into<String>) -> Self {
        Self::Provider {
            cause: cause.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PetitionError>;
