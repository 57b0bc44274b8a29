use thiserror::Error;

/// Domain-level errors for BrandCraft.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Server not responding after {secs}s")]
    Timeout { secs: u64 },

    #[error("Server error ({status})")]
    ServerFault { status: u16 },

    #[error("Endpoint not found (404): {path}")]
    EndpointMissing { path: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("Audio output error: {0}")]
    Audio(String),

    #[error("Generative provider error: {0}")]
    Provider(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether this failure is absorbed by an endpoint's simulated response.
    #[must_use]
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            DomainError::Transport(_)
                | DomainError::Timeout { .. }
                | DomainError::ServerFault { .. }
                | DomainError::EndpointMissing { .. }
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for DomainError {
    fn from(err: base64::DecodeError) -> Self {
        DomainError::Decode(err.to_string())
    }
}
