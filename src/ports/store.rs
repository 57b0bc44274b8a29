use crate::domain::DomainError;

/// Key-value store for session data (token, display name, remembered
/// email, brand context). Mirrors browser-local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), DomainError>;
}
