use std::path::PathBuf;

use crate::domain::{AppConfig, DomainError};

/// Port for persisting the client configuration.
pub trait ConfigStore: Send + Sync {
    /// Load configuration, writing defaults on first run.
    fn load(&self) -> Result<AppConfig, DomainError>;

    /// Validate and persist configuration.
    fn save(&self, config: &AppConfig) -> Result<(), DomainError>;

    fn config_path(&self) -> PathBuf;

    fn data_dir(&self) -> PathBuf;

    /// Directory for rolling log files.
    fn logs_dir(&self) -> PathBuf;
}
