use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

const APP_DIR: &str = "BrandCraft";

/// TOML-based configuration store with OS-specific paths.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    /// Create a store rooted in the OS application config directory.
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = dirs::config_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or_else(|| {
                DomainError::Config("Could not find application data directory".to_string())
            })?;
        Self::with_data_dir(data_dir)
    }

    /// Create a store rooted at an explicit directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, DomainError> {
        fs::create_dir_all(&data_dir)?;
        info!(data_dir = ?data_dir, "ConfigStore initialized");
        Ok(Self { data_dir })
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let config_path = self.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            config.api.validate()?;
            info!(path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!(path = ?config_path, "Configuration file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        config.api.validate()?;
        let config_path = self.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        // Logs live next to other local data, separate from roaming config.
        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR).join("logs"))
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_store(name: &str) -> (TomlConfigStore, PathBuf) {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        (TomlConfigStore::with_data_dir(dir.clone()).unwrap(), dir)
    }

    #[test]
    fn test_config_store_paths() {
        let (store, dir) = temp_store("brandcraft_paths_test");

        assert!(store.config_path().ends_with("config.toml"));
        assert!(store.logs_dir().to_string_lossy().contains("logs"));
        assert_eq!(store.data_dir(), dir);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_creates_default() {
        let (store, dir) = temp_store("brandcraft_default_test");

        let config = store.load().unwrap();
        assert_eq!(config.api.timeout_secs, 10);
        assert!(store.config_path().exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_config_roundtrip() {
        let (store, dir) = temp_store("brandcraft_roundtrip_test");

        let mut config = AppConfig::new();
        config.api.base_url = "https://api.brandcraft.io".to_string();
        config.api.simulation_enabled = false;
        config.logging.level = "debug".to_string();
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.api.base_url, "https://api.brandcraft.io");
        assert!(!loaded.api.simulation_enabled);
        assert_eq!(loaded.logging.level, "debug");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_base_url_rejected_on_save() {
        let (store, dir) = temp_store("brandcraft_invalid_test");

        let mut config = AppConfig::new();
        config.api.base_url = "localhost".to_string();
        assert!(store.save(&config).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
