//! File-backed storage of the Eleven config
//!
//! `config.json` is only ever replaced through a rename, so a crash while
//! saving leaves either the previous or the new config in place. The
//! previous snapshot is also copied to `config.json.backup`, which `lookup`
//! falls back to if the main file went missing.

use crate::error::{ConfigError, Result};
use eleven_core::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const CONFIG_FILE: &str = "config.json";
const CONFIG_BACKUP: &str = "config.json.backup";
const CONFIG_PENDING: &str = "config.json.tmp";

/// Current config file format version
pub const CONFIG_FORMAT_VERSION: u64 = 1;

#[derive(Serialize)]
struct StoredConfigRef<'a> {
    version: u64,
    config: &'a Config,
}

#[derive(Deserialize)]
struct StoredConfig {
    config: Config,
}

/// Reads and writes `config.json` in a local directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.dir.join(CONFIG_BACKUP)
    }

    fn pending_path(&self) -> PathBuf {
        self.dir.join(CONFIG_PENDING)
    }

    /// Whether a config, or at least its backup, has been saved
    pub fn is_installed(&self) -> bool {
        self.config_path().exists() || self.backup_path().exists()
    }

    /// Create the directory holding the config
    pub async fn create_storage(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
            tracing::debug!(dir = %self.dir.display(), "Created config directory");
        }
        Ok(())
    }

    /// Delete the config and its backup.
    ///
    /// The backup goes first so that an interrupted removal never leaves an
    /// older snapshot as the only config. The directory itself is only
    /// removed when nothing else lives in it.
    pub async fn remove_storage(&self) -> Result<()> {
        for path in [self.backup_path(), self.pending_path(), self.config_path()] {
            if path.exists() {
                fs::remove_file(&path).await?;
            }
        }

        if self.dir.exists() && fs::remove_dir(&self.dir).await.is_err() {
            tracing::debug!(dir = %self.dir.display(), "Kept non-empty config directory");
        }

        tracing::debug!("Removed config storage");
        Ok(())
    }

    /// Load the saved config
    pub async fn lookup(&self) -> Result<Config> {
        let path = self.config_path();

        let path = if path.exists() {
            path
        } else {
            let backup = self.backup_path();
            if !backup.exists() {
                return Err(ConfigError::NotInstalled(self.dir.clone()));
            }

            tracing::warn!(
                path = %backup.display(),
                "Config file missing, loading its backup"
            );
            backup
        };

        let stored = read_stored_config(&path).await?;

        tracing::debug!(clusters = stored.config.clusters.len(), "Loaded config");
        Ok(stored.config)
    }

    /// Save the config, keeping the previous one as a backup
    pub async fn save(&self, config: &Config) -> Result<()> {
        self.create_storage().await?;

        let content = serde_json::to_string_pretty(&StoredConfigRef {
            version: CONFIG_FORMAT_VERSION,
            config,
        })?;

        let pending = self.pending_path();
        fs::write(&pending, content).await?;

        let path = self.config_path();
        if path.exists() {
            fs::copy(&path, self.backup_path()).await?;
        }

        fs::rename(&pending, &path).await?;

        tracing::debug!(clusters = config.clusters.len(), "Saved config");
        Ok(())
    }
}

async fn read_stored_config(path: &Path) -> Result<StoredConfig> {
    let content = fs::read_to_string(path).await?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    // Checked before the config itself, whose shape may have changed
    let version = value.get("version").and_then(serde_json::Value::as_u64).unwrap_or(0);
    if version > CONFIG_FORMAT_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: version,
            supported: CONFIG_FORMAT_VERSION,
        });
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eleven_core::{Cluster, DEFAULT_CLUSTER_NAME};
    use tempfile::tempdir;

    fn config_with_cluster() -> Config {
        let mut config = Config::new();
        config.set_cluster(Cluster::new(DEFAULT_CLUSTER_NAME, "t2.medium", true));
        config
    }

    #[tokio::test]
    async fn test_config_save_lookup() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path().join("eleven"));

        let config = config_with_cluster();
        store.save(&config).await.unwrap();

        assert!(store.is_installed());
        assert_eq!(store.lookup().await.unwrap(), config);
        assert!(!temp_dir.path().join("eleven").join(CONFIG_PENDING).exists());
    }

    #[tokio::test]
    async fn test_lookup_without_config() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        store.create_storage().await.unwrap();

        assert!(!store.is_installed());
        assert!(matches!(store.lookup().await, Err(ConfigError::NotInstalled(_))));
    }

    #[tokio::test]
    async fn test_save_keeps_backup() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        let first = Config::new();
        store.save(&first).await.unwrap();
        assert!(!temp_dir.path().join(CONFIG_BACKUP).exists());

        let mut second = first.clone();
        second.set_cluster(Cluster::new(DEFAULT_CLUSTER_NAME, "t2.medium", true));
        store.save(&second).await.unwrap();

        let backup = std::fs::read_to_string(temp_dir.path().join(CONFIG_BACKUP)).unwrap();
        let backup: serde_json::Value = serde_json::from_str(&backup).unwrap();

        assert_eq!(backup["version"], CONFIG_FORMAT_VERSION);
        assert!(backup["config"]["clusters"].as_object().unwrap().is_empty());
        assert_eq!(store.lookup().await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_backup() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        let first = config_with_cluster();
        store.save(&first).await.unwrap();
        store.save(&Config::new()).await.unwrap();

        // Main file lost between two writes
        std::fs::remove_file(store.config_path()).unwrap();

        assert!(store.is_installed());
        assert_eq!(store.lookup().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_interrupted_save_keeps_previous_config() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        let config = config_with_cluster();
        store.save(&config).await.unwrap();

        // Half-written pending file left by a crash
        std::fs::write(temp_dir.path().join(CONFIG_PENDING), "{\"version\": 1, \"conf").unwrap();

        assert_eq!(store.lookup().await.unwrap(), config);

        // The next save replaces it
        let updated = Config::new();
        store.save(&updated).await.unwrap();
        assert_eq!(store.lookup().await.unwrap(), updated);
        assert!(!temp_dir.path().join(CONFIG_PENDING).exists());
    }

    #[tokio::test]
    async fn test_newer_version_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        let content = serde_json::json!({ "version": CONFIG_FORMAT_VERSION + 1, "config": {} });
        std::fs::write(store.config_path(), content.to_string()).unwrap();

        match store.lookup().await {
            Err(ConfigError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, CONFIG_FORMAT_VERSION + 1);
                assert_eq!(supported, CONFIG_FORMAT_VERSION);
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remove_storage_keeps_foreign_files() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("notes.txt"), "keep me").unwrap();

        store.save(&Config::new()).await.unwrap();
        store.save(&Config::new()).await.unwrap();
        store.remove_storage().await.unwrap();

        assert!(!store.is_installed());
        assert!(!temp_dir.path().join(CONFIG_BACKUP).exists());
        assert!(temp_dir.path().join("notes.txt").exists());
        assert!(matches!(store.lookup().await, Err(ConfigError::NotInstalled(_))));

        // Removing twice is harmless
        store.remove_storage().await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_storage_deletes_empty_dir() {
        let temp_dir = tempdir().unwrap();
        let store = ConfigStore::new(temp_dir.path().join("eleven"));

        store.save(&Config::new()).await.unwrap();
        store.remove_storage().await.unwrap();

        assert!(!store.dir().exists());
    }
}
