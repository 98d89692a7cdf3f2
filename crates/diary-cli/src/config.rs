use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory name under the XDG base directories.
const APP_DIR: &str = "dear-diary";

#[derive(Debug, Serialize, Deserialize)]
pub struct DiaryConfig {
    pub storage: StorageSection,
    pub wallet: WalletSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageSection {
    pub store_dir: String,
    pub registry_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletSection {
    pub address: String,
}

impl DiaryConfig {
    pub fn new(store_dir: PathBuf, registry_path: PathBuf, address: String) -> Self {
        Self {
            storage: StorageSection {
                store_dir: store_dir.to_string_lossy().to_string(),
                registry_path: registry_path.to_string_lossy().to_string(),
            },
            wallet: WalletSection { address },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("blobs"))
}

pub fn default_registry_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("registry.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<DiaryConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &DiaryConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = DiaryConfig::new(
            dir.path().join("blobs"),
            dir.path().join("registry.json"),
            "0xAlice".to_string(),
        );

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();

        assert_eq!(loaded.wallet.address, "0xAlice");
        assert_eq!(loaded.storage.store_dir, config.storage.store_dir);
        assert_eq!(loaded.storage.registry_path, config.storage.registry_path);
    }

    #[test]
    fn test_read_config_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nstore_dir = 1\n").unwrap();

        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
