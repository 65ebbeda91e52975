use super::AppConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Persists the saved-server library and last used directory.
pub struct AppConfigStore {
    path: PathBuf,
}

impl AppConfigStore {
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "mcpdesk")
            .context("Could not determine config directory")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        Ok(Self {
            path: config_dir.join("config.yaml"),
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read app config from {:?}", self.path))?;
        if contents.trim().is_empty() {
            return Ok(AppConfig::default());
        }
        let mut config: AppConfig =
            serde_yaml::from_str(&contents).with_context(|| "Failed to parse app config YAML")?;
        config.saved_servers.dedup();
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directory: {:?}", parent))?;
        }
        let contents =
            serde_yaml::to_string(config).context("Failed to serialize app config to YAML")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write app config to {:?}", self.path))?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
