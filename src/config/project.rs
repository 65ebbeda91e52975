use super::McpConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const PROJECT_FILE_NAME: &str = ".mcp.json";

/// A project's `.mcp.json`.
pub struct ProjectFile {
    path: PathBuf,
}

impl ProjectFile {
    pub fn in_dir(directory: &Path) -> Self {
        Self {
            path: directory.join(PROJECT_FILE_NAME),
        }
    }

    /// `None` when the directory has no config file yet.
    pub fn load(&self) -> Result<Option<McpConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file {:?}", self.path))?;
        if contents.trim().is_empty() {
            return Ok(Some(McpConfig::default()));
        }
        let config: McpConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;
        Ok(Some(config))
    }

    pub fn save(&self, config: &McpConfig) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write config file {:?}", self.path))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
