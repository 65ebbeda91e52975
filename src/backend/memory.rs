use super::Backend;
use crate::config::{AppConfig, McpConfig};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct MemoryState {
    pub app_config: AppConfig,
    pub projects: HashMap<PathBuf, McpConfig>,
    pub picked_directory: Option<PathBuf>,
    pub app_saves: usize,
    pub mcp_saves: Vec<(PathBuf, McpConfig)>,
    pub fail_app_load: bool,
    pub fail_app_saves: bool,
    pub invalid_reason: Option<String>,
}

/// In-memory backend; clones share state so tests can inspect what was persisted.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select_directory(&self) -> Result<Option<PathBuf>> {
        Ok(self.state().picked_directory.clone())
    }

    async fn load_app_config(&self) -> Result<AppConfig> {
        let state = self.state();
        if state.fail_app_load {
            bail!("Failed to parse app config YAML");
        }
        Ok(state.app_config.clone())
    }

    async fn save_app_config(&self, config: &AppConfig) -> Result<()> {
        let mut state = self.state();
        if state.fail_app_saves {
            bail!("disk full");
        }
        state.app_config = config.clone();
        state.app_saves += 1;
        Ok(())
    }

    async fn load_mcp_config(&self, directory: &Path) -> Result<Option<McpConfig>> {
        Ok(self.state().projects.get(directory).cloned())
    }

    async fn save_mcp_config(&self, directory: &Path, config: &McpConfig) -> Result<()> {
        let mut state = self.state();
        state.projects.insert(directory.to_path_buf(), config.clone());
        state.mcp_saves.push((directory.to_path_buf(), config.clone()));
        Ok(())
    }

    async fn validate_mcp_config(&self, _config: &McpConfig) -> Result<()> {
        match &self.state().invalid_reason {
            Some(reason) => bail!("{}", reason),
            None => Ok(()),
        }
    }
}
