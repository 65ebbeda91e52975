use crate::config::{AppConfig, McpConfig};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Everything the editor needs from the outside world: a directory picker,
/// persistence for both config files, and semantic validation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `None` when the user cancels the picker.
    async fn select_directory(&self) -> Result<Option<PathBuf>>;

    async fn load_app_config(&self) -> Result<AppConfig>;

    async fn save_app_config(&self, config: &AppConfig) -> Result<()>;

    /// `None` when the directory has no `.mcp.json` yet.
    async fn load_mcp_config(&self, directory: &Path) -> Result<Option<McpConfig>>;

    async fn save_mcp_config(&self, directory: &Path, config: &McpConfig) -> Result<()>;

    async fn validate_mcp_config(&self, config: &McpConfig) -> Result<()>;
}
