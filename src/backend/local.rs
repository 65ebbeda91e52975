use super::Backend;
use crate::config::{AppConfig, AppConfigStore, McpConfig, ProjectFile};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Asks the user for a project directory.
pub trait DirectoryPicker: Send + Sync {
    fn pick(&self) -> Result<Option<PathBuf>>;
}

/// Filesystem-backed implementation used by the CLI.
pub struct LocalBackend {
    store: AppConfigStore,
    picker: Box<dyn DirectoryPicker>,
}

impl LocalBackend {
    pub fn new(store: AppConfigStore, picker: Box<dyn DirectoryPicker>) -> Self {
        Self { store, picker }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn select_directory(&self) -> Result<Option<PathBuf>> {
        let picked = self.picker.pick()?;
        match picked {
            Some(dir) if !dir.is_dir() => bail!("Not a directory: {:?}", dir),
            Some(dir) => {
                let dir = dir
                    .canonicalize()
                    .with_context(|| format!("Failed to resolve directory {:?}", dir))?;
                Ok(Some(dir))
            }
            None => Ok(None),
        }
    }

    async fn load_app_config(&self) -> Result<AppConfig> {
        debug!(path = ?self.store.path(), "loading app config");
        self.store.load()
    }

    async fn save_app_config(&self, config: &AppConfig) -> Result<()> {
        debug!(path = ?self.store.path(), saved = config.saved_servers.len(), "saving app config");
        self.store.save(config)
    }

    async fn load_mcp_config(&self, directory: &Path) -> Result<Option<McpConfig>> {
        let file = ProjectFile::in_dir(directory);
        debug!(path = ?file.path(), "loading project config");
        file.load()
    }

    async fn save_mcp_config(&self, directory: &Path, config: &McpConfig) -> Result<()> {
        if !directory.is_dir() {
            bail!("Not a directory: {:?}", directory);
        }
        let file = ProjectFile::in_dir(directory);
        debug!(path = ?file.path(), servers = config.len(), "writing project config");
        file.save(config)
    }

    async fn validate_mcp_config(&self, config: &McpConfig) -> Result<()> {
        if config.is_empty() {
            bail!("At least one MCP server must be configured");
        }

        for (name, server) in &config.servers {
            if name.is_empty() {
                bail!("Server name cannot be empty");
            }
            if server.command.is_empty() {
                bail!("Command for server '{}' cannot be empty", name);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerRecord;
    use tempfile::tempdir;

    struct FixedPicker(Option<PathBuf>);

    impl DirectoryPicker for FixedPicker {
        fn pick(&self) -> Result<Option<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    fn backend(dir: &Path, picked: Option<PathBuf>) -> LocalBackend {
        LocalBackend::new(
            AppConfigStore::with_path(dir.join("app").join("config.yaml")),
            Box::new(FixedPicker(picked)),
        )
    }

    #[tokio::test]
    async fn test_project_config_roundtrip() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path(), None);

        assert!(backend.load_mcp_config(dir.path()).await.unwrap().is_none());

        let mut config = McpConfig::default();
        config.servers.insert("fs".into(), ServerRecord::new("npx").with_args(["-y"]));
        backend.save_mcp_config(dir.path(), &config).await.unwrap();

        assert_eq!(backend.load_mcp_config(dir.path()).await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path(), None);
        let missing = dir.path().join("missing");
        assert!(backend
            .save_mcp_config(&missing, &McpConfig::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_select_directory() {
        let dir = tempdir().unwrap();

        let picked = backend(dir.path(), Some(dir.path().to_path_buf()))
            .select_directory()
            .await
            .unwrap();
        assert_eq!(picked, Some(dir.path().canonicalize().unwrap()));

        assert!(backend(dir.path(), None).select_directory().await.unwrap().is_none());
        assert!(backend(dir.path(), Some(dir.path().join("nope")))
            .select_directory()
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_validate_mcp_config() {
        let dir = tempdir().unwrap();
        let backend = backend(dir.path(), None);

        let err = backend
            .validate_mcp_config(&McpConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("At least one"));

        let mut config = McpConfig::default();
        config.servers.insert("a".into(), ServerRecord::new(""));
        let err = backend.validate_mcp_config(&config).await.unwrap_err();
        assert!(err.to_string().contains("'a'"));

        config.servers.insert("a".into(), ServerRecord::new("node"));
        backend.validate_mcp_config(&config).await.unwrap();
    }
}
