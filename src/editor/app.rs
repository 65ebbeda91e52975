use super::{config_to_json_text, json_text_to_config, Confirm, EditSession, ServerEditor};
use crate::backend::Backend;
use crate::config::{validate_name, AppConfig, McpConfig, SavedLibrary, ServerRecord};
use crate::error::EditorError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CLEAR_FILE_PROMPT: &str =
    "No MCP servers are configured. Clear the contents of .mcp.json?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(usize),
    Cleared,
    Cancelled,
}

/// Editor state for one run: the open project's servers, the saved library,
/// and the edit in progress. Holds no presentation state.
pub struct App {
    backend: Box<dyn Backend>,
    directory: Option<PathBuf>,
    current: McpConfig,
    library: SavedLibrary,
    last_directory: Option<PathBuf>,
    session: EditSession,
    editor: Option<ServerEditor>,
    /// Set once the app config has been read; nothing is written back before that.
    app_config_loaded: bool,
}

impl App {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            directory: None,
            current: McpConfig::default(),
            library: SavedLibrary::default(),
            last_directory: None,
            session: EditSession::Idle,
            editor: None,
            app_config_loaded: false,
        }
    }

    /// Load the saved library and last used directory.
    ///
    /// On failure the app keeps working with an empty library, but the stored
    /// config is left as it is on disk.
    pub async fn init(&mut self) -> Result<(), EditorError> {
        let config = self
            .backend
            .load_app_config()
            .await
            .map_err(EditorError::backend)?;
        debug!(saved = config.saved_servers.len(), "app config loaded");
        self.library = config.saved_servers;
        self.last_directory = config.last_directory;
        self.app_config_loaded = true;
        Ok(())
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn last_directory(&self) -> Option<&Path> {
        self.last_directory.as_deref()
    }

    pub fn current(&self) -> &McpConfig {
        &self.current
    }

    pub fn library(&self) -> &SavedLibrary {
        &self.library
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn editor(&self) -> Option<&ServerEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut ServerEditor> {
        self.editor.as_mut()
    }

    pub fn current_json_text(&self) -> String {
        config_to_json_text(&self.current)
    }

    /// Ask the backend for a directory and open it. `None` means the user cancelled.
    pub async fn select_directory(&mut self) -> Result<Option<PathBuf>, EditorError> {
        let picked = self
            .backend
            .select_directory()
            .await
            .map_err(EditorError::backend)?;
        if let Some(dir) = &picked {
            self.open_directory(dir.clone()).await?;
        }
        Ok(picked)
    }

    /// Replace the current configuration with the directory's `.mcp.json`.
    /// Returns whether a file existed.
    pub async fn open_directory(&mut self, directory: PathBuf) -> Result<bool, EditorError> {
        let loaded = self
            .backend
            .load_mcp_config(&directory)
            .await
            .map_err(EditorError::backend)?;

        let found = loaded.is_some();
        // An open edit refers to entries of the previous project.
        self.cancel();
        match loaded {
            Some(config) => self.current = config,
            None => self.clear_current(),
        }
        info!(directory = ?directory, servers = self.current.len(), found, "opened project");

        self.directory = Some(directory.clone());
        self.last_directory = Some(directory);
        if let Err(err) = self.persist_app_config().await {
            warn!("could not remember last directory: {}", err);
        }
        Ok(found)
    }

    pub fn clear_current(&mut self) {
        self.current = McpConfig::default();
    }

    /// Insert or overwrite a server in the current configuration.
    pub fn add_current(&mut self, name: String, record: ServerRecord) -> Result<(), EditorError> {
        validate_name(&name)?;
        record.validate()?;
        self.current.servers.insert(name, record);
        Ok(())
    }

    pub fn remove_current(&mut self, name: &str) -> Option<ServerRecord> {
        self.current.servers.remove(name)
    }

    pub async fn add_saved(&mut self, name: String, record: ServerRecord) -> Result<(), EditorError> {
        validate_name(&name)?;
        record.validate()?;
        self.library.upsert(name, record);
        self.persist_app_config().await
    }

    /// Replace the saved entry `original`, possibly under a new name.
    pub async fn update_saved(
        &mut self,
        original: &str,
        name: String,
        record: ServerRecord,
    ) -> Result<(), EditorError> {
        validate_name(&name)?;
        record.validate()?;
        self.reconcile_saved(original, name, record);
        self.persist_app_config().await
    }

    pub async fn remove_saved(&mut self, name: &str) -> Result<Option<ServerRecord>, EditorError> {
        let removed = self.library.remove(name);
        if removed.is_some() {
            self.persist_app_config().await?;
        }
        Ok(removed)
    }

    /// Copy a saved preset into the current configuration. The copy is independent.
    pub fn copy_saved_to_current(&mut self, name: &str) -> Result<(), EditorError> {
        let record = self
            .library
            .get(name)
            .cloned()
            .ok_or_else(|| EditorError::SavedServerNotFound(name.to_string()))?;
        self.add_current(name.to_string(), record)
    }

    pub fn begin_create(&mut self) -> &mut ServerEditor {
        self.session = EditSession::Idle;
        self.editor.insert(ServerEditor::blank())
    }

    pub fn begin_edit_current(&mut self, name: &str) -> Result<&mut ServerEditor, EditorError> {
        let record = self
            .current
            .servers
            .get(name)
            .ok_or_else(|| EditorError::ServerNotFound(name.to_string()))?;
        let editor = ServerEditor::for_record(name, record);
        self.session = EditSession::EditingCurrent(name.to_string());
        Ok(self.editor.insert(editor))
    }

    pub fn begin_edit_saved(&mut self, name: &str) -> Result<&mut ServerEditor, EditorError> {
        let record = self
            .library
            .get(name)
            .ok_or_else(|| EditorError::SavedServerNotFound(name.to_string()))?;
        let editor = ServerEditor::for_record(name, record);
        self.session = EditSession::EditingSaved(name.to_string());
        Ok(self.editor.insert(editor))
    }

    /// Discard the edit in progress.
    pub fn cancel(&mut self) {
        self.session = EditSession::Idle;
        self.editor = None;
    }

    /// Resolve the open editor's active view and commit it.
    pub async fn submit(&mut self) -> Result<String, EditorError> {
        let (name, record) = self
            .editor
            .as_ref()
            .ok_or(EditorError::NotEditing)?
            .resolve()?;
        self.submit_record(name.clone(), record).await?;
        Ok(name)
    }

    /// Apply an edit against the collection the session points at.
    ///
    /// On a validation error nothing changes. If persisting the library fails the
    /// collections keep the edit and the session stays open; submitting again is safe.
    pub async fn submit_record(&mut self, name: String, record: ServerRecord) -> Result<(), EditorError> {
        validate_name(&name)?;
        record.validate()?;

        match self.session.clone() {
            EditSession::Idle => {
                self.current.servers.insert(name.clone(), record.clone());
                self.library.upsert(name, record);
            }
            EditSession::EditingCurrent(original) => {
                if original != name {
                    self.current.servers.remove(&original);
                }
                self.current.servers.insert(name.clone(), record.clone());
                self.library.upsert(name, record);
            }
            EditSession::EditingSaved(original) => {
                self.reconcile_saved(&original, name, record);
            }
        }

        self.persist_app_config().await?;
        self.cancel();
        Ok(())
    }

    fn reconcile_saved(&mut self, original: &str, name: String, record: ServerRecord) {
        if original != name {
            self.library.remove(original);
        }
        self.library.upsert(name, record);
    }

    /// Replace the current configuration with a whole document and remember
    /// every entry in the saved library.
    pub async fn apply_config_json(&mut self, text: &str) -> Result<usize, EditorError> {
        let config = json_text_to_config(text)?;
        for (name, record) in &config.servers {
            self.library.upsert(name.clone(), record.clone());
        }
        let count = config.len();
        self.cancel();
        self.current = config;
        self.persist_app_config().await?;
        Ok(count)
    }

    pub async fn validate_current(&self) -> Result<(), EditorError> {
        if self.current.is_empty() {
            return Err(EditorError::EmptyServerSet);
        }
        self.backend
            .validate_mcp_config(&self.current)
            .await
            .map_err(|e| EditorError::ValidationFailed(format!("{:#}", e)))
    }

    /// Write the current configuration to the open directory. With no servers the
    /// user must agree to clearing the file first.
    pub async fn save_current(&mut self, confirm: &mut dyn Confirm) -> Result<SaveOutcome, EditorError> {
        let directory = self.directory.clone().ok_or(EditorError::NoDirectory)?;

        if self.current.is_empty() {
            if !confirm.confirm(CLEAR_FILE_PROMPT) {
                return Ok(SaveOutcome::Cancelled);
            }
            self.write_project(&directory, &McpConfig::default()).await?;
            return Ok(SaveOutcome::Cleared);
        }

        self.write_project(&directory, &self.current).await?;
        Ok(SaveOutcome::Saved(self.current.len()))
    }

    async fn write_project(&self, directory: &Path, config: &McpConfig) -> Result<(), EditorError> {
        self.backend
            .save_mcp_config(directory, config)
            .await
            .map_err(|e| {
                warn!("failed to write project config: {:#}", e);
                EditorError::backend(e)
            })?;
        info!(directory = ?directory, servers = config.len(), "project config written");
        Ok(())
    }

    async fn persist_app_config(&self) -> Result<(), EditorError> {
        if !self.app_config_loaded {
            warn!("app config was not loaded; not overwriting it");
            return Ok(());
        }
        let config = AppConfig {
            saved_servers: self.library.clone(),
            last_directory: self.last_directory.clone(),
        };
        self.backend
            .save_app_config(&config)
            .await
            .map_err(|e| {
                warn!("failed to save app config: {:#}", e);
                EditorError::backend(e)
            })?;
        debug!(saved = self.library.len(), "app config saved");
        Ok(())
    }
}
