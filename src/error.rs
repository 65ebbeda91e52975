use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Server name is required")]
    MissingName,

    #[error("command is required and must be a non-empty string")]
    MissingCommand,

    #[error("args must be an array of strings")]
    InvalidArgs,

    #[error("env must be an object mapping names to string values")]
    InvalidEnv,

    #[error("Invalid JSON format for environment variables: {0}")]
    InvalidEnvJson(String),

    #[error("JSON parse failed: {0}")]
    MalformedJson(String),

    #[error("No servers found in mcpServers")]
    EmptyServerSet,

    #[error("Server '{name}': {reason}")]
    InvalidServer {
        name: String,
        reason: Box<EditorError>,
    },

    #[error("Server '{0}' not found")]
    ServerNotFound(String),

    #[error("Saved server '{0}' not found")]
    SavedServerNotFound(String),

    #[error("Please select a directory first")]
    NoDirectory,

    #[error("No server is being edited")]
    NotEditing,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl EditorError {
    /// Wrap a failed backend call, keeping the full context chain.
    pub fn backend(err: anyhow::Error) -> Self {
        EditorError::BackendUnavailable(format!("{:#}", err))
    }
}
