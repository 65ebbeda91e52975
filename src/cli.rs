use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mcpdesk")]
#[command(version, about = "Edit project .mcp.json files and a library of saved MCP servers", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Project directory (defaults to the working directory)
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the project's servers and the saved library
    List,
    /// Print the project's configuration, or one server, as JSON
    Show {
        /// Server name
        name: Option<String>,
    },
    /// Add a server to the project (and the saved library)
    Add {
        /// Server name (taken from --json when omitted)
        #[arg(required_unless_present = "json")]
        name: Option<String>,
        #[command(flatten)]
        fields: ServerFields,
    },
    /// Edit a server in the project
    Edit {
        /// Server name
        name: String,
        #[command(flatten)]
        changes: ServerChanges,
    },
    /// Remove a server from the project
    Remove {
        /// Server name
        name: String,
    },
    /// Replace the project's configuration with a JSON document
    Import {
        /// File to read, or `-` for stdin
        file: PathBuf,
    },
    /// Check the project's configuration
    Validate,
    /// Empty the project's .mcp.json
    Clear,
    /// Manage saved servers
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
    /// Interactive editing session
    Shell,
}

#[derive(Subcommand)]
pub enum SavedCommands {
    /// List saved servers
    List,
    /// Print a saved server as JSON
    Show {
        /// Saved server name
        name: String,
    },
    /// Save a server without touching the project
    Add {
        /// Server name (taken from --json when omitted)
        #[arg(required_unless_present = "json")]
        name: Option<String>,
        #[command(flatten)]
        fields: ServerFields,
    },
    /// Edit a saved server
    Edit {
        /// Saved server name
        name: String,
        #[command(flatten)]
        changes: ServerChanges,
    },
    /// Delete a saved server
    Remove {
        /// Saved server name
        name: String,
    },
    /// Copy a saved server into the project
    Use {
        /// Saved server name
        name: String,
    },
}

#[derive(Args, Clone, Default)]
pub struct ServerFields {
    /// Command to run
    #[arg(long, conflicts_with = "json")]
    pub cmd: Option<String>,
    /// Command argument (repeatable)
    #[arg(long = "arg", allow_hyphen_values = true, conflicts_with = "json")]
    pub args: Vec<String>,
    /// Environment variable (KEY=value format, repeatable)
    #[arg(long, value_parser = parse_env_var, conflicts_with_all = ["json", "env_json"])]
    pub env: Vec<(String, String)>,
    /// Environment variables as a JSON object
    #[arg(long, conflicts_with = "json")]
    pub env_json: Option<String>,
    /// Whole server as JSON ({"mcpServers": {...}} or {name, command, args, env})
    #[arg(long)]
    pub json: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct ServerChanges {
    /// New name
    #[arg(long, conflicts_with = "json")]
    pub rename: Option<String>,
    /// Replace the command
    #[arg(long, conflicts_with = "json")]
    pub cmd: Option<String>,
    /// Replace the arguments (repeatable)
    #[arg(long = "arg", allow_hyphen_values = true, conflicts_with_all = ["json", "clear_args"])]
    pub args: Vec<String>,
    /// Remove all arguments
    #[arg(long, conflicts_with = "json")]
    pub clear_args: bool,
    /// Set an environment variable (KEY=value format, repeatable)
    #[arg(long, value_parser = parse_env_var, conflicts_with_all = ["json", "env_json"])]
    pub env: Vec<(String, String)>,
    /// Replace the environment with a JSON object
    #[arg(long, conflicts_with_all = ["json", "clear_env"])]
    pub env_json: Option<String>,
    /// Remove all environment variables
    #[arg(long, conflicts_with = "json")]
    pub clear_env: bool,
    /// Replace the whole entry with JSON
    #[arg(long)]
    pub json: Option<String>,
}

fn parse_env_var(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}
