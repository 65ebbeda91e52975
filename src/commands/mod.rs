mod fields;
pub mod notify;
mod prompt;
mod saved;
mod server;
mod shell;

pub use fields::*;
pub use prompt::*;
pub use saved::*;
pub use server::*;
pub use shell::*;

use crate::cli::OutputFormat;
use crate::config::ServerRecord;
use crate::editor::App;
use anyhow::{bail, Context as _, Result};
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const COMMAND_WIDTH: usize = 56;

/// Options shared by every command.
pub struct Context {
    pub format: OutputFormat,
    pub dir: Option<PathBuf>,
    pub yes: bool,
}

impl Context {
    pub fn prompter(&self) -> PromptConfirm {
        PromptConfirm::new(self.yes)
    }

    /// `--dir`, else the working directory.
    pub fn project_dir(&self) -> Result<PathBuf> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        if !dir.is_dir() {
            bail!("Not a directory: {:?}", dir);
        }
        dir.canonicalize()
            .with_context(|| format!("Failed to resolve directory {:?}", dir))
    }
}

pub async fn open_project(app: &mut App, ctx: &Context) -> Result<()> {
    let dir = ctx.project_dir()?;
    app.open_directory(dir).await?;
    Ok(())
}

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "COMMAND")]
    command: String,
    #[tabled(rename = "ENV")]
    env: String,
}

pub fn render_servers<'a>(servers: impl IntoIterator<Item = (&'a String, &'a ServerRecord)>) -> String {
    let rows = servers.into_iter().map(|(name, record)| ServerRow {
        name: name.clone(),
        command: textwrap::fill(&record.display_command(), COMMAND_WIDTH),
        env: record.env.keys().cloned().collect::<Vec<_>>().join(", "),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_servers() {
        let records = [
            ("fs".to_string(), ServerRecord::new("npx").with_args(["-y", "pkg"])),
            ("gh".to_string(), ServerRecord::new("docker").with_env([("TOKEN", "t")])),
        ];
        let table = render_servers(records.iter().map(|(n, r)| (n, r)));
        assert!(table.contains("NAME"));
        assert!(table.contains("npx -y pkg"));
        assert!(table.contains("TOKEN"));
        assert!(!table.contains("\"t\""));
    }
}
