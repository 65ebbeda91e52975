use crate::backend::DirectoryPicker;
use crate::editor::Confirm;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input};
use std::path::PathBuf;
use tracing::warn;

/// Terminal confirmation; `--yes` answers every prompt up front.
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match dialoguer::Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!("cannot prompt for confirmation ({}); pass --yes to confirm", err);
                false
            }
        }
    }
}

/// Reads a directory path from the terminal. A blank answer cancels.
pub struct TerminalPicker;

impl DirectoryPicker for TerminalPicker {
    fn pick(&self) -> Result<Option<PathBuf>> {
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Project directory")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read directory from terminal")?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(answer)))
    }
}
