/// What the server editor is currently bound to.
///
/// `Idle` doubles as "creating a new server": submitting from it inserts a
/// fresh entry rather than replacing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    /// Editing the live entry with this name in the current configuration.
    EditingCurrent(String),
    /// Editing the saved preset originally stored under this name.
    EditingSaved(String),
}

impl EditSession {
    pub fn is_saved(&self) -> bool {
        matches!(self, EditSession::EditingSaved(_))
    }
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
