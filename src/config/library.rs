use super::ServerRecord;
use serde::{Deserialize, Serialize};

/// User's personal collection of reusable server presets.
///
/// Ordered by insertion; a name appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SavedLibrary {
    entries: Vec<(String, ServerRecord)>,
}

impl SavedLibrary {
    pub fn entries(&self) -> &[(String, ServerRecord)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(saved, _)| saved == name)
    }

    pub fn get(&self, name: &str) -> Option<&ServerRecord> {
        self.entries
            .iter()
            .find(|(saved, _)| saved == name)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert at the end, or overwrite the existing entry in place. Last write wins.
    pub fn upsert(&mut self, name: String, record: ServerRecord) {
        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = record,
            None => self.entries.push((name, record)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ServerRecord> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    /// Drops duplicate names from hand-edited files, keeping the first occurrence.
    pub(crate) fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.entries.retain(|(name, _)| seen.insert(name.clone()));
    }
}

impl FromIterator<(String, ServerRecord)> for SavedLibrary {
    fn from_iter<T: IntoIterator<Item = (String, ServerRecord)>>(iter: T) -> Self {
        let mut library = SavedLibrary::default();
        for (name, record) in iter {
            library.upsert(name, record);
        }
        library
    }
}
