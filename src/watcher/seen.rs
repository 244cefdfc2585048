//! Persisted record of descriptor files the watcher already handled.
//!
//! The log is a plain-text file with one file name per line, rewritten in
//! sorted order on every save. Names are only ever added.

use std::{
    collections::BTreeSet,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, error};

use crate::error::{Result, ScaffoldError};

/// Set of processed descriptor file names backed by a log file.
#[derive(Clone, Debug)]
pub struct SeenFiles {
    path: PathBuf,
    names: BTreeSet<String>,
}

impl SeenFiles {
    /// Load the seen set from `path`.
    ///
    /// A missing log yields an empty set. An unreadable log is reported and
    /// also yields an empty set, so the watcher can keep running.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let names = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => {
                error!(path = %path.display(), "Error reading seen files log: {e}");
                BTreeSet::new()
            }
        };

        debug!(path = %path.display(), count = names.len(), "Loaded seen files");
        Self { path, names }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Record a file name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Write the set to its log file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Io`] if the log cannot be written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
        }

        let content = self.iter().collect::<Vec<_>>().join("\n");
        fs::write(&self.path, content).map_err(|e| ScaffoldError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_log_is_empty() {
        let temp = TempDir::new().unwrap();
        let seen = SeenFiles::load(temp.path().join("seen.txt"));

        assert!(seen.is_empty());
    }

    #[test]
    fn test_save_writes_sorted_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs/seen.txt");

        let mut seen = SeenFiles::load(&path);
        assert!(seen.insert("b.json"));
        assert!(seen.insert("a.json"));
        assert!(!seen.insert("a.json"));
        seen.save().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a.json\nb.json");
    }

    #[test]
    fn test_round_trip_through_log() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seen.txt");
        fs::write(&path, "one.json\n\ntwo.json\n").unwrap();

        let seen = SeenFiles::load(&path);

        assert_eq!(seen.len(), 2);
        assert!(seen.contains("one.json"));
        assert!(seen.contains("two.json"));
    }

    #[test]
    fn test_names_keep_surrounding_whitespace() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("seen.txt");

        let mut seen = SeenFiles::load(&path);
        seen.insert(" leading.json");
        seen.insert("trailing.json ");
        seen.save().unwrap();

        let reloaded = SeenFiles::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(" leading.json"));
        assert!(reloaded.contains("trailing.json "));
        assert!(!reloaded.contains("leading.json"));
    }
}
