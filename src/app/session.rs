//! Command dispatch for the form and list front-ends.
//!
//! Each user action becomes one [`Command`]; [`Session::handle`] processes it
//! synchronously and reports an [`Outcome`] for the front-end to display.

use crate::app::formatter::OutputGenerator;
use crate::app::models::{FolderRecord, DEFAULT_PATTERN_STRING};
use crate::app::patterns::parse_patterns_or_default;
use crate::app::scanner::{collect, normalize_root};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddRoot(String),
    RemoveRoot(String),
    SetPatterns(String),
    Generate,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted(String),
    Rejected(String),
    Info(String),
    Generated {
        json: String,
        folders: usize,
        files: usize,
    },
}

pub struct Session {
    roots: Vec<String>,
    pattern_string: String,
    collection: Vec<FolderRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            pattern_string: DEFAULT_PATTERN_STRING.to_string(),
            collection: Vec::new(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn collection(&self) -> &[FolderRecord] {
        &self.collection
    }

    pub fn pattern_string(&self) -> &str {
        &self.pattern_string
    }

    pub fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::AddRoot(raw) => self.add_root(&raw),
            Command::RemoveRoot(path) => self.remove_root(&path),
            Command::SetPatterns(raw) => {
                self.pattern_string = raw;
                Outcome::Accepted(format!("Patterns: {}", self.pattern_string))
            }
            Command::Generate => self.generate(),
            Command::Clear => {
                self.collection.clear();
                Outcome::Accepted("Cleared".to_string())
            }
        }
    }

    fn add_root(&mut self, raw: &str) -> Outcome {
        let raw = raw.trim();
        if raw.is_empty() {
            return Outcome::Rejected("Path cannot be empty.".to_string());
        }

        let root = normalize_root(raw);
        let root_str = root.to_string_lossy().into_owned();

        if self.roots.contains(&root_str) {
            return Outcome::Rejected(format!("'{}' already exists.", root_str));
        }
        if !root.is_dir() {
            return Outcome::Rejected(format!("'{}' is not a directory.", raw));
        }

        self.roots.push(root_str.clone());
        Outcome::Accepted(format!("Added: {}", root_str))
    }

    fn remove_root(&mut self, path: &str) -> Outcome {
        match self.roots.iter().position(|r| r == path) {
            Some(idx) => {
                self.roots.remove(idx);
                Outcome::Accepted(format!("Removed: {}", path))
            }
            None => Outcome::Rejected(format!("Not found: {}", path)),
        }
    }

    fn generate(&mut self) -> Outcome {
        if self.roots.is_empty() {
            return Outcome::Info("No paths to process.".to_string());
        }

        let patterns = parse_patterns_or_default(&self.pattern_string, DEFAULT_PATTERN_STRING);
        let collected = collect(&self.roots, &patterns);
        if collected.records.is_empty() {
            return Outcome::Info("No matching files found.".to_string());
        }

        let folders = collected.records.len();
        self.collection.extend(collected.records);

        match OutputGenerator::render_json(&self.collection) {
            Ok(json) => Outcome::Generated {
                json,
                folders,
                files: collected.total_files,
            },
            Err(err) => {
                log::error!("{:#}", err);
                Outcome::Rejected(format!("Failed to render JSON: {:#}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn rejects_empty_duplicate_and_missing_roots() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap().to_string();
        let mut session = Session::new();

        assert!(matches!(
            session.handle(Command::AddRoot("   ".into())),
            Outcome::Rejected(_)
        ));
        assert!(matches!(
            session.handle(Command::AddRoot(root.clone())),
            Outcome::Accepted(_)
        ));
        assert!(matches!(
            session.handle(Command::AddRoot(format!("  {}  ", root))),
            Outcome::Rejected(_)
        ));
        assert!(matches!(
            session.handle(Command::AddRoot(format!("{}/missing", root))),
            Outcome::Rejected(_)
        ));
        assert_eq!(session.roots(), &[root]);
    }

    #[test]
    fn remove_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap().to_string();
        let mut session = Session::new();
        session.handle(Command::AddRoot(root.clone()));

        assert!(matches!(
            session.handle(Command::RemoveRoot(root.clone())),
            Outcome::Accepted(_)
        ));
        assert!(matches!(
            session.handle(Command::RemoveRoot(root)),
            Outcome::Rejected(_)
        ));
        assert!(session.roots().is_empty());
    }

    #[test]
    fn generate_without_roots_is_informational() {
        let mut session = Session::new();
        assert_eq!(
            session.handle(Command::Generate),
            Outcome::Info("No paths to process.".to_string())
        );
    }

    #[test]
    fn generate_accumulates_until_cleared() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Foo.cs"), "class Foo{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        let mut session = Session::new();
        session.handle(Command::AddRoot(dir.path().to_str().unwrap().into()));

        match session.handle(Command::Generate) {
            Outcome::Generated { folders, files, json } => {
                assert_eq!((folders, files), (1, 1));
                assert!(json.contains("class Foo{}"));
                assert!(!json.contains("skip"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        session.handle(Command::Generate);
        assert_eq!(session.collection().len(), 2);

        session.handle(Command::Clear);
        assert!(session.collection().is_empty());
        assert_eq!(session.roots().len(), 1);
    }

    #[test]
    fn blank_patterns_fall_back_to_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "# hi").unwrap();
        let mut session = Session::new();
        session.handle(Command::AddRoot(dir.path().to_str().unwrap().into()));
        session.handle(Command::SetPatterns(" ; ".into()));

        assert!(matches!(
            session.handle(Command::Generate),
            Outcome::Generated { files: 1, .. }
        ));
    }

    #[test]
    fn custom_patterns_narrow_the_scan() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "# hi").unwrap();
        let mut session = Session::new();
        session.handle(Command::AddRoot(dir.path().to_str().unwrap().into()));
        session.handle(Command::SetPatterns("*.cs".into()));

        assert_eq!(
            session.handle(Command::Generate),
            Outcome::Info("No matching files found.".to_string())
        );
    }
}
