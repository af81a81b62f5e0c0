use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default pattern string used when the user supplies nothing usable.
pub const DEFAULT_PATTERN_STRING: &str = "*.cs;*.csproj;*.props*;*.md";

/// Name of the collection file managed by the interactive CLI.
pub const DEFAULT_CONTENT_FILENAME: &str = "content.json";

/// Represents the final configuration after merging the settings file and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub patterns: Vec<String>,
    pub content_path: PathBuf,
}

/// One scanned folder: its resolved path and the matched files keyed by base name.
///
/// `files` is never empty; a folder without matches yields no record at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "FilesWithContent")]
    pub files: BTreeMap<String, String>,
}

impl FolderRecord {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Result of scanning several roots.
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<FolderRecord>,
    pub total_files: usize,
}
