use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Builds a scratch folder tree for scanning.
pub struct TreeBuilder {
    dir: TempDir,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn file(self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        self
    }

    pub fn build(self) -> TempDir {
        self.dir
    }
}

pub fn patterns(raw: &str) -> Vec<String> {
    folder_content::app::patterns::parse_patterns(raw)
}

pub fn canonical(path: &Path) -> String {
    folder_content::app::scanner::resolve_root(path)
}
