use crate::app::models::{Collected, FolderRecord};
use crate::app::patterns::PatternSet;
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Collects matching files below a root into a [`FolderRecord`].
///
/// Patterns are fixed at construction; every scan uses exactly these.
pub struct Scanner {
    patterns: PatternSet,
}

impl Scanner {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: PatternSet::new(patterns),
        }
    }

    /// Scans `root` recursively.
    ///
    /// Returns `None` when `root` is not a directory or nothing matched.
    /// Files are keyed by base name; when two matches share a name, the one
    /// produced later (pattern order, then path order) wins.
    pub fn scan_folder(&self, root: &Path) -> Option<FolderRecord> {
        if !root.is_dir() {
            log::warn!("'{}' is not a directory", root.display());
            return None;
        }
        if self.patterns.is_empty() {
            return None;
        }

        let files = self.walk(root);

        // (pattern index, file) in the order a sequential per-pattern walk would produce.
        let mut hits: Vec<(usize, &PathBuf)> = Vec::new();
        for (path, relative) in &files {
            for idx in self.patterns.matching(relative) {
                hits.push((idx, path));
            }
        }
        hits.sort_by_key(|(idx, _)| *idx);

        // Walk backwards so only the surviving occurrence of each name is read.
        // A file that cannot be read leaves the name to an earlier occurrence.
        let mut files_with_content = BTreeMap::new();
        let mut settled: HashSet<String> = HashSet::new();
        for (_, path) in hits.iter().rev() {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if settled.contains(&name) {
                continue;
            }
            match read_text(path) {
                Ok(content) => {
                    log::debug!("Read {}", path.display());
                    settled.insert(name.clone());
                    files_with_content.insert(name, content);
                }
                Err(err) => log::warn!("Skipping '{}': {}", path.display(), err),
            }
        }

        if files_with_content.is_empty() {
            return None;
        }

        Some(FolderRecord {
            path: resolve_root(root),
            files: files_with_content,
        })
    }

    /// Every regular file below `root` with its root-relative path, sorted by path.
    fn walk(&self, root: &Path) -> Vec<(PathBuf, PathBuf)> {
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        let mut files = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    let path = entry.path();
                    // `is_file` follows symlinks, so links to files count as files.
                    if path == root || !path.is_file() {
                        continue;
                    }
                    if let Some(relative) = diff_paths(path, root) {
                        files.push((path.to_path_buf(), relative));
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        files.sort();
        files
    }
}

/// Scans each root independently and keeps the ones that produced a record.
pub fn collect<P: AsRef<Path>>(roots: &[P], patterns: &[String]) -> Collected {
    let scanner = Scanner::new(patterns);
    let mut collected = Collected::default();

    for root in roots {
        if let Some(record) = scanner.scan_folder(root.as_ref()) {
            collected.total_files += record.file_count();
            collected.records.push(record);
        }
    }

    collected
}

/// Reads a file as UTF-8, falling back to Latin-1 for anything else.
///
/// Line endings are normalized to `\n`.
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_text(bytes))
}

pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::debug!("Content is not UTF-8, decoding as Latin-1");
            err.into_bytes().into_iter().map(char::from).collect()
        }
    };
    normalize_newlines(text)
}

/// `\r\n` and lone `\r` become `\n`.
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// A path to an existing `.csproj` file stands for the project directory holding it.
pub fn normalize_root(raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    let is_project_file = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csproj"));

    if is_project_file && path.is_file() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            return parent.to_path_buf();
        }
        return PathBuf::from(".");
    }
    path
}

/// Absolute form of `root` as written into records.
pub fn resolve_root(root: &Path) -> String {
    let resolved = fs::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf());
    strip_verbatim_prefix(resolved.to_string_lossy().into_owned())
}

/// Drops the `\\?\` prefix Windows canonicalization puts on drive paths.
/// UNC (`\\?\UNC\...`) and other verbatim forms are left alone.
fn strip_verbatim_prefix(path: String) -> String {
    match path.strip_prefix(r"\\?\") {
        Some(rest) if is_drive_path(rest) => rest.to_string(),
        _ => path,
    }
}

fn is_drive_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
