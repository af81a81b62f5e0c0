use crate::app::formatter::OutputGenerator;
use crate::app::models::FolderRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads the raw entries of a persisted collection.
///
/// Anything short of a readable JSON array counts as "start fresh": missing,
/// empty, unparseable or non-array files all yield an empty collection.
/// Elements are returned untouched, whatever their shape.
pub fn load_entries(path: &Path) -> Vec<Value> {
    if !path.exists() {
        log::info!("'{}' does not exist yet, starting a new collection", path.display());
        return Vec::new();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("Cannot read '{}': {}. Starting a new collection", path.display(), err);
            return Vec::new();
        }
    };

    if content.trim().is_empty() {
        log::info!("'{}' is empty, starting a new collection", path.display());
        return Vec::new();
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => {
            log::info!("Loaded {} existing entries from '{}'", items.len(), path.display());
            items
        }
        Ok(_) => {
            log::warn!(
                "Expected a JSON array in '{}', found another value. Starting a new collection",
                path.display()
            );
            Vec::new()
        }
        Err(err) => {
            log::warn!("Invalid JSON in '{}': {}. Starting a new collection", path.display(), err);
            Vec::new()
        }
    }
}

/// Loads a persisted collection as folder records.
///
/// Same tolerance as [`load_entries`]; elements that are not folder records
/// are left out of the result.
pub fn load_collection(path: &Path) -> Vec<FolderRecord> {
    load_entries(path)
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                log::debug!("Entry #{} of '{}' is not a folder record: {}", idx, path.display(), err);
                None
            }
        })
        .collect()
}

/// Writes the whole collection as indented JSON (temp file + rename).
///
/// The temp file is removed again when the write or the rename fails.
pub fn save_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let json = OutputGenerator::render_json(records)?;

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let written = fs::write(&temp_path, json)
        .with_context(|| format!("Failed to write temp file {:?}", temp_path))
        .and_then(|()| {
            fs::rename(&temp_path, path)
                .with_context(|| format!("Failed to move temp file into place at {:?}", path))
        });

    if written.is_err() && temp_path.exists() {
        if let Err(err) = fs::remove_file(&temp_path) {
            log::warn!("Failed to remove temp file {:?}: {}", temp_path, err);
        }
    }
    written?;

    log::debug!("Saved {} entries to '{}'", records.len(), path.display());
    Ok(())
}

/// A persisted, append-only collection.
///
/// Entries loaded from disk are kept as raw JSON and written back unchanged,
/// so hand-edited or foreign entries survive an append.
pub struct CollectionStore {
    path: PathBuf,
    entries: Vec<Value>,
}

impl CollectionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends one record and rewrites the whole file.
    ///
    /// On a failed save the record stays in memory and goes out with the next one.
    pub fn append(&mut self, record: FolderRecord) -> Result<()> {
        let entry = serde_json::to_value(record).context("Failed to serialize folder record")?;
        self.entries.push(entry);
        save_collection(&self.path, &self.entries)
    }
}
