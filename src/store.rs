// src/store.rs
// Whole-dataset persistence under the local store directory. The dataset is
// read-modify-written as a unit; the write goes through a sibling temp file
// and a rename so a crash never leaves a half-written store behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::consts::{DATA_FILE, STORE_DIR};
use crate::records::Dataset;

pub fn default_path() -> PathBuf {
    PathBuf::from(STORE_DIR).join(DATA_FILE)
}

/// Load the persisted dataset. No file yet reads as the empty dataset with
/// `lastSync = 0`; a file that exists but does not parse is a real failure.
pub fn load() -> io::Result<Dataset> {
    load_from(&default_path())
}

pub fn load_from(path: &Path) -> io::Result<Dataset> {
    if !path.exists() {
        return Ok(Dataset::default());
    }
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn save(data: &Dataset) -> io::Result<()> {
    save_to(&default_path(), data)
}

pub fn save_to(path: &Path, data: &Dataset) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut text = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    text.push('\n');

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Task;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("close_data.json");
        let ds = load_from(&path).unwrap();
        assert_eq!(ds, Dataset::default());
        assert_eq!(ds.last_sync, 0);
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("close_data.json");

        let mut ds = Dataset::default();
        ds.last_sync = 1234;
        ds.tasks.push(Task {
            id: s!("id_9"),
            description: s!("Call"),
            assignee: s!("Ann"),
            due_date: None,
            done: true,
        });

        save_to(&path, &ds).unwrap();
        let back = load_from(&path).unwrap();
        assert_eq!(back, ds);
        // No temp file left behind.
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_failure_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("close_data.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_from(&path).is_err());
    }
}
