//! Storage layer for taskboard
//!
//! Everything lives in one data directory:
//!
//! ```text
//! <data dir>/
//!   .taskboard.toml     # Configuration
//!   tasks.json          # Tasks for the local backend
//!   state.json          # Persisted UI state, keyed by namespace
//!   session.json        # Session cookies from the last login
//! ```
//!
//! The directory is chosen from `--dir`, then `TASKBOARD_DIR`, then the
//! platform data directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = ".taskboard.toml";

/// Fallback directory when no platform data dir is available
pub const LOCAL_DIR: &str = ".taskboard";

/// Storage manager for taskboard state
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `dir` when given, else the platform data directory.
    pub fn resolve(dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            return Self::new(dir);
        }
        let root = ProjectDirs::from("", "", "taskboard")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(LOCAL_DIR));
        Self::new(root)
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.root.join("tasks.json")
    }

    pub fn state_file(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.config_file().exists()
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write JSON atomically (temp file + rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Read JSON, falling back to `T::default()` when the file is missing.
    pub fn read_json_or_default<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }
        self.read_json(path)
    }

    /// Read-modify-write a JSON file under its lock.
    pub fn update_json<T, R, F>(&self, path: &Path, f: F) -> Result<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(lock::lock_path_for(path), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut data: T = self.read_json_or_default(path)?;
        let result = f(&mut data)?;
        self.write_json(path, &data)?;
        Ok(result)
    }

    /// Remove a file if present.
    pub fn remove(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Counter {
        value: u32,
    }

    #[test]
    fn paths_live_under_root() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());

        assert_eq!(storage.config_file(), temp.path().join(".taskboard.toml"));
        assert_eq!(storage.tasks_file(), temp.path().join("tasks.json"));
        assert_eq!(storage.state_file(), temp.path().join("state.json"));
        assert_eq!(storage.session_file(), temp.path().join("session.json"));
    }

    #[test]
    fn resolve_prefers_explicit_dir() {
        let storage = Storage::resolve(Some(PathBuf::from("/tmp/board")));
        assert_eq!(storage.root(), Path::new("/tmp/board"));
    }

    #[test]
    fn json_round_trip_and_default() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("data"));
        let path = storage.state_file();

        let missing: Counter = storage.read_json_or_default(&path).unwrap();
        assert_eq!(missing, Counter::default());

        storage.write_json(&path, &Counter { value: 7 }).unwrap();
        let read_back: Counter = storage.read_json(&path).unwrap();
        assert_eq!(read_back.value, 7);
    }

    #[test]
    fn update_json_persists_changes() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        let path = storage.tasks_file();

        for _ in 0..3 {
            storage
                .update_json(&path, |counter: &mut Counter| {
                    counter.value += 1;
                    Ok(())
                })
                .unwrap();
        }

        let counter: Counter = storage.read_json(&path).unwrap();
        assert_eq!(counter.value, 3);
    }

    #[test]
    fn remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        let path = storage.session_file();

        storage.write_json(&path, &Counter::default()).unwrap();
        assert!(storage.remove(&path).unwrap());
        assert!(!storage.remove(&path).unwrap());
    }
}
