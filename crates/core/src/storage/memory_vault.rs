use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use crate::errors::CoreError;

use super::paths;
use super::traits::VaultFs;

#[derive(Debug, Default)]
struct VaultState {
    files: BTreeMap<String, String>,
    folders: BTreeSet<String>,
}

/// A vault held entirely in memory.
///
/// Useful for embedding the core without a host file system and for tests.
#[derive(Debug, Default)]
pub struct MemoryVault {
    state: Mutex<VaultState>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (builder style).
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Create or overwrite a file synchronously.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.files.insert(path.into(), content.into());
        }
    }

    /// Current content of a file, if any.
    pub fn get(&self, path: &str) -> Option<String> {
        self.state.lock().ok()?.files.get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn file_paths(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, VaultState>, CoreError> {
        self.state
            .lock()
            .map_err(|_| CoreError::Storage("Memory vault lock poisoned".into()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl VaultFs for MemoryVault {
    async fn read(&self, path: &str) -> Result<String, CoreError> {
        self.lock()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| CoreError::FileIO(format!("File not found: {path}")))
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), CoreError> {
        self.lock()?.files.insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        match self.state.lock() {
            Ok(state) => state.files.contains_key(path) || state.folders.contains(path),
            Err(_) => false,
        }
    }

    async fn create_folder(&self, path: &str) -> Result<(), CoreError> {
        let mut state = self.lock()?;
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current = paths::join(&current, part);
            state.folders.insert(current.clone());
        }
        Ok(())
    }

    async fn resolve_link(&self, target: &str, source_path: &str) -> Option<String> {
        let state = self.state.lock().ok()?;
        let resolved =
            paths::resolve_among(state.files.keys().map(String::as_str), target, source_path);
        resolved
    }
}
