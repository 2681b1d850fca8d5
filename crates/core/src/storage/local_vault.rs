use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::CoreError;

use super::paths;
use super::traits::VaultFs;

/// A vault rooted at a directory on the local file system (native only).
///
/// Vault paths are `/`-separated and relative to the root.
#[derive(Debug, Clone)]
pub struct LocalVault {
    root: PathBuf,
}

impl LocalVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|p| !p.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    /// Every file below the root, as vault paths.
    fn list_files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(parts.join("/"))
            })
            .collect();
        files.sort();
        files
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl VaultFs for LocalVault {
    async fn read(&self, path: &str) -> Result<String, CoreError> {
        Ok(std::fs::read_to_string(self.full_path(path))?)
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), CoreError> {
        let full = self.full_path(path);
        if let Some(parent) = full.parent() {
            if !parent.exists() {
                return Err(CoreError::FileIO(format!(
                    "Folder does not exist: {}",
                    paths::parent_folder(path)
                )));
            }
        }
        std::fs::write(full, content)?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.full_path(path).exists()
    }

    async fn create_folder(&self, path: &str) -> Result<(), CoreError> {
        std::fs::create_dir_all(self.full_path(path))?;
        Ok(())
    }

    async fn resolve_link(&self, target: &str, source_path: &str) -> Option<String> {
        let files = self.list_files();
        paths::resolve_among(files.iter().map(String::as_str), target, source_path)
    }
}
