use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::record::AssetRecord;

/// File access offered by the host vault (the note-taking app's storage).
///
/// Paths are vault-relative and `/`-separated. Implementations report their
/// own failures as `CoreError::FileIO` or `CoreError::Storage`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait VaultFs: Send + Sync {
    /// Read a whole file.
    async fn read(&self, path: &str) -> Result<String, CoreError>;

    /// Create or overwrite a file.
    async fn write(&self, path: &str, content: &str) -> Result<(), CoreError>;

    /// Whether a file or folder exists at `path`.
    async fn exists(&self, path: &str) -> bool;

    /// Create a folder (and its parents).
    async fn create_folder(&self, path: &str) -> Result<(), CoreError>;

    /// Resolve a wikilink target (`[[target]]`) as seen from `source_path`
    /// to a file path. `None` when nothing matches.
    async fn resolve_link(&self, target: &str, source_path: &str) -> Option<String>;
}

/// The record text format. Decoding turns a record file into an
/// [`AssetRecord`]; encoding writes one back, merging into the existing file
/// text when there is one so keys owned by other tools survive.
pub trait RecordCodec: Send + Sync {
    fn decode(&self, text: &str) -> Result<AssetRecord, CoreError>;

    fn encode(&self, record: &AssetRecord, existing: Option<&str>) -> Result<String, CoreError>;
}

/// Bulk persistence of assets: the three operations the session relies on.
///
/// Every operation may fail; a failure must leave the caller's in-memory
/// state untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AssetStore: Send + Sync {
    /// Load every asset the store knows about, in store order.
    async fn load_all(&self) -> Result<Vec<Asset>, CoreError>;

    /// Insert or replace the asset with `asset.id`.
    async fn save(&self, asset: &Asset) -> Result<(), CoreError>;

    /// Remove the asset with `id` from the collection.
    async fn delete(&self, id: &str) -> Result<(), CoreError>;
}
