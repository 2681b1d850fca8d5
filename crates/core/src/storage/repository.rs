use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use regex::Regex;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::record::AssetRecord;
use crate::models::settings::Settings;

use super::paths;
use super::traits::{AssetStore, RecordCodec, VaultFs};

/// Asset persistence on top of a host vault.
///
/// Layout:
/// - an entry file (`Settings::entry_file`) listing every asset as a wikilink
///   `[[id]]` or `[[id|alias]]`, in display order,
/// - one record file per asset, found by resolving its link; new records go
///   next to the entry file as `<id>.md`.
///
/// Deleting an asset only unlinks it from the entry file; the record file
/// stays in the vault.
pub struct AssetRepository<V: VaultFs, C: RecordCodec> {
    vault: V,
    codec: C,
    entry_file: String,
    assets_folder: String,
    default_icon: String,
}

impl<V: VaultFs, C: RecordCodec> AssetRepository<V, C> {
    pub fn new(vault: V, codec: C, settings: &Settings) -> Self {
        Self {
            vault,
            codec,
            entry_file: settings.entry_file.clone(),
            assets_folder: settings.assets_folder(),
            default_icon: settings.default_icon.clone(),
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn entry_file(&self) -> &str {
        &self.entry_file
    }

    /// Link targets in the entry file, in order, aliases stripped.
    pub fn link_targets(content: &str) -> Vec<String> {
        let Ok(re) = Regex::new(r"\[\[([^\]]+)\]\]") else {
            return Vec::new();
        };
        re.captures_iter(content)
            .filter_map(|caps| {
                let inner = caps.get(1)?.as_str();
                let target = inner.split('|').next()?.trim();
                (!target.is_empty()).then(|| target.to_string())
            })
            .collect()
    }

    fn link_pattern(id: &str) -> Result<Regex, CoreError> {
        Regex::new(&format!(r"\[\[{}(\|[^\]]+)?\]\]", regex::escape(id)))
            .map_err(|e| CoreError::Storage(format!("Invalid link pattern for '{id}': {e}")))
    }

    /// Add (`link = true`) or remove every link to `id` in the entry file.
    async fn update_entry_file(&self, id: &str, link: bool) -> Result<(), CoreError> {
        let mut content = if self.vault.exists(&self.entry_file).await {
            self.vault.read(&self.entry_file).await?
        } else {
            String::new()
        };

        let pattern = Self::link_pattern(id)?;
        if link {
            if !pattern.is_match(&content) {
                content.push_str(&format!("\n[[{id}]]"));
            }
        } else {
            content = pattern.replace_all(&content, "").into_owned();
            let blank_runs = Regex::new(r"\n{3,}")
                .map_err(|e| CoreError::Storage(format!("Invalid blank-line pattern: {e}")))?;
            content = blank_runs
                .replace_all(&content, "\n\n")
                .trim_end()
                .to_string();
        }

        self.vault.write(&self.entry_file, &content).await
    }

    async fn load_one(&self, target: &str) -> Result<Option<Asset>, CoreError> {
        let Some(path) = self.vault.resolve_link(target, &self.entry_file).await else {
            warn!("Skipping unresolvable asset link [[{target}]]");
            return Ok(None);
        };
        let text = self.vault.read(&path).await?;
        let record = self.codec.decode(&text)?;

        let id = match paths::basename(&path) {
            "" => target,
            name => name,
        };
        Ok(Some(record.into_asset(id, &self.default_icon, Utc::now())))
    }

    /// Write a new record file and return the link target it is reachable by.
    ///
    /// When `<id>.md` cannot be written the file is created under a
    /// percent-encoded name instead; the returned target is then that encoded
    /// name, which also becomes the asset's id on the next load.
    async fn create_record(&self, asset: &Asset, text: &str) -> Result<String, CoreError> {
        if !self.vault.exists(&self.assets_folder).await {
            self.vault.create_folder(&self.assets_folder).await?;
        }

        let path = paths::join(&self.assets_folder, &format!("{}.md", asset.id));
        match self.vault.write(&path, text).await {
            Ok(()) => Ok(asset.id.clone()),
            Err(e) => {
                let encoded_id = paths::encode_file_name(&asset.id);
                let encoded = paths::join(&self.assets_folder, &format!("{encoded_id}.md"));
                warn!("Could not create {path} ({e}); retrying as {encoded}");
                self.vault.write(&encoded, text).await?;
                warn!("Asset {} is stored and linked as [[{encoded_id}]]", asset.id);
                Ok(encoded_id)
            }
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<V: VaultFs, C: RecordCodec> AssetStore for AssetRepository<V, C> {
    /// Load every linked asset. A missing entry file means an empty
    /// collection; a record that cannot be read or decoded is skipped.
    async fn load_all(&self) -> Result<Vec<Asset>, CoreError> {
        if !self.vault.exists(&self.entry_file).await {
            return Ok(Vec::new());
        }
        let content = self.vault.read(&self.entry_file).await?;

        let mut assets = Vec::new();
        for target in Self::link_targets(&content) {
            match self.load_one(&target).await {
                Ok(Some(asset)) => assets.push(asset),
                Ok(None) => {}
                Err(e) => warn!("Failed to load asset [[{target}]]: {e}"),
            }
        }
        info!("Loaded {} assets from {}", assets.len(), self.entry_file);
        Ok(assets)
    }

    async fn save(&self, asset: &Asset) -> Result<(), CoreError> {
        let record = AssetRecord::from(asset);

        let target = match self.vault.resolve_link(&asset.id, &self.entry_file).await {
            Some(path) => {
                let existing = self.vault.read(&path).await?;
                let text = self.codec.encode(&record, Some(&existing))?;
                self.vault.write(&path, &text).await?;
                asset.id.clone()
            }
            None => {
                let text = self.codec.encode(&record, None)?;
                self.create_record(asset, &text).await?
            }
        };

        self.update_entry_file(&target, true).await?;
        info!("Saved asset {}", asset.id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.update_entry_file(id, false).await?;
        info!("Unlinked asset {id}");
        Ok(())
    }
}
