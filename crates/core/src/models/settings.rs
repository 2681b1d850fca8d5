use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::filter::SortMode;

/// UI language preference. The core never localizes; it only carries the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Auto,
    Zh,
    En,
}

/// User-configurable plugin settings.
///
/// Passed explicitly into [`crate::CostSet::new`]; the core never looks
/// settings up from a host-wide registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Icon used when a record has none
    pub default_icon: String,

    /// Vault path of the entry file that links every asset record
    pub entry_file: String,

    /// Whether the host offers an "open with CostSet" context menu entry
    pub enable_context_menu: bool,

    /// Sort mode the list view starts with
    pub default_sort: SortMode,

    pub locale: Locale,

    /// Coarse trend samples (phase 1)
    pub trend_base_samples: usize,

    /// Interior samples inserted per coarse segment (phase 2)
    pub trend_refine_samples: usize,

    /// How long the host should wait after the coarse render before refining
    pub refine_delay_ms: u64,
}

impl Settings {
    pub fn refine_delay(&self) -> Duration {
        Duration::from_millis(self.refine_delay_ms)
    }

    /// Folder holding the asset records: the entry file's parent, or `assets`.
    pub fn assets_folder(&self) -> String {
        match self.entry_file.rsplit_once('/') {
            Some((parent, _)) if !parent.is_empty() => parent.to_string(),
            _ => "assets".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_icon: "📦".to_string(),
            entry_file: "LaC/CostSet/costset.md".to_string(),
            enable_context_menu: true,
            default_sort: SortMode::None,
            locale: Locale::Auto,
            trend_base_samples: 30,
            trend_refine_samples: 30,
            refine_delay_ms: 500,
        }
    }
}
