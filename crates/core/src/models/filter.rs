use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort order for the asset list view.
///
/// Serialized with the names the settings file uses (`none`, `dailyDesc`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Input (insertion) order
    #[default]
    #[serde(rename = "none")]
    None,
    /// Highest daily cost first
    #[serde(rename = "dailyDesc")]
    DailyCostDesc,
    /// Highest purchase price first
    #[serde(rename = "priceDesc")]
    PriceDesc,
    /// Most recently acquired first
    #[serde(rename = "dateDesc")]
    ActiveFromDesc,
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::None => write!(f, "none"),
            SortMode::DailyCostDesc => write!(f, "dailyDesc"),
            SortMode::PriceDesc => write!(f, "priceDesc"),
            SortMode::ActiveFromDesc => write!(f, "dateDesc"),
        }
    }
}

/// The user's current filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuery {
    /// Date every figure is computed for
    pub as_of: DateTime<Utc>,

    /// Tags to keep (OR). Empty = no tag filter.
    pub selected_tags: Vec<String>,

    /// Free-text search over name and tags. Empty = no filter.
    pub search: String,

    /// List view ordering
    pub sort: SortMode,
}

impl AssetQuery {
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            selected_tags: Vec::new(),
            search: String::new(),
            sort: SortMode::None,
        }
    }
}

/// Headline figures over the tag-filtered active set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of purchase prices
    pub total_cost: f64,

    /// Sum of recycle prices
    pub total_recycle: f64,

    /// Sum of daily costs as of the query date
    pub total_daily_cost: f64,
}
