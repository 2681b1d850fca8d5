use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::asset::Asset;
use crate::services::validation_service::{format_date, parse_date};

/// The raw asset record exchanged with a [`crate::storage::traits::RecordCodec`].
///
/// Field names follow the persisted layout (`active_from`, `recycle_price`, ...).
/// Deserialization is lenient: every field is optional, numbers may arrive as
/// strings, and `tags` may be a list or a comma separated string. A malformed
/// value decodes to its default; [`AssetRecord::into_asset`] applies the
/// remaining fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRecord {
    pub name: String,

    pub icon: String,

    #[serde(deserialize_with = "lenient_number")]
    pub price: f64,

    /// ISO date (`YYYY-MM-DD`), empty when unknown
    pub active_from: String,

    /// ISO date, empty while the asset is still in service
    pub active_to: String,

    #[serde(deserialize_with = "lenient_number")]
    pub recycle_price: f64,

    #[serde(deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,

    /// Informational only; always reset to `false` on load
    #[serde(deserialize_with = "lenient_bool")]
    pub hidden: bool,
}

impl AssetRecord {
    /// Convert into an [`Asset`], applying the fallbacks for malformed input:
    /// an unparseable `active_from` becomes `now`, an unparseable `active_to`
    /// becomes "still active", an empty icon becomes `default_icon`.
    pub fn into_asset(self, id: impl Into<String>, default_icon: &str, now: DateTime<Utc>) -> Asset {
        let icon = if self.icon.trim().is_empty() {
            default_icon.to_string()
        } else {
            self.icon
        };

        Asset {
            id: id.into(),
            name: self.name,
            icon,
            price: finite_or_zero(self.price),
            active_from: parse_date(&self.active_from).unwrap_or(now),
            active_to: parse_date(&self.active_to),
            recycle_price: finite_or_zero(self.recycle_price),
            tags: self.tags,
        }
    }
}

impl From<&Asset> for AssetRecord {
    fn from(asset: &Asset) -> Self {
        Self {
            name: asset.name.clone(),
            icon: asset.icon.clone(),
            price: finite_or_zero(asset.price),
            active_from: format_date(asset.active_from),
            active_to: asset.active_to.map(format_date).unwrap_or_default(),
            recycle_price: finite_or_zero(asset.recycle_price),
            tags: asset.tags.clone(),
            hidden: false,
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

// ── Lenient field decoders ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(f64),
    Bool(bool),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<RawScalar>),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawScalar> = Option::deserialize(deserializer).unwrap_or(None);
    let value = match raw {
        Some(RawScalar::Number(n)) => n,
        Some(RawScalar::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(RawScalar::Bool(_)) | None => 0.0,
    };
    Ok(finite_or_zero(value))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawScalar> = Option::deserialize(deserializer).unwrap_or(None);
    Ok(match raw {
        Some(RawScalar::Bool(b)) => b,
        Some(RawScalar::Number(n)) => n != 0.0,
        Some(RawScalar::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTags> = Option::deserialize(deserializer).unwrap_or(None);
    let tags = match raw {
        Some(RawTags::List(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                RawScalar::Text(s) => Some(s),
                RawScalar::Number(n) => Some(n.to_string()),
                RawScalar::Bool(_) => None,
            })
            .collect(),
        Some(RawTags::Text(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    Ok(tags)
}
