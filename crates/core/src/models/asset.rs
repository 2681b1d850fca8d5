use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::cost_service;

/// Represents one owned, trackable item (a phone, a bike, a subscription box).
///
/// **Equality** is based solely on `id`, NOT on the mutable fields. A save
/// replaces every mutable field while the id stays fixed, so two versions
/// of the same asset compare equal.
///
/// The session-only "hidden" flag is not stored here; it lives in the
/// hidden overlay owned by [`crate::CostSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Stable identifier, derived from the backing record's file name
    pub id: String,

    /// Display name
    pub name: String,

    /// Single glyph shown next to the name (e.g., "📱")
    pub icon: String,

    /// Purchase price
    pub price: f64,

    /// Date the asset entered service
    pub active_from: DateTime<Utc>,

    /// Date the asset left service (sold, scrapped, retired). `None` = still active.
    #[serde(default)]
    pub active_to: Option<DateTime<Utc>>,

    /// Resale / salvage value, realised once the asset is retired
    #[serde(default)]
    pub recycle_price: f64,

    /// Free-form labels used for filtering
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Asset {}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        price: f64,
        active_from: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            price,
            active_from,
            active_to: None,
            recycle_price: 0.0,
            tags: Vec::new(),
        }
    }

    /// Builder-style setter for the retirement date.
    pub fn retired_at(mut self, active_to: DateTime<Utc>) -> Self {
        self.active_to = Some(active_to);
        self
    }

    /// Builder-style setter for the recycle price.
    pub fn with_recycle_price(mut self, recycle_price: f64) -> Self {
        self.recycle_price = recycle_price;
        self
    }

    /// Builder-style setter for tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Amortized daily cost as of `as_of`. See [`cost_service::daily_cost`].
    #[must_use]
    pub fn daily_cost(&self, as_of: DateTime<Utc>) -> f64 {
        cost_service::daily_cost(self, as_of)
    }

    /// Whole days in service as of `as_of`, at least 1. See [`cost_service::usage_days`].
    #[must_use]
    pub fn usage_days(&self, as_of: DateTime<Utc>) -> i64 {
        cost_service::usage_days(self, as_of)
    }

    /// Whether the asset counts as in service on `date`. See [`cost_service::is_active`].
    #[must_use]
    pub fn is_active(&self, date: DateTime<Utc>) -> bool {
        cost_service::is_active(self, date)
    }

    /// True if any tag is in `selected`.
    pub fn has_any_tag(&self, selected: &[String]) -> bool {
        self.tags.iter().any(|t| selected.contains(t))
    }
}
