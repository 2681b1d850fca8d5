pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::{DateTime, Datelike, Utc};
use log::debug;
use models::{
    asset::Asset,
    filter::{AssetQuery, SortMode, Totals},
    settings::Settings,
    trend::{TrendPoint, TrendTicket},
};
use services::{
    aggregate_service::AggregateService,
    trend_service::{TrendSampler, TrendSchedule},
    validation_service::{self, AssetDraft},
};
use std::collections::HashSet;
use std::time::Duration;
use storage::traits::AssetStore;

use errors::CoreError;

/// Years past the current one offered by the as-of date picker.
const FUTURE_YEARS: i32 = 7;

/// Main entry point for the CostSet core library.
///
/// Holds one session: the loaded assets, the hidden overlay, the current
/// filter selection and the displayed trend series. All mutation goes through
/// `&mut self`, driven by user events; nothing is shared across threads.
#[must_use]
pub struct CostSet {
    settings: Settings,
    store: Box<dyn AssetStore>,
    assets: Vec<Asset>,
    /// Session-only hidden flags, by asset id. Cleared on every (re)load.
    hidden: HashSet<String>,
    query: AssetQuery,
    aggregate_service: AggregateService,
    sampler: TrendSampler,
    schedule: TrendSchedule,
}

impl std::fmt::Debug for CostSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostSet")
            .field("assets", &self.assets.len())
            .field("hidden", &self.hidden.len())
            .field("query", &self.query)
            .field("settings", &self.settings)
            .finish()
    }
}

impl CostSet {
    /// Create an empty session. Call [`load`](Self::load) to read the store.
    pub fn new(settings: Settings, store: Box<dyn AssetStore>) -> Self {
        let mut query = AssetQuery::at(Utc::now());
        query.sort = settings.default_sort;
        let sampler = TrendSampler::from_settings(&settings);

        Self {
            settings,
            store,
            assets: Vec::new(),
            hidden: HashSet::new(),
            query,
            aggregate_service: AggregateService::new(),
            sampler,
            schedule: TrendSchedule::new(),
        }
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Replace the in-memory collection with the store's content.
    /// Hidden flags are reset. On failure the current state is kept.
    pub async fn load(&mut self) -> Result<usize, CoreError> {
        let assets = self.store.load_all().await?;
        self.assets = assets;
        self.hidden.clear();
        Ok(self.assets.len())
    }

    /// Alias of [`load`](Self::load), for after an external edit.
    pub async fn reload(&mut self) -> Result<usize, CoreError> {
        self.load().await
    }

    /// Persist `asset`, then insert it (new id) or replace it in place (known id).
    /// If persisting fails, memory is left untouched.
    pub async fn save_asset(&mut self, asset: Asset) -> Result<(), CoreError> {
        self.store.save(&asset).await?;
        match self.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
        Ok(())
    }

    /// Validate form input and save the resulting asset. Returns its id.
    pub async fn save_draft(&mut self, draft: &AssetDraft) -> Result<String, CoreError> {
        let asset = validation_service::validate(draft, &self.settings)?;
        let id = asset.id.clone();
        self.save_asset(asset).await?;
        Ok(id)
    }

    /// Remove an asset from the store, then from memory.
    /// If the store fails, memory is left untouched.
    pub async fn delete_asset(&mut self, id: &str) -> Result<Asset, CoreError> {
        let idx = self
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))?;

        self.store.delete(id).await?;
        self.hidden.remove(id);
        Ok(self.assets.remove(idx))
    }

    // ── Assets ──────────────────────────────────────────────────────

    /// All loaded assets, in store order.
    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    #[must_use]
    pub fn get_asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    // ── Hidden overlay ──────────────────────────────────────────────

    /// Flip the hidden flag of `id`. Returns the new state.
    pub fn toggle_hidden(&mut self, id: &str) -> Result<bool, CoreError> {
        let hidden = !self.is_hidden(id);
        self.set_hidden(id, hidden)?;
        Ok(hidden)
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<(), CoreError> {
        if self.get_asset(id).is_none() {
            return Err(CoreError::AssetNotFound(id.to_string()));
        }
        if hidden {
            self.hidden.insert(id.to_string());
        } else {
            self.hidden.remove(id);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    // ── Filter state ────────────────────────────────────────────────

    pub fn set_as_of(&mut self, as_of: DateTime<Utc>) {
        self.query.as_of = as_of;
    }

    #[must_use]
    pub fn as_of(&self) -> DateTime<Utc> {
        self.query.as_of
    }

    /// Select `tag` if unselected, unselect it otherwise.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.query.selected_tags.iter().position(|t| t == tag) {
            self.query.selected_tags.remove(pos);
        } else {
            self.query.selected_tags.push(tag.to_string());
        }
    }

    /// Replace the whole tag selection (duplicates dropped).
    pub fn set_selected_tags(&mut self, tags: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        self.query.selected_tags = unique;
    }

    #[must_use]
    pub fn selected_tags(&self) -> &[String] {
        &self.query.selected_tags
    }

    pub fn set_search_query(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_sort_mode(&mut self, sort: SortMode) {
        self.query.sort = sort;
    }

    #[must_use]
    pub fn query(&self) -> &AssetQuery {
        &self.query
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The list view: acquired assets, tag-filtered, searched and sorted.
    #[must_use]
    pub fn visible_assets(&self) -> Vec<&Asset> {
        self.aggregate_service.visible_assets(&self.assets, &self.query)
    }

    /// Headline totals at the current as-of date and tag selection.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.aggregate_service
            .totals(&self.assets, &self.hidden, &self.query)
    }

    /// Every tag in the collection, in display order.
    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        self.aggregate_service.all_tags(&self.assets)
    }

    /// Year span offered by the as-of picker: earliest acquisition year
    /// (current year when empty) up to seven years ahead.
    #[must_use]
    pub fn year_range(&self, now: DateTime<Utc>) -> (i32, i32) {
        let current = now.year();
        let min = self
            .assets
            .iter()
            .map(|a| a.active_from.year())
            .min()
            .unwrap_or(current);
        (min, current + FUTURE_YEARS)
    }

    // ── Trend ───────────────────────────────────────────────────────

    /// Assets the trend is sampled over: the same set the totals use
    /// (active at the as-of date, not hidden, tag-filtered).
    fn trend_assets(&self) -> Vec<&Asset> {
        self.aggregate_service.filtered_active(
            &self.assets,
            &self.hidden,
            self.query.as_of,
            &self.query.selected_tags,
        )
    }

    /// Phase 1: compute and display the coarse series. The ticket identifies
    /// this cycle for [`commit_trend`](Self::commit_trend).
    pub fn coarse_trend(&mut self, now: DateTime<Utc>) -> (TrendTicket, Vec<TrendPoint>) {
        let points = self.sampler.coarse(&self.trend_assets(), now);
        let ticket = self.schedule.begin(points.clone());
        debug!("Trend cycle {} started", ticket.generation);
        (ticket, points)
    }

    /// Phase 2: refine a coarse series against the current asset set.
    /// Does not touch the displayed series; pass the result to
    /// [`commit_trend`](Self::commit_trend).
    pub async fn refine_trend(&self, coarse: &[TrendPoint]) -> Vec<TrendPoint> {
        let assets = self.trend_assets();
        self.sampler.refine(&assets, coarse).await
    }

    /// Display `refined` if `ticket` is still the latest cycle.
    pub fn commit_trend(&mut self, ticket: TrendTicket, refined: Vec<TrendPoint>) -> bool {
        self.schedule.commit(ticket, refined)
    }

    /// Both phases back to back; the refined series ends up displayed.
    pub async fn full_trend(&mut self, now: DateTime<Utc>) -> Vec<TrendPoint> {
        let (ticket, coarse) = self.coarse_trend(now);
        let refined = self.refine_trend(&coarse).await;
        self.commit_trend(ticket, refined);
        self.schedule.points().to_vec()
    }

    /// The series currently on display.
    #[must_use]
    pub fn trend(&self) -> &[TrendPoint] {
        self.schedule.points()
    }

    /// How long a host should wait between the coarse and the refined render.
    #[must_use]
    pub fn refine_delay(&self) -> Duration {
        self.settings.refine_delay()
    }
}
