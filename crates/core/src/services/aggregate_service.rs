use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use crate::models::asset::Asset;
use crate::models::filter::{AssetQuery, SortMode, Totals};
use crate::services::cost_service;

/// Derives the working subsets of an asset collection for a query and
/// computes the headline totals.
///
/// Pure business logic, no I/O.
pub struct AggregateService;

impl AggregateService {
    pub fn new() -> Self {
        Self
    }

    /// Assets in service at `as_of` and not in the hidden overlay.
    pub fn active_assets<'a>(
        &self,
        assets: &'a [Asset],
        hidden: &HashSet<String>,
        as_of: DateTime<Utc>,
    ) -> Vec<&'a Asset> {
        assets
            .iter()
            .filter(|a| cost_service::is_active(a, as_of) && !hidden.contains(&a.id))
            .collect()
    }

    /// Keep assets carrying at least one selected tag. An empty selection keeps everything.
    pub fn apply_tag_filter<'a>(&self, assets: Vec<&'a Asset>, selected: &[String]) -> Vec<&'a Asset> {
        if selected.is_empty() {
            return assets;
        }
        assets.into_iter().filter(|a| a.has_any_tag(selected)).collect()
    }

    /// Active, visible and tag-filtered: the set totals and the trend are computed over.
    pub fn filtered_active<'a>(
        &self,
        assets: &'a [Asset],
        hidden: &HashSet<String>,
        as_of: DateTime<Utc>,
        selected_tags: &[String],
    ) -> Vec<&'a Asset> {
        let active = self.active_assets(assets, hidden, as_of);
        self.apply_tag_filter(active, selected_tags)
    }

    /// Headline totals. Independent of search and sort.
    pub fn totals(&self, assets: &[Asset], hidden: &HashSet<String>, query: &AssetQuery) -> Totals {
        let set = self.filtered_active(assets, hidden, query.as_of, &query.selected_tags);
        Self::sum(&set, query.as_of)
    }

    /// Sum prices, recycle prices and daily costs of an already filtered set.
    pub fn sum(assets: &[&Asset], as_of: DateTime<Utc>) -> Totals {
        assets.iter().fold(Totals::default(), |mut acc, a| {
            acc.total_cost += a.price;
            acc.total_recycle += a.recycle_price;
            acc.total_daily_cost += cost_service::daily_cost(a, as_of);
            acc
        })
    }

    /// The list view: every asset acquired by `as_of` (retired and hidden
    /// ones included so they remain reachable), then tag filter, search, sort.
    pub fn visible_assets<'a>(&self, assets: &'a [Asset], query: &AssetQuery) -> Vec<&'a Asset> {
        let acquired: Vec<&Asset> = assets
            .iter()
            .filter(|a| a.active_from <= query.as_of)
            .collect();
        let tagged = self.apply_tag_filter(acquired, &query.selected_tags);
        let mut found = self.search(tagged, &query.search);
        self.sort(&mut found, query.sort, query.as_of);
        found
    }

    /// Case-insensitive substring match against the name or any tag.
    pub fn search<'a>(&self, assets: Vec<&'a Asset>, query: &str) -> Vec<&'a Asset> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return assets;
        }
        assets
            .into_iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&q)
                    || a.tags.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Stable sort; equal keys keep their input order.
    pub fn sort(&self, assets: &mut [&Asset], mode: SortMode, as_of: DateTime<Utc>) {
        match mode {
            SortMode::None => {}
            SortMode::DailyCostDesc => assets.sort_by(|a, b| {
                cost_service::daily_cost(b, as_of)
                    .partial_cmp(&cost_service::daily_cost(a, as_of))
                    .unwrap_or(Ordering::Equal)
            }),
            SortMode::PriceDesc => {
                assets.sort_by(|a, b| b.price.partial_cmp(&a.price).unwrap_or(Ordering::Equal))
            }
            SortMode::ActiveFromDesc => assets.sort_by(|a, b| b.active_from.cmp(&a.active_from)),
        }
    }

    /// Every distinct tag across the collection, in display order.
    pub fn all_tags(&self, assets: &[Asset]) -> Vec<String> {
        let unique: BTreeSet<&str> = assets
            .iter()
            .flat_map(|a| a.tags.iter().map(String::as_str))
            .collect();
        let mut tags: Vec<String> = unique.into_iter().map(str::to_string).collect();
        tags.sort_by(|a, b| natural_cmp(a, b).then_with(|| a.cmp(b)));
        tags
    }
}

impl Default for AggregateService {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive comparison that orders digit runs by numeric value
/// ("tag2" < "tag10").
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_digits(&mut left);
                let rhs = take_digits(&mut right);
                let lhs_trim = lhs.trim_start_matches('0');
                let rhs_trim = rhs.trim_start_matches('0');
                let ord = lhs_trim
                    .len()
                    .cmp(&rhs_trim.len())
                    .then_with(|| lhs_trim.cmp(rhs_trim));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}
