//! Amortized cost of a single asset at a given instant.
//!
//! Pure functions, no I/O. Two comparisons against `active_to` coexist:
//! - [`is_active`] treats the retirement instant as already out of service (`date < active_to`),
//! - [`daily_cost`] treats it as already retired (`active_to <= as_of`) when
//!   deciding whether the recycle price has been realised.
//!
//! Filtering uses the first, cost-basis selection the second. Calling
//! `daily_cost` exactly at `active_to` on an asset that `is_active` rejected
//! therefore prices it as expired.

use chrono::{DateTime, Utc};

use crate::models::asset::Asset;

/// End of the usage window: the retirement date once it has passed, otherwise `as_of`.
fn usage_end(asset: &Asset, as_of: DateTime<Utc>) -> DateTime<Utc> {
    match asset.active_to {
        Some(to) if to < as_of => to,
        _ => as_of,
    }
}

/// Whole days the asset has been in service as of `as_of`.
///
/// Never less than 1: an asset used for part of a day still amortizes over
/// one day, and a window that ends before it starts (bad input) does too.
pub fn usage_days(asset: &Asset, as_of: DateTime<Utc>) -> i64 {
    let end = usage_end(asset, as_of);
    (end - asset.active_from).num_days().max(1)
}

/// Amortized daily cost as of `as_of`.
///
/// - 0 for an asset that is not active yet (`active_from > as_of`).
/// - `(price - recycle_price) / usage_days` once retired (`active_to <= as_of`).
/// - `price / usage_days` otherwise.
///
/// The result is not clamped: a recycle price above the purchase price yields
/// a negative figure. A non-finite result is reported as 0.
pub fn daily_cost(asset: &Asset, as_of: DateTime<Utc>) -> f64 {
    if asset.active_from > as_of {
        return 0.0;
    }

    let days = usage_days(asset, as_of);
    let has_expired = asset.active_to.is_some_and(|to| to <= as_of);
    let cost_basis = if has_expired {
        asset.price - asset.recycle_price
    } else {
        asset.price
    };

    let cost = cost_basis / days as f64;
    if cost.is_finite() {
        cost
    } else {
        0.0
    }
}

/// Half-open activity window `[active_from, active_to)`.
pub fn is_active(asset: &Asset, date: DateTime<Utc>) -> bool {
    asset.active_from <= date && asset.active_to.map_or(true, |to| date < to)
}
