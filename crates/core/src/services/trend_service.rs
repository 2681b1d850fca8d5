use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use log::debug;

use crate::models::asset::Asset;
use crate::models::settings::Settings;
use crate::models::trend::{TrendPoint, TrendTicket};
use crate::services::cost_service;

/// Samples the aggregate daily cost of a set of assets over time.
///
/// The full series costs O(samples × assets), so it is produced in two passes:
/// 1. [`coarse`](Self::coarse): `base_samples` evenly spaced points across the
///    whole range, cheap enough to render immediately.
/// 2. [`refine`](Self::refine): `refine_samples` extra points inside every
///    coarse segment, computed as independent futures and stitched back in
///    segment order. Result size is `(base - 1) * (refine + 1) + 1`.
///
/// The sampled set is passed in already stripped of hidden assets and
/// tag-filtered; activity is re-evaluated at every sample instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendSampler {
    pub base_samples: usize,
    pub refine_samples: usize,
}

impl TrendSampler {
    pub fn new(base_samples: usize, refine_samples: usize) -> Self {
        Self {
            base_samples,
            refine_samples,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.trend_base_samples, settings.trend_refine_samples)
    }

    /// Sampling range: earliest `active_from` up to the later of `now` and the
    /// furthest known `active_to`.
    ///
    /// `None` for an empty set and for a range that is empty or would run
    /// backwards (every asset starting at or after the range end).
    pub fn range(assets: &[&Asset], now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let min_date = assets.iter().map(|a| a.active_from).min()?;
        let max_date = assets
            .iter()
            .filter_map(|a| a.active_to)
            .fold(now, |acc, to| acc.max(to));
        (min_date < max_date).then_some((min_date, max_date))
    }

    /// Aggregate daily cost of the assets active at `at`.
    pub fn value_at(assets: &[&Asset], at: DateTime<Utc>) -> f64 {
        assets
            .iter()
            .filter(|a| cost_service::is_active(a, at))
            .map(|a| cost_service::daily_cost(a, at))
            .filter(|v| v.is_finite())
            .sum()
    }

    /// `count` evenly spaced samples over `[from, to]`, both endpoints included.
    /// Empty when there are no assets or `to <= from`. Instants that round to
    /// the same millisecond are emitted once.
    pub fn sample(
        assets: &[&Asset],
        count: usize,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<TrendPoint> {
        if assets.is_empty() || to <= from {
            return Vec::new();
        }
        let span_ms = (to - from).num_milliseconds() as f64;
        let denom = count.saturating_sub(1).max(1) as f64;

        let mut points: Vec<TrendPoint> = (0..count)
            .map(|i| {
                let date = Self::interpolate(from, to, span_ms, i as f64 / denom);
                TrendPoint {
                    date,
                    value: Self::value_at(assets, date),
                }
            })
            .collect();
        points.dedup_by_key(|p| p.date);
        points
    }

    /// Phase 1: the coarse series across the full range.
    pub fn coarse(&self, assets: &[&Asset], now: DateTime<Utc>) -> Vec<TrendPoint> {
        let Some((from, to)) = Self::range(assets, now) else {
            return Vec::new();
        };
        let points = Self::sample(assets, self.base_samples, from, to);
        debug!(
            "Coarse trend: {} points over {} assets ({from} .. {to})",
            points.len(),
            assets.len()
        );
        points
    }

    /// Phase 2: insert `refine_samples` interior points into every segment of
    /// `coarse`. Shared segment endpoints appear once.
    pub async fn refine(&self, assets: &[&Asset], coarse: &[TrendPoint]) -> Vec<TrendPoint> {
        if coarse.len() < 2 {
            return coarse.to_vec();
        }
        let per_segment = self.refine_samples;

        let segments = coarse.windows(2).map(move |pair| {
            let (start, end) = (pair[0], pair[1]);
            async move { Self::segment_interior(assets, start.date, end.date, per_segment) }
        });
        let interiors = join_all(segments).await;

        let mut refined = Vec::with_capacity(Self::refined_len(coarse.len(), per_segment));
        for (start, interior) in coarse.iter().zip(interiors) {
            refined.push(*start);
            refined.extend(interior);
        }
        if let Some(last) = coarse.last() {
            refined.push(*last);
        }
        refined.dedup_by_key(|p| p.date);
        debug!("Refined trend: {} -> {} points", coarse.len(), refined.len());
        refined
    }

    /// Number of points [`refine`](Self::refine) yields for `coarse_len` coarse
    /// points, as long as every segment spans more than `per_segment` milliseconds.
    pub fn refined_len(coarse_len: usize, per_segment: usize) -> usize {
        if coarse_len < 2 {
            return coarse_len;
        }
        (coarse_len - 1) * (per_segment + 1) + 1
    }

    /// Points strictly between `start` and `end`, at ratios `k / (count + 1)`.
    fn segment_interior(
        assets: &[&Asset],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        count: usize,
    ) -> Vec<TrendPoint> {
        let span_ms = (end - start).num_milliseconds() as f64;
        (1..=count)
            .map(|k| {
                let date = Self::interpolate(start, end, span_ms, k as f64 / (count + 1) as f64);
                TrendPoint {
                    date,
                    value: Self::value_at(assets, date),
                }
            })
            .collect()
    }

    fn interpolate(from: DateTime<Utc>, to: DateTime<Utc>, span_ms: f64, ratio: f64) -> DateTime<Utc> {
        if ratio >= 1.0 {
            return to;
        }
        from + Duration::milliseconds((span_ms * ratio).round() as i64)
    }
}

impl Default for TrendSampler {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Last-write-wins holder for the displayed trend series.
///
/// Every coarse pass takes a new ticket. A refinement started under an older
/// ticket is dropped when it completes, so a slow refine for stale filters can
/// never overwrite the series for the current ones.
#[derive(Debug, Default)]
pub struct TrendSchedule {
    generation: u64,
    points: Vec<TrendPoint>,
}

impl TrendSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle showing `coarse`. Invalidates all earlier tickets.
    pub fn begin(&mut self, coarse: Vec<TrendPoint>) -> TrendTicket {
        self.generation += 1;
        self.points = coarse;
        TrendTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: TrendTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Replace the displayed series with `refined` if `ticket` is still current.
    pub fn commit(&mut self, ticket: TrendTicket, refined: Vec<TrendPoint>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Dropping stale trend refinement (generation {} < {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.points = refined;
        true
    }

    /// The series currently on display.
    pub fn points(&self) -> &[TrendPoint] {
        &self.points
    }

    /// Drop the displayed series and invalidate in-flight refinements.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.points.clear();
    }
}
