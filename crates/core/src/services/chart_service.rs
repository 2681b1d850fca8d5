use chrono::{DateTime, Utc};

use crate::models::chart::{ChartLayout, ChartSegment, ColorMode, Rgb, ScaleKind, SelectionMarker};
use crate::models::trend::TrendPoint;

/// Value spread above which the Y axis switches to a logarithmic scale.
pub const LOG_SCALE_THRESHOLD: f64 = 100.0;

/// Smallest denominator used when normalising, so a flat series does not blow up.
const MIN_DENOMINATOR: f64 = 0.5;

/// Min / max / spread of the values of a displayed series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl SeriesStats {
    /// `None` for an empty series.
    pub fn from_points(points: &[TrendPoint]) -> Option<Self> {
        let first = points.first()?.value;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.value), hi.max(p.value)));
        Some(Self {
            min,
            max,
            range: max - min,
        })
    }

    pub fn scale(&self) -> ScaleKind {
        if self.range > LOG_SCALE_THRESHOLD {
            ScaleKind::Logarithmic
        } else {
            ScaleKind::Linear
        }
    }
}

/// Maps trend points to canvas coordinates and colours.
///
/// The renderer only strokes lines; every coordinate is computed here.
pub struct ChartService {
    layout: ChartLayout,
    color_mode: ColorMode,
}

impl ChartService {
    pub fn new(layout: ChartLayout) -> Self {
        Self {
            layout,
            color_mode: ColorMode::default(),
        }
    }

    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    fn plot_width(&self) -> f64 {
        self.layout.width - 2.0 * self.layout.padding
    }

    fn plot_height(&self) -> f64 {
        self.layout.height - 2.0 * self.layout.padding
    }

    /// X of the `index`-th of `count` points, spread evenly across the plot width.
    pub fn x_for_index(&self, index: usize, count: usize) -> f64 {
        let denom = count.saturating_sub(1).max(1) as f64;
        self.layout.padding + self.plot_width() * index as f64 / denom
    }

    /// Y of `value` (canvas coordinates, 0 at the top).
    pub fn y_for_value(&self, value: f64, stats: &SeriesStats) -> f64 {
        let baseline = self.layout.height - self.layout.padding;
        let linear = || (value - stats.min) / stats.range.max(MIN_DENOMINATOR);

        let normalized = match stats.scale() {
            ScaleKind::Linear => linear(),
            ScaleKind::Logarithmic => {
                let log_min = (stats.min + 1.0).ln();
                let log_max = (stats.max + 1.0).ln();
                let t = ((value + 1.0).ln() - log_min) / (log_max - log_min).max(MIN_DENOMINATOR);
                if t.is_finite() {
                    t
                } else {
                    linear()
                }
            }
        };
        baseline - normalized * self.plot_height()
    }

    /// Colour of `value`: green at the low end, yellow mid-way, red at the top.
    pub fn color_for_value(&self, value: f64, stats: &SeriesStats) -> Rgb {
        let t = match self.color_mode {
            ColorMode::Linear => {
                if stats.range == 0.0 {
                    return Rgb::YELLOW;
                }
                (value - stats.min) / stats.range
            }
            ColorMode::Logarithmic => {
                let log_min = (stats.min + 1.0).ln();
                let log_max = (stats.max + 1.0).ln();
                if log_max == log_min {
                    return Rgb::YELLOW;
                }
                ((value + 1.0).ln() - log_min) / (log_max - log_min)
            }
        };
        if !t.is_finite() {
            return Rgb::YELLOW;
        }
        gradient(t)
    }

    /// Polyline segments for the series, each coloured by its starting point.
    /// Fewer than two points draw nothing.
    pub fn segments(&self, points: &[TrendPoint]) -> Vec<ChartSegment> {
        let Some(stats) = SeriesStats::from_points(points) else {
            return Vec::new();
        };
        let n = points.len();
        points
            .windows(2)
            .enumerate()
            .map(|(i, pair)| ChartSegment {
                x1: self.x_for_index(i, n),
                y1: self.y_for_value(pair[0].value, &stats),
                x2: self.x_for_index(i + 1, n),
                y2: self.y_for_value(pair[1].value, &stats),
                color: self.color_for_value(pair[0].value, &stats),
            })
            .collect()
    }

    /// X of the selection line. A pixel offset wins over a date; a date is
    /// placed proportionally within the series' time span.
    pub fn marker_x(&self, points: &[TrendPoint], marker: &SelectionMarker) -> Option<f64> {
        if let Some(x) = marker.pixel {
            return Some(x);
        }
        let date = marker.date?;
        let min_time = points.iter().map(|p| p.date).min()?;
        let max_time = points.iter().map(|p| p.date).max()?;

        let denom = (max_time - min_time).num_milliseconds().max(1) as f64;
        let ratio = (date - min_time).num_milliseconds() as f64 / denom;
        Some(self.layout.padding + self.plot_width() * ratio.clamp(0.0, 1.0))
    }

    /// Index of the point under horizontal offset `x`. `None` for an empty series.
    pub fn index_at(&self, points: &[TrendPoint], x: f64) -> Option<usize> {
        if points.is_empty() {
            return None;
        }
        let usable = self.plot_width().max(1.0);
        let ratio = ((x - self.layout.padding) / usable).clamp(0.0, 1.0);
        let last = points.len() - 1;
        let index = (ratio * last as f64).round() as usize;
        Some(index.min(last))
    }

    /// Date of the point under horizontal offset `x`.
    pub fn date_at(&self, points: &[TrendPoint], x: f64) -> Option<DateTime<Utc>> {
        self.index_at(points, x).map(|i| points[i].date)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(ChartLayout::default())
    }
}

/// Two-stop gradient over `t ∈ [0, 1]`: green → yellow ramps red up,
/// yellow → red ramps green down.
pub fn gradient(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.5 {
        Rgb::new((2.0 * t * 255.0).round() as u8, 255, 0)
    } else {
        Rgb::new(255, ((1.0 - 2.0 * (t - 0.5)) * 255.0).round() as u8, 0)
    }
}
