use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canvas geometry the renderer draws into, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl ChartLayout {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self::new(100.0, 20.0, 0.0)
    }
}

/// Vertical mapping used for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Linear,
    Logarithmic,
}

/// How the colour position `t` is derived from a value.
///
/// `Linear` normalises the raw value, `Logarithmic` normalises `ln(v + 1)`
/// regardless of the Y scale in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    Linear,
    #[default]
    Logarithmic,
}

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const YELLOW: Rgb = Rgb { r: 255, g: 255, b: 0 };

    /// Colour of the selection marker line (`#FFD600`).
    pub const MARKER: Rgb = Rgb { r: 0xFF, g: 0xD6, b: 0x00 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS form, e.g. `rgb(255,128,0)`.
    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Hex form, e.g. `#FFD600`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// One drawable line segment of the trend polyline, coloured by its start value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Rgb,
}

/// Where to draw the vertical selection line.
///
/// When both are set, `pixel` wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionMarker {
    pub pixel: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

impl SelectionMarker {
    pub fn at_pixel(x: f64) -> Self {
        Self {
            pixel: Some(x),
            date: None,
        }
    }

    pub fn at_date(date: DateTime<Utc>) -> Self {
        Self {
            pixel: None,
            date: Some(date),
        }
    }
}
