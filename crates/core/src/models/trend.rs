use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single aggregate daily-cost sample.
///
/// Recomputed on every render, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,

    /// Sum of daily costs of the assets active at `date`
    pub value: f64,
}

/// Identifies one coarse/refine cycle. A refined series is only accepted
/// while its ticket is still the latest one handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrendTicket {
    pub generation: u64,
}
