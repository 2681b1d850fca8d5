pub mod asset;
pub mod chart;
pub mod filter;
pub mod record;
pub mod settings;
pub mod trend;
