pub mod aggregate_service;
pub mod chart_service;
pub mod cost_service;
pub mod trend_service;
pub mod validation_service;
