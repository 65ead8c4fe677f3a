pub mod dashboard_service;
pub mod holding_service;
pub mod market_change;
pub mod savings_service;
