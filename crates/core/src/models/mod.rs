pub mod analytics;
pub mod audit;
pub mod budget;
pub mod investment;
pub mod savings;
pub mod settings;
pub mod state;
