pub mod action;
pub mod audit;
pub mod history;
pub mod reducer;
