//! Core domain types and logic.

pub mod price_table;
pub mod calendar;
pub mod selection;
pub mod holdings;
pub mod engine;
pub mod run_config;
pub mod config_validation;
pub mod error;
