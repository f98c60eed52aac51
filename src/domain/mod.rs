//! Core domain types and logic.

pub mod price_series;
pub mod indicator;
pub mod indicator_helpers;
pub mod risk;
pub mod dataset;
pub mod config_validation;
pub mod error;
