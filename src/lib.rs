//! riskaware: technical indicators, risk metrics and feature datasets
//! for daily price series.
//!
//! Hexagonal architecture: pure numeric logic in [`domain`], port traits in
//! [`ports`], CSV/INI implementations in [`adapters`], command dispatch in
//! [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
