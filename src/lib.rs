//! `insure-core` library crate.
//!
//! The binary (`insure`) is a thin wrapper around this library so that:
//!
//! - quote and underwriting logic is testable without spawning processes
//! - the decision pipeline can be embedded behind other front-ends
//!
//! Flow: `models` scores, `pricing` prices, `rules` decides, `compliance` annotates,
//! and `app::pipeline` ties them together with the audit sink from `io`.

pub mod app;
pub mod cli;
pub mod compliance;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod pricing;
pub mod report;
pub mod rules;
