//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - request types (`ApplicantProfile`, `UnderwriteApplication`) and their validation
//! - intermediate values (`RiskEstimate`, `PremiumQuote`, `DecisionOutcome`)
//! - the two decision vocabularies (`PreDecision`, `FinalDecision`)
//! - response types (`QuoteResult`, `UnderwriteResult`)
//! - the customer contact record (`Customer`)

pub mod customer;
pub mod types;

pub use customer::*;
pub use types::*;
