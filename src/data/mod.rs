//! Input data: synthetic training samples for the risk model.

pub mod sample;

pub use sample::*;
