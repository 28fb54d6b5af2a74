//! Risk model.
//!
//! The scorer is constructed explicitly by the composition root and handed to the
//! pipeline; nothing here is global.

pub mod risk;

pub use risk::*;
