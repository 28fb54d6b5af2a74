//! Input/output helpers.
//!
//! - append-only audit/feedback sink (`audit`, `feedback`)
//! - customer store (`customers`)
//! - request file readers (`request`)

pub mod audit;
pub mod customers;
pub mod feedback;
pub mod request;

pub use audit::*;
pub use customers::*;
pub use feedback::*;
pub use request::*;
