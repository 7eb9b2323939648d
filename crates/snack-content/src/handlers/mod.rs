//! Content handlers.
//!
//! Each handler takes its kind's payload and the node handle it owns. A missing
//! payload or field is a no-op; handlers never fail.

pub mod hero;
pub mod social;
