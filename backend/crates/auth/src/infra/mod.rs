//! Infrastructure Layer
//!
//! Database repository implementations.

pub mod postgres;
