//! # concentra-core
//! Foundation types and traits for the Concentra metrics engine.

pub mod config;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
