//! End-to-end test suite for Concentra.
//!
//! Drives loaders, the record store, the metrics engine and the report
//! writers together on synthetic networks.

pub mod helpers;
