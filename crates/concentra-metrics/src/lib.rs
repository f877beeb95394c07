//! # concentra-metrics
//! Ranking, threshold and multi-window metrics over a loaded record store.
//!
//! A [`store::RecordStore`] is filled once through a
//! [`concentra_core::traits::Loader`] and sealed; every metric below reads
//! from it without mutation, so windows can be evaluated concurrently.

pub mod aggregate;
pub mod ranking;
pub mod store;
pub mod summary;
pub mod threshold;
pub mod wealth;

pub use aggregate::{MultiWindowReport, WindowOutcome, WindowStats};
pub use ranking::Ranking;
pub use store::RecordStore;
pub use summary::{NetworkStats, NetworkSummary};
pub use wealth::{TopShare, WealthStats};
