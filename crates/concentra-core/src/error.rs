//! Error types for the Concentra engine.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid construction-time input. Aborts the session before any load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("invalid time range: end {end} is not after start {start}")] InvalidTimeRange { start: DateTime<Utc>, end: DateTime<Utc> },
    #[error("threshold {0} is not in the range (0, 1]")] InvalidThreshold(f64),
    #[error("network name is empty")] EmptyName,
    #[error("window {name:?}: {reason}")] InvalidWindow { name: String, reason: String },
    #[error("total wealth must be positive and finite, got {0}")] InvalidTotalWealth(f64),
}

/// Failure of a single metrics query. Never aborts the whole run.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricsError {
    #[error("insufficient data: {0}")] InsufficientData(String),
    #[error("threshold {0} is not in the range (0, 1]")] InvalidThreshold(f64),
}

/// Failure while populating a record store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("I/O: {0}")] Io(String),
    #[error("malformed source data: {0}")] Malformed(String),
    #[error("invalid record: {0}")] InvalidRecord(String),
    #[error("record store is sealed; load phase already completed")] StoreSealed,
}

#[derive(Error, Debug)]
pub enum StatsError {
    #[error(transparent)] Configuration(#[from] ConfigurationError),
    #[error(transparent)] Metrics(#[from] MetricsError),
    #[error(transparent)] Load(#[from] LoadError),
}
