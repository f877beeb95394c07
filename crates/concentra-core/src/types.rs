//! Normalized record types shared by loaders, the metrics engine and reports.
//!
//! Loaders translate whatever their source reports into [`Block`] and
//! [`Account`] values; nothing downstream sees source-specific shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// One unit of block production credited to one actor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Chain height, when the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    /// Identifier of the producer (address, validator key or pool name).
    #[serde(alias = "producer")]
    pub producer_id: String,
    /// Time the block was produced.
    #[serde(alias = "time")]
    pub timestamp: DateTime<Utc>,
}

impl Block {
    pub fn new(producer_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            height: None,
            producer_id: producer_id.into(),
            timestamp,
        }
    }

    /// Attach a chain height.
    pub fn with_height(mut self, height: u64) -> Self {
        self.height = Some(height);
        self
    }

    /// Reject records a loader should never have produced.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.producer_id.is_empty() {
            return Err(LoadError::InvalidRecord(format!(
                "block {} has an empty producer id",
                self.height.map_or_else(|| "?".to_string(), |h| h.to_string())
            )));
        }
        Ok(())
    }
}

/// A wealth holder as reported by a rich list.
///
/// `wealth` keeps the source's unit (absolute amount or percentage). The
/// engine only ever divides it by the store's total wealth.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Account {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(alias = "amount")]
    pub wealth: f64,
}

impl Account {
    pub fn new(id: impl Into<String>, wealth: f64) -> Self {
        Self {
            id: id.into(),
            alias: None,
            wealth,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Alias if present, otherwise the raw id.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.id)
    }

    /// Wealth must be finite and non-negative, and the id non-empty.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.id.is_empty() {
            return Err(LoadError::InvalidRecord("account has an empty id".into()));
        }
        if !self.wealth.is_finite() || self.wealth < 0.0 {
            return Err(LoadError::InvalidRecord(format!(
                "account {} has invalid wealth {}",
                self.id, self.wealth
            )));
        }
        Ok(())
    }
}

/// Number of blocks one producer made inside a window.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProducerStat {
    pub id: String,
    pub block_count: u64,
}

/// One actor in a ranking. `rank` is the 0-based position after sorting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RankedEntry {
    pub id: String,
    pub weight: f64,
    pub rank: usize,
}

/// Minimal number of top-ranked actors that together reach a threshold.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ThresholdResult {
    /// Length of the minimal covering prefix (1-based count).
    pub required_count: usize,
    /// Share of the total covered by that prefix.
    pub achieved_fraction: f64,
    /// Set when even the full ranking fell short of the threshold. The count
    /// is then the full ranking length.
    pub unreachable: bool,
}

impl ThresholdResult {
    pub fn is_reached(&self) -> bool {
        !self.unreachable
    }
}

/// Everything a [`Loader`](crate::traits::Loader) hands over in one load.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LoadedRecords {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub total_node_count: u64,
    /// Denominator for wealth shares. `None` when the source has no wealth data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_wealth: Option<f64>,
    /// Consensus mechanism label, for reports only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<String>,
}
