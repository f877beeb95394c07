//! Wealth concentration over a network's rich list.
//!
//! Accounts are ranked by wealth and measured against the network's total
//! wealth scalar, not against the sum of the listed accounts: a rich list
//! usually covers only the top holders.

use serde::{Deserialize, Serialize};
use tracing::debug;

use concentra_core::constants::TOP_ACCOUNT_COUNTS;
use concentra_core::error::MetricsError;
use concentra_core::types::ThresholdResult;

use crate::ranking::Ranking;
use crate::store::RecordStore;

/// Share of total wealth held by the top `count` accounts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TopShare {
    pub count: usize,
    pub fraction: f64,
}

/// Wealth ranking and takeover threshold for one network.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WealthStats {
    pub accounts: Ranking,
    pub total_wealth: f64,
    pub threshold: ThresholdResult,
    pub top_shares: Vec<TopShare>,
}

impl WealthStats {
    /// Fraction held by the top `count` accounts, if it was computed.
    pub fn top_share(&self, count: usize) -> Option<f64> {
        self.top_shares
            .iter()
            .find(|s| s.count == count)
            .map(|s| s.fraction)
    }

    /// Fraction of total wealth held by one ranked account.
    pub fn share_of(&self, rank: usize) -> Option<f64> {
        self.accounts
            .get(rank)
            .map(|e| e.weight / self.total_wealth)
    }
}

impl RecordStore {
    /// Accounts ranked by wealth.
    pub fn account_ranking(&self) -> Ranking {
        Ranking::from_accounts(self.accounts())
    }

    fn require_total_wealth(&self) -> Result<f64, MetricsError> {
        self.total_wealth().ok_or_else(|| {
            MetricsError::InsufficientData(format!("{}: total wealth is unknown", self.name()))
        })
    }

    /// Wealth held by the top `count` accounts, in source units.
    pub fn accumulated_wealth(&self, count: usize) -> f64 {
        self.account_ranking().cumulative_weight(count)
    }

    /// Fraction of total wealth held by the top `count` accounts.
    pub fn accumulated_wealth_fraction(&self, count: usize) -> Result<f64, MetricsError> {
        let total = self.require_total_wealth()?;
        Ok(self.accumulated_wealth(count) / total)
    }

    /// Rank accounts and solve `threshold` against the total wealth.
    pub fn wealth_stats(&self, threshold: f64) -> Result<WealthStats, MetricsError> {
        let total_wealth = self.require_total_wealth()?;
        let accounts = self.account_ranking();
        if accounts.total() <= 0.0 {
            return Err(MetricsError::InsufficientData(format!(
                "{}: {} accounts hold no wealth",
                self.name(),
                accounts.len()
            )));
        }

        let threshold = accounts.solve_with_total(total_wealth, threshold)?;
        let top_shares = TOP_ACCOUNT_COUNTS
            .iter()
            .map(|&count| TopShare {
                count,
                fraction: accounts.cumulative_weight(count) / total_wealth,
            })
            .collect();

        debug!(
            network = %self.name(),
            accounts = accounts.len(),
            required = threshold.required_count,
            unreachable = threshold.unreachable,
            "wealth evaluated"
        );
        Ok(WealthStats {
            accounts,
            total_wealth,
            threshold,
            top_shares,
        })
    }
}
