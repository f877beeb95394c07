//! Per-network summary row and the complete statistics bundle handed to
//! report writers.

use serde::{Deserialize, Serialize};
use tracing::info;

use concentra_core::config::Window;
use concentra_core::constants::SUMMARY_TOP_ACCOUNTS;
use concentra_core::error::MetricsError;

use crate::aggregate::MultiWindowReport;
use crate::ranking::producer_counts;
use crate::store::RecordStore;
use crate::wealth::WealthStats;

/// One network's row on the cross-network summary page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkSummary {
    pub name: String,
    pub consensus: Option<String>,
    pub total_blocks: usize,
    pub total_nodes: u64,
    /// Distinct producers over the whole loaded period.
    pub total_producers: usize,
    /// Reduced producer score across windows.
    pub producers_to_take_over: Option<usize>,
    /// Fraction of total wealth held by the top accounts.
    pub wealth_held_by_top_accounts: Option<f64>,
    pub accounts_to_take_over: Option<usize>,
}

/// Everything computed for one network in a reporting run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkStats {
    pub summary: NetworkSummary,
    pub threshold: f64,
    pub producers: MultiWindowReport,
    /// `None` when the network has no account data at all.
    pub wealth: Option<Result<WealthStats, MetricsError>>,
}

impl NetworkSummary {
    pub fn build(
        store: &RecordStore,
        producers: &MultiWindowReport,
        wealth: Option<&WealthStats>,
    ) -> Self {
        Self {
            name: store.name().to_string(),
            consensus: store.consensus().map(str::to_string),
            total_blocks: store.blocks().len(),
            total_nodes: store.total_node_count(),
            total_producers: producer_counts(store.blocks()).len(),
            producers_to_take_over: producers.min_required,
            wealth_held_by_top_accounts: wealth
                .map(|w| w.accounts.cumulative_weight(SUMMARY_TOP_ACCOUNTS) / w.total_wealth),
            accounts_to_take_over: wealth
                .filter(|w| w.threshold.is_reached())
                .map(|w| w.threshold.required_count),
        }
    }
}

impl RecordStore {
    /// Producer and wealth statistics using the configured threshold.
    pub fn network_stats(&self, windows: &[Window]) -> NetworkStats {
        let threshold = self.config().percent_to_take_over;
        let producers = self.evaluate_windows(windows, threshold);
        let wealth = if self.accounts().is_empty() {
            None
        } else {
            Some(self.wealth_stats(threshold))
        };
        let summary = NetworkSummary::build(
            self,
            &producers,
            wealth.as_ref().and_then(|w| w.as_ref().ok()),
        );
        info!(
            network = %summary.name,
            producers_to_take_over = ?summary.producers_to_take_over,
            accounts_to_take_over = ?summary.accounts_to_take_over,
            "network evaluated"
        );
        NetworkStats {
            summary,
            threshold,
            producers,
            wealth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use concentra_core::config::StatsConfig;
    use concentra_core::types::{Account, Block};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn store(with_accounts: bool) -> RecordStore {
        let config = StatsConfig::new("Qtum", ts(0), ts(7 * 86_400), 0.5).unwrap();
        let mut s = RecordStore::new(config).unwrap();
        for (i, p) in ["a", "a", "a", "b", "c"].iter().enumerate() {
            s.add_block(Block::new(*p, ts(6 * 86_400 + i as i64)).with_height(i as u64))
                .unwrap();
        }
        if with_accounts {
            s.add_account(Account::new("x", 40.0)).unwrap();
            s.add_account(Account::new("y", 20.0)).unwrap();
            s.set_total_wealth(100.0).unwrap();
        }
        s.set_total_node_count(42).unwrap();
        s.set_consensus("PoS").unwrap();
        s.finish_load();
        s
    }

    fn windows() -> Vec<Window> {
        vec![Window::trailing("1 day", ts(7 * 86_400), Duration::days(1)).unwrap()]
    }

    #[test]
    fn summary_collects_scores() {
        let stats = store(true).network_stats(&windows());
        let s = &stats.summary;
        assert_eq!(s.name, "Qtum");
        assert_eq!(s.consensus.as_deref(), Some("PoS"));
        assert_eq!(s.total_blocks, 5);
        assert_eq!(s.total_nodes, 42);
        assert_eq!(s.total_producers, 3);
        assert_eq!(s.producers_to_take_over, Some(1));
        assert_eq!(s.wealth_held_by_top_accounts, Some(0.6));
        assert_eq!(s.accounts_to_take_over, Some(2));
    }

    #[test]
    fn no_accounts_means_no_wealth_section() {
        let stats = store(false).network_stats(&windows());
        assert!(stats.wealth.is_none());
        assert_eq!(stats.summary.accounts_to_take_over, None);
        assert_eq!(stats.summary.wealth_held_by_top_accounts, None);
    }

    #[test]
    fn stats_serialize_to_json_shape() {
        let stats = store(true).network_stats(&windows());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["summary"]["total_blocks"], 5);
        assert_eq!(json["threshold"], 0.5);
        assert!(json["producers"]["outcomes"][0]["result"]["Ok"].is_object());
    }
}
