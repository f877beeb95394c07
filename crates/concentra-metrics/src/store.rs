//! In-memory record store for one network's session.
//!
//! The store is append-only while a loader populates it and read-only once
//! [`RecordStore::finish_load`] seals it. Blocks are kept in chronological
//! order after sealing, so window queries are two binary searches.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use concentra_core::config::{StatsConfig, Window};
use concentra_core::error::{ConfigurationError, LoadError, StatsError};
use concentra_core::traits::Loader;
use concentra_core::types::{Account, Block, LoadedRecords};

/// Relative slack allowed between summed account wealth and the reported total.
const WEALTH_SUM_TOLERANCE: f64 = 1e-6;

/// Normalized blocks and accounts plus scalar context for one network.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StatsConfig,
    blocks: Vec<Block>,
    accounts: Vec<Account>,
    total_node_count: u64,
    total_wealth: Option<f64>,
    consensus: Option<String>,
    /// Blocks were appended in non-decreasing timestamp order.
    chronological: bool,
    sealed: bool,
}

impl RecordStore {
    /// Create an empty store. Fails if `config` is invalid.
    pub fn new(config: StatsConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            blocks: Vec::new(),
            accounts: Vec::new(),
            total_node_count: 0,
            total_wealth: None,
            consensus: None,
            chronological: true,
            sealed: false,
        })
    }

    /// Create a store, run `loader` once, and seal the result.
    pub fn load(config: StatsConfig, loader: &mut dyn Loader) -> Result<Self, StatsError> {
        let mut store = Self::new(config)?;
        info!(
            network = %store.config.name,
            source = %loader.source(),
            "loading records"
        );
        let records = loader.load(&store.config)?;
        store.ingest(records)?;
        store.finish_load();
        Ok(store)
    }

    /// Append everything a loader returned.
    pub fn ingest(&mut self, records: LoadedRecords) -> Result<(), StatsError> {
        let LoadedRecords {
            blocks,
            accounts,
            total_node_count,
            total_wealth,
            consensus,
        } = records;

        for block in blocks {
            self.add_block(block)?;
        }
        for account in accounts {
            self.add_account(account)?;
        }
        self.set_total_node_count(total_node_count)?;
        if let Some(total) = total_wealth {
            self.set_total_wealth(total)?;
        }
        if consensus.is_some() {
            self.consensus = consensus;
        }

        debug!(
            blocks = self.blocks.len(),
            accounts = self.accounts.len(),
            nodes = self.total_node_count,
            "ingested records"
        );
        Ok(())
    }

    /// Append a block. No dedup is performed.
    pub fn add_block(&mut self, block: Block) -> Result<(), LoadError> {
        self.ensure_open()?;
        block.validate()?;
        if let Some(last) = self.blocks.last() {
            if block.timestamp < last.timestamp {
                self.chronological = false;
            }
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Append an account. No dedup is performed.
    pub fn add_account(&mut self, account: Account) -> Result<(), LoadError> {
        self.ensure_open()?;
        account.validate()?;
        self.accounts.push(account);
        Ok(())
    }

    pub fn set_total_node_count(&mut self, count: u64) -> Result<(), LoadError> {
        self.ensure_open()?;
        self.total_node_count = count;
        Ok(())
    }

    /// Set the denominator for wealth shares. Must be positive and finite.
    pub fn set_total_wealth(&mut self, total: f64) -> Result<(), StatsError> {
        self.ensure_open()?;
        if !total.is_finite() || total <= 0.0 {
            return Err(ConfigurationError::InvalidTotalWealth(total).into());
        }
        self.total_wealth = Some(total);
        Ok(())
    }

    pub fn set_consensus(&mut self, consensus: impl Into<String>) -> Result<(), LoadError> {
        self.ensure_open()?;
        self.consensus = Some(consensus.into());
        Ok(())
    }

    /// End the load phase: sort blocks once if they arrived out of order,
    /// then reject further writes. Calling this twice is a no-op.
    pub fn finish_load(&mut self) {
        if self.sealed {
            return;
        }
        if !self.chronological {
            debug!(blocks = self.blocks.len(), "blocks arrived out of order, sorting once");
            // Stable: equal timestamps keep loader order.
            self.blocks.sort_by_key(|b| b.timestamp);
            self.chronological = true;
        }
        if let Some(total) = self.total_wealth {
            let held: f64 = self.accounts.iter().map(|a| a.wealth).sum();
            if held > total * (1.0 + WEALTH_SUM_TOLERANCE) {
                warn!(
                    network = %self.config.name,
                    held,
                    total,
                    "accounts hold more than the reported total wealth"
                );
            }
        }
        self.sealed = true;
        info!(
            network = %self.config.name,
            blocks = self.blocks.len(),
            accounts = self.accounts.len(),
            "record store sealed"
        );
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn ensure_open(&self) -> Result<(), LoadError> {
        if self.sealed {
            return Err(LoadError::StoreSealed);
        }
        Ok(())
    }

    /// Blocks with `start <= timestamp < end`, in store order.
    pub fn get_blocks(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Block> {
        if end <= start {
            return Vec::new();
        }
        if self.chronological {
            let lo = self.blocks.partition_point(|b| b.timestamp < start);
            let hi = self.blocks.partition_point(|b| b.timestamp < end);
            self.blocks[lo..hi].iter().collect()
        } else {
            self.blocks
                .iter()
                .filter(|b| start <= b.timestamp && b.timestamp < end)
                .collect()
        }
    }

    /// Blocks inside `window`.
    pub fn blocks_in(&self, window: &Window) -> Vec<&Block> {
        self.get_blocks(window.start, window.end)
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn total_node_count(&self) -> u64 {
        self.total_node_count
    }

    pub fn total_wealth(&self) -> Option<f64> {
        self.total_wealth
    }

    pub fn consensus(&self) -> Option<&str> {
        self.consensus.as_deref()
    }

    /// Account with the given id, if loaded. Returns the first match.
    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn store() -> RecordStore {
        let config = StatsConfig::new("Testnet", ts(0), ts(1_000), 0.5).unwrap();
        RecordStore::new(config).unwrap()
    }

    struct FixedLoader(LoadedRecords);

    impl Loader for FixedLoader {
        fn source(&self) -> String {
            "fixed".into()
        }

        fn load(&mut self, _config: &StatsConfig) -> Result<LoadedRecords, LoadError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = StatsConfig {
            start: ts(10),
            end: ts(10),
            name: "n".into(),
            percent_to_take_over: 0.5,
        };
        assert!(matches!(
            RecordStore::new(config),
            Err(ConfigurationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn get_blocks_is_half_open() {
        let mut s = store();
        for t in [10, 20, 30, 40] {
            s.add_block(Block::new("p", ts(t))).unwrap();
        }
        s.finish_load();
        let got: Vec<_> = s
            .get_blocks(ts(20), ts(40))
            .iter()
            .map(|b| b.timestamp)
            .collect();
        assert_eq!(got, vec![ts(20), ts(30)]);
    }

    #[test]
    fn get_blocks_empty_or_inverted_range() {
        let mut s = store();
        s.add_block(Block::new("p", ts(10))).unwrap();
        assert!(s.get_blocks(ts(10), ts(10)).is_empty());
        assert!(s.get_blocks(ts(20), ts(0)).is_empty());
    }

    #[test]
    fn out_of_order_blocks_are_sorted_once_stably() {
        let mut s = store();
        s.add_block(Block::new("late", ts(50))).unwrap();
        s.add_block(Block::new("first", ts(10))).unwrap();
        s.add_block(Block::new("second", ts(10))).unwrap();
        // Before sealing the filter path is used and store order is kept.
        let before: Vec<String> = s
            .get_blocks(ts(0), ts(100))
            .iter()
            .map(|b| b.producer_id.clone())
            .collect();
        assert_eq!(before, vec!["late", "first", "second"]);

        s.finish_load();
        let after: Vec<_> = s.blocks().iter().map(|b| b.producer_id.as_str()).collect();
        assert_eq!(after, vec!["first", "second", "late"]);
    }

    #[test]
    fn sealed_store_rejects_writes() {
        let mut s = store();
        s.finish_load();
        assert!(s.is_sealed());
        assert_eq!(s.add_block(Block::new("p", ts(1))), Err(LoadError::StoreSealed));
        assert_eq!(s.add_account(Account::new("a", 1.0)), Err(LoadError::StoreSealed));
        assert!(s.set_total_wealth(1.0).is_err());
    }

    #[test]
    fn invalid_records_are_rejected() {
        let mut s = store();
        assert!(s.add_account(Account::new("a", -5.0)).is_err());
        assert!(s.add_block(Block::new("", ts(1))).is_err());
        assert!(s.accounts().is_empty());
        assert!(s.blocks().is_empty());
    }

    #[test]
    fn total_wealth_must_be_positive() {
        let mut s = store();
        assert!(matches!(
            s.set_total_wealth(0.0),
            Err(StatsError::Configuration(ConfigurationError::InvalidTotalWealth(_)))
        ));
        s.set_total_wealth(100.0).unwrap();
        assert_eq!(s.total_wealth(), Some(100.0));
    }

    #[test]
    fn load_runs_loader_and_seals() {
        let records = LoadedRecords {
            blocks: vec![Block::new("a", ts(5)), Block::new("b", ts(6))],
            accounts: vec![Account::new("x", 40.0)],
            total_node_count: 12,
            total_wealth: Some(100.0),
            consensus: Some("PoS".into()),
        };
        let config = StatsConfig::new("Qtum", ts(0), ts(10), 0.5).unwrap();
        let s = RecordStore::load(config, &mut FixedLoader(records)).unwrap();
        assert!(s.is_sealed());
        assert_eq!(s.blocks().len(), 2);
        assert_eq!(s.total_node_count(), 12);
        assert_eq!(s.consensus(), Some("PoS"));
        assert_eq!(s.account("x").map(|a| a.wealth), Some(40.0));
    }

    #[test]
    fn load_propagates_invalid_total_wealth() {
        let records = LoadedRecords {
            total_wealth: Some(-1.0),
            ..LoadedRecords::default()
        };
        let config = StatsConfig::new("Qtum", ts(0), ts(10), 0.5).unwrap();
        let err = RecordStore::load(config, &mut FixedLoader(records)).unwrap_err();
        assert!(matches!(err, StatsError::Configuration(_)));
    }

    proptest! {
        #[test]
        fn window_filter_matches_predicate(
            times in prop::collection::vec(0i64..1_000, 0..60),
            s in 0i64..1_000,
            len in 0i64..1_000,
        ) {
            let mut st = store();
            for t in &times {
                st.add_block(Block::new("p", ts(*t))).unwrap();
            }
            st.finish_load();
            let (start, end) = (ts(s), ts(s + len));
            let got = st.get_blocks(start, end).len();
            let expected = times.iter().filter(|&&t| s <= t && t < s + len).count();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn disjoint_windows_partition_blocks(
            times in prop::collection::vec(0i64..1_000, 0..60),
            split in 0i64..1_000,
        ) {
            let mut st = store();
            for t in &times {
                st.add_block(Block::new("p", ts(*t))).unwrap();
            }
            st.finish_load();
            let left = st.get_blocks(ts(0), ts(split)).len();
            let right = st.get_blocks(ts(split), ts(1_000)).len();
            prop_assert_eq!(left + right, times.len());
        }
    }
}
