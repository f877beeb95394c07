//! Loader returning preset records.

use tracing::debug;

use concentra_core::config::StatsConfig;
use concentra_core::error::LoadError;
use concentra_core::traits::Loader;
use concentra_core::types::{Account, Block, LoadedRecords};

/// Loader that hands over records built in memory.
///
/// Unlike [`SnapshotLoader`](crate::SnapshotLoader) it does not scope blocks
/// to the session range; the record store's window queries do that.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    name: String,
    records: LoadedRecords,
    loads: usize,
}

impl MemoryLoader {
    pub fn new(name: impl Into<String>, records: LoadedRecords) -> Self {
        Self {
            name: name.into(),
            records,
            loads: 0,
        }
    }

    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.records.blocks.extend(blocks);
        self
    }

    pub fn with_accounts(mut self, accounts: impl IntoIterator<Item = Account>) -> Self {
        self.records.accounts.extend(accounts);
        self
    }

    pub fn with_total_wealth(mut self, total: f64) -> Self {
        self.records.total_wealth = Some(total);
        self
    }

    pub fn with_total_node_count(mut self, count: u64) -> Self {
        self.records.total_node_count = count;
        self
    }

    /// How many times [`Loader::load`] has been called.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

impl Loader for MemoryLoader {
    fn source(&self) -> String {
        format!("memory:{}", self.name)
    }

    fn load(&mut self, config: &StatsConfig) -> Result<LoadedRecords, LoadError> {
        self.loads += 1;
        debug!(
            network = %config.name,
            blocks = self.records.blocks.len(),
            accounts = self.records.accounts.len(),
            "memory load"
        );
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn returns_preset_records_and_counts_loads() {
        let t = Utc.timestamp_opt(10, 0).unwrap();
        let mut loader = MemoryLoader::new("test", LoadedRecords::default())
            .with_blocks([Block::new("a", t)])
            .with_accounts([Account::new("x", 1.0)])
            .with_total_wealth(2.0)
            .with_total_node_count(3);
        let config = StatsConfig::new(
            "test",
            Utc.timestamp_opt(0, 0).unwrap(),
            Utc.timestamp_opt(100, 0).unwrap(),
            0.5,
        )
        .unwrap();

        let records = loader.load(&config).unwrap();
        assert_eq!(records.blocks.len(), 1);
        assert_eq!(records.total_wealth, Some(2.0));
        assert_eq!(records.total_node_count, 3);
        assert_eq!(loader.load_count(), 1);
        assert_eq!(loader.source(), "memory:test");
    }
}
