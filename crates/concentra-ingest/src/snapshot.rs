//! JSON snapshot files.
//!
//! A snapshot holds everything collected for one network at one point in
//! time:
//!
//! ```json
//! {
//!   "name": "Qtum",
//!   "consensus": "PoS",
//!   "total_node_count": 1200,
//!   "total_wealth": 100.0,
//!   "blocks": [{ "height": 1, "producer": "Qa1", "time": "2019-03-01T00:00:00Z" }],
//!   "accounts": [{ "id": "Qb2", "alias": "Exchange", "wealth": 12.5 }]
//! }
//! ```
//!
//! The file is parsed once on [`SnapshotLoader::open`]; [`Loader::load`]
//! then scopes the blocks to the session's time range.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use concentra_core::config::StatsConfig;
use concentra_core::error::LoadError;
use concentra_core::traits::Loader;
use concentra_core::types::{Account, Block, LoadedRecords};

/// On-disk layout of a snapshot file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<String>,
    #[serde(default)]
    pub total_node_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_wealth: Option<f64>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl NetworkSnapshot {
    /// Parse a snapshot from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        serde_json::from_slice(bytes).map_err(|e| LoadError::Malformed(e.to_string()))
    }

    /// Read and parse a snapshot file.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LoadError::Malformed(format!("{}: {e}", path.display())))
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<(), LoadError> {
        let json =
            serde_json::to_vec_pretty(self).map_err(|e| LoadError::Malformed(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))
    }

    /// Records relevant to `config`: blocks outside `[start, end)` are
    /// dropped, every record is validated.
    pub fn records_for(&self, config: &StatsConfig) -> Result<LoadedRecords, LoadError> {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            block.validate()?;
            if config.contains(block.timestamp) {
                blocks.push(block.clone());
            }
        }
        for account in &self.accounts {
            account.validate()?;
        }
        if let Some(total) = self.total_wealth {
            if !total.is_finite() || total <= 0.0 {
                return Err(LoadError::InvalidRecord(format!(
                    "total wealth {total} must be positive"
                )));
            }
        }

        debug!(
            network = %self.name,
            kept = blocks.len(),
            dropped = self.blocks.len() - blocks.len(),
            accounts = self.accounts.len(),
            "snapshot scoped to session"
        );
        Ok(LoadedRecords {
            blocks,
            accounts: self.accounts.clone(),
            total_node_count: self.total_node_count,
            total_wealth: self.total_wealth,
            consensus: self.consensus.clone(),
        })
    }
}

/// Loader backed by a snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    path: PathBuf,
    snapshot: NetworkSnapshot,
}

impl SnapshotLoader {
    /// Read and parse `path`. The network name is available right away so a
    /// session config can be built before loading.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let snapshot = NetworkSnapshot::read(&path)?;
        debug!(
            path = %path.display(),
            network = %snapshot.name,
            blocks = snapshot.blocks.len(),
            "snapshot opened"
        );
        Ok(Self { path, snapshot })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn network_name(&self) -> &str {
        &self.snapshot.name
    }

    pub fn snapshot(&self) -> &NetworkSnapshot {
        &self.snapshot
    }

    /// Latest block timestamp in the file, if any.
    pub fn latest_block_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.snapshot.blocks.iter().map(|b| b.timestamp).max()
    }
}

impl Loader for SnapshotLoader {
    fn source(&self) -> String {
        format!("snapshot {}", self.path.display())
    }

    fn load(&mut self, config: &StatsConfig) -> Result<LoadedRecords, LoadError> {
        self.snapshot.records_for(config)
    }
}
