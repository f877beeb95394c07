//! Deterministic ranking of actors by weight.
//!
//! Actors are ordered by weight descending; equal weights are ordered by id
//! ascending (byte-wise lexicographic). The order is total, so identical
//! input always yields an identical ranking and an identical threshold
//! prefix downstream.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use concentra_core::types::{Account, Block, ProducerStat, RankedEntry};

/// Ranked actors together with the sum of all their weights.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Ranking {
    entries: Vec<RankedEntry>,
    total: f64,
}

/// Weight descending, then id ascending.
fn rank_order(a: &(String, f64), b: &(String, f64)) -> Ordering {
    OrderedFloat(b.1)
        .cmp(&OrderedFloat(a.1))
        .then_with(|| a.0.cmp(&b.0))
}

impl Ranking {
    /// Rank `(id, weight)` pairs. Repeated ids are summed into one actor.
    pub fn from_weights<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut merged: BTreeMap<String, f64> = BTreeMap::new();
        for (id, weight) in weights {
            *merged.entry(id.into()).or_insert(0.0) += weight;
        }

        // Summed in id order so the total does not depend on input order.
        let total = merged.values().sum();

        let mut pairs: Vec<(String, f64)> = merged.into_iter().collect();
        pairs.sort_by(rank_order);

        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(rank, (id, weight))| RankedEntry { id, weight, rank })
            .collect();

        Self { entries, total }
    }

    /// Rank producers by block count.
    pub fn from_producers(stats: &[ProducerStat]) -> Self {
        Self::from_weights(
            stats
                .iter()
                .map(|s| (s.id.clone(), s.block_count as f64)),
        )
    }

    /// Rank accounts by wealth.
    pub fn from_accounts(accounts: &[Account]) -> Self {
        Self::from_weights(accounts.iter().map(|a| (a.id.clone(), a.wealth)))
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at 0-based `rank`.
    pub fn get(&self, rank: usize) -> Option<&RankedEntry> {
        self.entries.get(rank)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter()
    }

    /// Combined weight of the top `n` entries (all entries if fewer).
    pub fn cumulative_weight(&self, n: usize) -> f64 {
        self.entries.iter().take(n).map(|e| e.weight).sum()
    }
}

/// Count blocks per producer. Output is ordered by producer id.
pub fn producer_counts<'a, I>(blocks: I) -> Vec<ProducerStat>
where
    I: IntoIterator<Item = &'a Block>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for block in blocks {
        *counts.entry(block.producer_id.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(id, block_count)| ProducerStat {
            id: id.to_string(),
            block_count,
        })
        .collect()
}
