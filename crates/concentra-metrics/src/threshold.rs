//! Minimal covering prefix of a ranking.
//!
//! Walks a ranked sequence once, accumulating weight, and stops at the first
//! prefix whose weight reaches `threshold * total`. Because the sequence is
//! sorted by weight descending, that prefix is the smallest set of actors
//! controlling the threshold share.

use tracing::warn;

use concentra_core::config::is_valid_threshold;
use concentra_core::error::MetricsError;
use concentra_core::types::{RankedEntry, ThresholdResult};

use crate::ranking::Ranking;

/// Smallest prefix of `ranked` whose weight reaches `threshold * total`.
///
/// If the whole sequence falls short (missing data, or float drift when
/// `total` is the exact sum) the full length is returned with
/// [`ThresholdResult::unreachable`] set.
pub fn solve(
    ranked: &[RankedEntry],
    total: f64,
    threshold: f64,
) -> Result<ThresholdResult, MetricsError> {
    if !is_valid_threshold(threshold) {
        return Err(MetricsError::InvalidThreshold(threshold));
    }
    if !total.is_finite() || total <= 0.0 {
        return Err(MetricsError::InsufficientData(format!(
            "total weight is {total}, cannot compute a {threshold} share"
        )));
    }
    if ranked.is_empty() {
        return Err(MetricsError::InsufficientData("ranking is empty".into()));
    }

    let target = threshold * total;
    let mut running = 0.0;
    for (i, entry) in ranked.iter().enumerate() {
        running += entry.weight;
        if running >= target {
            return Ok(ThresholdResult {
                required_count: i + 1,
                achieved_fraction: running / total,
                unreachable: false,
            });
        }
    }

    warn!(
        entries = ranked.len(),
        covered = running,
        target,
        "threshold unreachable with all ranked actors"
    );
    Ok(ThresholdResult {
        required_count: ranked.len(),
        achieved_fraction: running / total,
        unreachable: true,
    })
}

impl Ranking {
    /// Solve against this ranking's own total.
    pub fn solve(&self, threshold: f64) -> Result<ThresholdResult, MetricsError> {
        solve(self.entries(), self.total(), threshold)
    }

    /// Solve against an externally supplied total, such as a network's
    /// total wealth when only a rich list is ranked.
    pub fn solve_with_total(
        &self,
        total: f64,
        threshold: f64,
    ) -> Result<ThresholdResult, MetricsError> {
        solve(self.entries(), total, threshold)
    }
}
