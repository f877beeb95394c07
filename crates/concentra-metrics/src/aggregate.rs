//! Producer statistics across several time windows.
//!
//! Each window is ranked and solved independently; a failing window is
//! recorded next to the successful ones instead of aborting the run. The
//! windows reduce to the smallest required producer count, since the weakest
//! window bounds the real cost of a takeover.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use concentra_core::config::Window;
use concentra_core::error::MetricsError;
use concentra_core::types::ThresholdResult;

use crate::ranking::{Ranking, producer_counts};
use crate::store::RecordStore;

/// Producer statistics for one window.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WindowStats {
    /// Blocks produced inside the window.
    pub block_count: usize,
    /// Producers ranked by block count.
    pub producers: Ranking,
    /// Minimal producer set reaching the threshold.
    pub threshold: ThresholdResult,
}

impl WindowStats {
    /// Distinct producers seen in the window.
    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }
}

/// Result of evaluating one window.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WindowOutcome {
    pub window: Window,
    pub result: Result<WindowStats, MetricsError>,
}

/// Per-window outcomes plus the reduced producer score.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MultiWindowReport {
    /// Outcomes in the order the windows were given.
    pub outcomes: Vec<WindowOutcome>,
    /// Smallest `required_count` over the successful windows.
    pub min_required: Option<usize>,
}

impl MultiWindowReport {
    pub fn from_outcomes(outcomes: Vec<WindowOutcome>) -> Self {
        let min_required = min_required_count(
            outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().ok())
                .map(|s| &s.threshold),
        );
        Self {
            outcomes,
            min_required,
        }
    }

    /// Outcome for the window called `name`.
    pub fn outcome(&self, name: &str) -> Option<&WindowOutcome> {
        self.outcomes.iter().find(|o| o.window.name == name)
    }

    pub fn successes(&self) -> impl Iterator<Item = (&Window, &WindowStats)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|s| (&o.window, s)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Window, &MetricsError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.window, e)))
    }

    /// Successful window with the most distinct producers.
    pub fn widest(&self) -> Option<&WindowStats> {
        self.successes()
            .map(|(_, s)| s)
            .max_by_key(|s| s.producer_count())
    }
}

/// Minimum over `results`, or `None` if there are none.
pub fn min_required_count<'a, I>(results: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a ThresholdResult>,
{
    results.into_iter().map(|r| r.required_count).min()
}

impl RecordStore {
    /// Rank the producers of one window and solve `threshold` against them.
    pub fn producer_stats(
        &self,
        window: &Window,
        threshold: f64,
    ) -> Result<WindowStats, MetricsError> {
        let blocks = self.blocks_in(window);
        let producers = Ranking::from_producers(&producer_counts(blocks.iter().copied()));
        if producers.is_empty() {
            return Err(MetricsError::InsufficientData(format!(
                "no blocks in window {:?}",
                window.name
            )));
        }
        let result = producers.solve(threshold)?;
        debug!(
            network = %self.name(),
            window = %window.name,
            blocks = blocks.len(),
            producers = producers.len(),
            required = result.required_count,
            "window evaluated"
        );
        Ok(WindowStats {
            block_count: blocks.len(),
            producers,
            threshold: result,
        })
    }

    fn window_outcome(&self, window: &Window, threshold: f64) -> WindowOutcome {
        let result = self.producer_stats(window, threshold);
        if let Err(e) = &result {
            warn!(network = %self.name(), window = %window.name, "window failed: {e}");
        }
        WindowOutcome {
            window: window.clone(),
            result,
        }
    }

    /// Evaluate every window with `threshold` and reduce to the minimum.
    #[cfg(feature = "parallel")]
    pub fn evaluate_windows(&self, windows: &[Window], threshold: f64) -> MultiWindowReport {
        let outcomes = windows
            .par_iter()
            .map(|w| self.window_outcome(w, threshold))
            .collect();
        MultiWindowReport::from_outcomes(outcomes)
    }

    /// Evaluate every window with `threshold` and reduce to the minimum.
    #[cfg(not(feature = "parallel"))]
    pub fn evaluate_windows(&self, windows: &[Window], threshold: f64) -> MultiWindowReport {
        let outcomes = windows
            .iter()
            .map(|w| self.window_outcome(w, threshold))
            .collect();
        MultiWindowReport::from_outcomes(outcomes)
    }
}
