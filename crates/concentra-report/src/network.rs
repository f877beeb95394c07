//! Per-network results page.

use std::io::Write;

use chrono::{DateTime, Utc};
use tracing::debug;

use concentra_core::constants::TOP_ACCOUNT_COUNTS;
use concentra_core::traits::AliasResolver;
use concentra_core::types::ThresholdResult;
use concentra_metrics::aggregate::{WindowOutcome, WindowStats};
use concentra_metrics::store::RecordStore;
use concentra_metrics::summary::NetworkStats;
use concentra_metrics::wealth::WealthStats;

use crate::error::ReportError;
use crate::markdown::MarkdownWriter;

/// 1-based ranks listed in producer and account tables.
pub const REPORTED_RANKS: [usize; 20] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 20, 30, 40, 50, 100,
];

pub(crate) fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub(crate) fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn threshold_percent(threshold: f64) -> String {
    format!("{:.0}%", threshold * 100.0)
}

/// Account alias from the rich list first, then the alias table.
fn display_name(store: &RecordStore, aliases: &dyn AliasResolver, id: &str) -> String {
    store
        .account(id)
        .and_then(|a| a.alias.clone())
        .unwrap_or_else(|| aliases.alias_or_id(id))
}

fn score_suffix(result: &ThresholdResult) -> &'static str {
    if result.unreachable {
        " (threshold not reached with all known actors)"
    } else {
        ""
    }
}

/// Render the full results page for one network.
pub fn write_network_report<W: Write>(
    w: &mut MarkdownWriter<W>,
    store: &RecordStore,
    stats: &NetworkStats,
    aliases: &dyn AliasResolver,
    source: &str,
    generated_at: DateTime<Utc>,
) -> Result<(), ReportError> {
    let summary = &stats.summary;
    w.header(
        &format!("{} ({})", summary.name, generated_at.format("%B %-d %Y")),
        1,
    )?;
    w.line("Sources:")?;
    w.line(source)?;
    w.blank()?;

    w.table_header(&["Metric", "Value"])?;
    w.table_row(&["Consensus".to_string(), or_na(summary.consensus.as_deref())])?;
    w.table_row(&["Total blocks".to_string(), summary.total_blocks.to_string()])?;
    w.table_row(&["Total nodes".to_string(), summary.total_nodes.to_string()])?;
    w.table_row(&["Total producers".to_string(), summary.total_producers.to_string()])?;
    w.table_row(&[
        "Producers to take over".to_string(),
        or_na(summary.producers_to_take_over),
    ])?;
    w.table_row(&[
        "Accounts to take over".to_string(),
        or_na(summary.accounts_to_take_over),
    ])?;
    w.divider()?;

    write_producer_section(w, stats, store, aliases)?;
    w.divider()?;
    write_wealth_section(w, stats, store, aliases)?;

    debug!(network = %summary.name, "network report rendered");
    Ok(())
}

fn write_producer_section<W: Write>(
    w: &mut MarkdownWriter<W>,
    stats: &NetworkStats,
    store: &RecordStore,
    aliases: &dyn AliasResolver,
) -> Result<(), ReportError> {
    w.header("Producer Stats", 2)?;
    for outcome in &stats.producers.outcomes {
        write_window(w, outcome, stats.threshold, store, aliases)?;
    }
    w.line(&format!(
        "**Number of producers needed to control {} of blocks: {}**",
        threshold_percent(stats.threshold),
        or_na(stats.producers.min_required)
    ))
}

fn write_window<W: Write>(
    w: &mut MarkdownWriter<W>,
    outcome: &WindowOutcome,
    threshold: f64,
    store: &RecordStore,
    aliases: &dyn AliasResolver,
) -> Result<(), ReportError> {
    w.header(&format!("{} Stats", outcome.window.name), 3)?;
    let ws: &WindowStats = match &outcome.result {
        Ok(ws) => ws,
        Err(e) => {
            w.quoted(&format!("Unavailable: {e}"))?;
            return w.blank();
        }
    };

    w.line(&format!(
        "{} producers over {} blocks",
        ws.producer_count(),
        ws.block_count
    ))?;
    w.line(&format!(
        "{} of the blocks are produced by {} of the top producers{}",
        threshold_percent(threshold),
        ws.threshold.required_count,
        score_suffix(&ws.threshold)
    ))?;
    w.blank()?;

    w.table_header(&["Rank", "Producer", "Blocks", "Share"])?;
    let total = ws.producers.total();
    for rank in REPORTED_RANKS {
        let Some(entry) = ws.producers.get(rank - 1) else {
            break;
        };
        w.table_row(&[
            rank.to_string(),
            display_name(store, aliases, &entry.id),
            format!("{}", entry.weight),
            percent(entry.weight / total),
        ])?;
    }
    w.blank()
}

fn write_wealth_section<W: Write>(
    w: &mut MarkdownWriter<W>,
    stats: &NetworkStats,
    store: &RecordStore,
    aliases: &dyn AliasResolver,
) -> Result<(), ReportError> {
    w.header("Wealth Stats", 2)?;
    let wealth: &WealthStats = match &stats.wealth {
        None => return w.line("No account data."),
        Some(Err(e)) => return w.quoted(&format!("Unavailable: {e}")),
        Some(Ok(wealth)) => wealth,
    };

    for count in TOP_ACCOUNT_COUNTS {
        if let Some(fraction) = wealth.top_share(count) {
            w.line(&format!("{} held by the top {count} accounts", percent(fraction)))?;
        }
    }
    w.blank()?;

    w.table_header(&["Rank", "Account", "Wealth", "Share"])?;
    for rank in REPORTED_RANKS {
        let Some(entry) = wealth.accounts.get(rank - 1) else {
            break;
        };
        w.table_row(&[
            rank.to_string(),
            display_name(store, aliases, &entry.id),
            format!("{}", entry.weight),
            or_na(wealth.share_of(rank - 1).map(percent)),
        ])?;
    }
    w.blank()?;

    w.line(&format!(
        "**Number of accounts needed to control {} of wealth: {}{}**",
        threshold_percent(stats.threshold),
        wealth.threshold.required_count,
        score_suffix(&wealth.threshold)
    ))
}
