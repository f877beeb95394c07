//! Cross-network summary page.

use std::io::Write;

use chrono::{DateTime, Utc};

use concentra_metrics::summary::NetworkSummary;

use crate::error::ReportError;
use crate::markdown::MarkdownWriter;
use crate::network::{or_na, percent};

const COLUMNS: [&str; 8] = [
    "Network",
    "Consensus",
    "Blocks",
    "Nodes",
    "Producers",
    "Producers to take over",
    "Wealth held by top 100",
    "Accounts to take over",
];

/// One row per network, in the order given.
pub fn write_summary_table<W: Write>(
    w: &mut MarkdownWriter<W>,
    summaries: &[NetworkSummary],
    generated_at: DateTime<Utc>,
) -> Result<(), ReportError> {
    w.header(
        &format!("Decentralization Summary ({})", generated_at.format("%B %-d %Y")),
        1,
    )?;
    w.table_header(&COLUMNS)?;
    for s in summaries {
        w.table_row(&[
            s.name.clone(),
            or_na(s.consensus.as_deref()),
            s.total_blocks.to_string(),
            s.total_nodes.to_string(),
            s.total_producers.to_string(),
            or_na(s.producers_to_take_over),
            or_na(s.wealth_held_by_top_accounts.map(percent)),
            or_na(s.accounts_to_take_over),
        ])?;
    }
    w.blank()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary(name: &str, producers: Option<usize>) -> NetworkSummary {
        NetworkSummary {
            name: name.into(),
            consensus: Some("PoW".into()),
            total_blocks: 144,
            total_nodes: 9_000,
            total_producers: 18,
            producers_to_take_over: producers,
            wealth_held_by_top_accounts: None,
            accounts_to_take_over: None,
        }
    }

    #[test]
    fn one_row_per_network() {
        let mut w = MarkdownWriter::new(Vec::new());
        write_summary_table(
            &mut w,
            &[summary("Bitcoin", Some(3)), summary("Qtum", None)],
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap();
        let out = String::from_utf8(w.finish().unwrap()).unwrap();

        assert!(out.starts_with("# Decentralization Summary (January 1 1970)"));
        assert!(out.contains("| Bitcoin | PoW | 144 | 9000 | 18 | 3 | n/a | n/a |"));
        assert!(out.contains("| Qtum | PoW | 144 | 9000 | 18 | n/a | n/a | n/a |"));
    }
}
