//! # concentra-report
//! Markdown rendering of per-network results and the cross-network summary.

pub mod error;
pub mod markdown;
pub mod network;
pub mod summary;

pub use error::ReportError;
pub use markdown::MarkdownWriter;
pub use network::{write_network_report, REPORTED_RANKS};
pub use summary::write_summary_table;
