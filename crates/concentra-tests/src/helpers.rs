//! Shared builders for pipeline tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use concentra_core::config::{StatsConfig, Window};
use concentra_core::types::{Account, Block, LoadedRecords};
use concentra_ingest::MemoryLoader;
use concentra_metrics::RecordStore;

pub const DAY: i64 = 86_400;

/// Fixed epoch all synthetic networks end at: 2019-03-08T00:00:00Z.
pub fn end_of_week() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 3, 8, 0, 0, 0).unwrap()
}

/// `secs` seconds after the start of the synthetic week.
pub fn at(secs: i64) -> DateTime<Utc> {
    end_of_week() - Duration::days(7) + Duration::seconds(secs)
}

/// One block per entry, spaced `spacing` seconds apart from `start`.
pub fn blocks_from(producers: &[&str], start: i64, spacing: i64) -> Vec<Block> {
    producers
        .iter()
        .enumerate()
        .map(|(i, p)| Block::new(*p, at(start + i as i64 * spacing)).with_height(i as u64))
        .collect()
}

/// Producer `id` repeated `count` times, for building skewed distributions.
pub fn repeated<'a>(counts: &[(&'a str, usize)]) -> Vec<&'a str> {
    counts
        .iter()
        .flat_map(|(id, n)| std::iter::repeat_n(*id, *n))
        .collect()
}

pub fn accounts(entries: &[(&str, f64)]) -> Vec<Account> {
    entries.iter().map(|(id, w)| Account::new(*id, *w)).collect()
}

pub fn week_config(name: &str) -> StatsConfig {
    StatsConfig::new(name, at(0), end_of_week(), 0.5).unwrap()
}

/// The default pair: trailing day and trailing week.
pub fn day_and_week() -> Vec<Window> {
    vec![
        Window::trailing("1 day", end_of_week(), Duration::days(1)).unwrap(),
        Window::trailing("1 week", end_of_week(), Duration::weeks(1)).unwrap(),
    ]
}

/// Load a store through a [`MemoryLoader`] the way the binary loads
/// snapshots.
pub fn load_store(name: &str, blocks: Vec<Block>, accounts: Vec<Account>, total_wealth: Option<f64>) -> RecordStore {
    let records = LoadedRecords {
        blocks,
        accounts,
        total_node_count: 0,
        total_wealth,
        consensus: None,
    };
    let mut loader = MemoryLoader::new(name, records);
    RecordStore::load(week_config(name), &mut loader).unwrap()
}
