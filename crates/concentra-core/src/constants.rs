//! Engine constants and reporting defaults.

use chrono::Duration;

/// Default fraction of activity or wealth an attacker needs to take over a network.
pub const DEFAULT_PERCENT_TO_TAKE_OVER: f64 = 0.5;

/// Account counts whose accumulated wealth share is reported ("held by the top N").
pub const TOP_ACCOUNT_COUNTS: [usize; 3] = [10, 50, 100];

/// Account count used for the wealth column of the network summary.
pub const SUMMARY_TOP_ACCOUNTS: usize = 100;

/// Name of the trailing one-day window.
pub const WINDOW_1_DAY: &str = "1 day";

/// Name of the trailing one-week window.
pub const WINDOW_1_WEEK: &str = "1 week";

/// Length of the trailing one-day window.
pub fn one_day() -> Duration {
    Duration::days(1)
}

/// Length of the trailing one-week window.
pub fn one_week() -> Duration {
    Duration::weeks(1)
}
