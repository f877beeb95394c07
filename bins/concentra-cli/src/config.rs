//! Run configuration for the `concentra` binary.
//!
//! Provides [`RunConfig`] with the default pair of trailing windows (1 day
//! and 1 week) and the parsers used for `--window NAME=DURATION` values.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

use concentra_core::config::Window;
use concentra_core::constants::{
    DEFAULT_PERCENT_TO_TAKE_OVER, WINDOW_1_DAY, WINDOW_1_WEEK, one_day, one_week,
};
use concentra_core::error::ConfigurationError;

/// Output produced for each network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<name>.results.md` per network plus `summary.md`.
    #[default]
    Markdown,
    /// All network statistics as one JSON document on stdout.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format {other:?} (expected markdown or json)")),
        }
    }
}

/// A window to evaluate, anchored at the run's end instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub name: String,
    pub span: Duration,
}

impl WindowSpec {
    pub fn anchored(&self, end: DateTime<Utc>) -> Result<Window, ConfigurationError> {
        Window::trailing(self.name.clone(), end, self.span)
    }
}

/// Parse `12h`, `1d`, `2w` or `30m` (minutes).
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration {s:?} has no unit (use m, h, d or w)"))?;
    let (digits, unit) = s.split_at(split);
    let n: i64 = digits
        .parse()
        .map_err(|_| format!("duration {s:?} has no amount"))?;
    if n == 0 {
        return Err(format!("duration {s:?} must be positive"));
    }
    match unit {
        "m" => Ok(Duration::minutes(n)),
        "h" => Ok(Duration::hours(n)),
        "d" => Ok(Duration::days(n)),
        "w" => Ok(Duration::weeks(n)),
        other => Err(format!("unknown duration unit {other:?} (use m, h, d or w)")),
    }
}

/// Parse `NAME=DURATION`, e.g. `1 day=1d`.
pub fn parse_window_spec(s: &str) -> Result<WindowSpec, String> {
    let (name, span) = s
        .split_once('=')
        .ok_or_else(|| format!("window {s:?} is not NAME=DURATION"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("window {s:?} has an empty name"));
    }
    Ok(WindowSpec {
        name: name.to_string(),
        span: parse_duration(span)?,
    })
}

/// Everything one `concentra report` run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub snapshots: Vec<PathBuf>,
    /// Exclusive end of every window. `None` uses just past each snapshot's
    /// latest block.
    pub end: Option<DateTime<Utc>>,
    pub windows: Vec<WindowSpec>,
    pub threshold: f64,
    pub aliases: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub log_level: String,
    pub log_format: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            end: None,
            windows: default_windows(),
            threshold: DEFAULT_PERCENT_TO_TAKE_OVER,
            aliases: None,
            output_dir: PathBuf::from("results"),
            format: OutputFormat::Markdown,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl RunConfig {
    /// Longest window span; the session loads exactly this much history.
    pub fn lookback(&self) -> Duration {
        self.windows
            .iter()
            .map(|w| w.span)
            .max()
            .unwrap_or_else(one_week)
    }
}

pub fn default_windows() -> Vec<WindowSpec> {
    vec![
        WindowSpec {
            name: WINDOW_1_DAY.to_string(),
            span: one_day(),
        },
        WindowSpec {
            name: WINDOW_1_WEEK.to_string(),
            span: one_week(),
        },
    ]
}

/// File-name friendly form of a network name.
pub fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}
