//! Session configuration and query windows.
//!
//! Provides [`StatsConfig`], the validated configuration a record store is
//! constructed with, and [`Window`], a named half-open interval used to scope
//! block queries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PERCENT_TO_TAKE_OVER;
use crate::error::ConfigurationError;

/// Returns `true` if `threshold` lies in `(0, 1]`.
pub fn is_valid_threshold(threshold: f64) -> bool {
    threshold > 0.0 && threshold <= 1.0
}

/// Configuration for one network's statistics session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatsConfig {
    /// Inclusive start of the loaded period.
    pub start: DateTime<Utc>,
    /// Exclusive end of the loaded period.
    pub end: DateTime<Utc>,
    /// Network name used in reports.
    pub name: String,
    /// Fraction of activity or wealth considered a takeover, in `(0, 1]`.
    pub percent_to_take_over: f64,
}

impl StatsConfig {
    /// Build a validated configuration.
    pub fn new(
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        percent_to_take_over: f64,
    ) -> Result<Self, ConfigurationError> {
        let config = Self {
            start,
            end,
            name: name.into(),
            percent_to_take_over,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration covering `span` before `end` with the default threshold.
    pub fn trailing(
        name: impl Into<String>,
        end: DateTime<Utc>,
        span: Duration,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, end - span, end, DEFAULT_PERCENT_TO_TAKE_OVER)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        if self.end <= self.start {
            return Err(ConfigurationError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        if !is_valid_threshold(self.percent_to_take_over) {
            return Err(ConfigurationError::InvalidThreshold(self.percent_to_take_over));
        }
        Ok(())
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The whole loaded period as a window.
    pub fn full_window(&self) -> Window {
        Window {
            name: self.name.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

/// A named half-open interval `[start, end)`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if end <= start {
            return Err(ConfigurationError::InvalidWindow {
                name,
                reason: format!("end {end} is not after start {start}"),
            });
        }
        Ok(Self { name, start, end })
    }

    /// Window of length `span` ending at `end`.
    pub fn trailing(
        name: impl Into<String>,
        end: DateTime<Utc>,
        span: Duration,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, end - span, end)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn valid_config_builds() {
        let cfg = StatsConfig::new("Qtum", ts(0), ts(10), 0.5).unwrap();
        assert_eq!(cfg.name, "Qtum");
        assert!(cfg.contains(ts(0)));
        assert!(!cfg.contains(ts(10)));
    }

    #[test]
    fn end_equal_to_start_is_rejected() {
        let err = StatsConfig::new("Qtum", ts(10), ts(10), 0.5).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTimeRange { .. }));
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert!(StatsConfig::new("Qtum", ts(10), ts(5), 0.5).is_err());
    }

    #[test]
    fn threshold_bounds() {
        assert!(StatsConfig::new("n", ts(0), ts(1), 1.0).is_ok());
        assert_eq!(
            StatsConfig::new("n", ts(0), ts(1), 0.0).unwrap_err(),
            ConfigurationError::InvalidThreshold(0.0)
        );
        assert!(StatsConfig::new("n", ts(0), ts(1), 1.5).is_err());
        assert!(StatsConfig::new("n", ts(0), ts(1), f64::NAN).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            StatsConfig::new("  ", ts(0), ts(1), 0.5).unwrap_err(),
            ConfigurationError::EmptyName
        );
    }

    #[test]
    fn trailing_config_uses_default_threshold() {
        let cfg = StatsConfig::trailing("Bitcoin", ts(86_400 * 7), Duration::weeks(1)).unwrap();
        assert_eq!(cfg.start, ts(0));
        assert_eq!(cfg.percent_to_take_over, DEFAULT_PERCENT_TO_TAKE_OVER);
    }

    #[test]
    fn trailing_window_is_half_open() {
        let w = Window::trailing("1 day", ts(86_400), Duration::days(1)).unwrap();
        assert!(w.contains(ts(0)));
        assert!(w.contains(ts(86_399)));
        assert!(!w.contains(ts(86_400)));
        assert_eq!(w.duration(), Duration::days(1));
    }

    #[test]
    fn empty_window_is_rejected() {
        let err = Window::new("bad", ts(5), ts(5)).unwrap_err();
        match err {
            ConfigurationError::InvalidWindow { name, .. } => assert_eq!(name, "bad"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
