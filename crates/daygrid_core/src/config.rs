//! Grid layout configuration.
//!
//! # Responsibility
//! - Hold the tunable geometry and timer values for the day grid.
//! - Validate host-provided overrides before they reach layout code.
//!
//! # Invariants
//! - The hour ordering is not part of this config; see `mapper::HOUR_ORDER`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default height of one hour row, in layout units.
pub const DEFAULT_ROW_HEIGHT: f64 = 60.0;
/// Default floor applied to timed block heights.
pub const DEFAULT_MINIMUM_VISIBLE_HEIGHT: f64 = 20.0;
/// Default live cursor refresh period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// How monthly repeats behave for months lacking the anchor day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyPolicy {
    /// Jan-31 produces nothing in February, April, June, ...
    #[default]
    Skip,
    /// Jan-31 lands on the last day of shorter months.
    ClampToMonthEnd,
}

/// Day grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub row_height: f64,
    pub minimum_visible_height: f64,
    #[serde(with = "duration_secs")]
    pub tick_interval: Duration,
    pub monthly_policy: MonthlyPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            minimum_visible_height: DEFAULT_MINIMUM_VISIBLE_HEIGHT,
            tick_interval: DEFAULT_TICK_INTERVAL,
            monthly_policy: MonthlyPolicy::Skip,
        }
    }
}

impl GridConfig {
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_monthly_policy(mut self, policy: MonthlyPolicy) -> Self {
        self.monthly_policy = policy;
        self
    }

    /// Validates geometry and timer invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::InvalidRowHeight(self.row_height));
        }
        if !self.minimum_visible_height.is_finite() || self.minimum_visible_height < 0.0 {
            return Err(ConfigError::InvalidMinimumHeight(
                self.minimum_visible_height,
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidRowHeight(f64),
    InvalidMinimumHeight(f64),
    ZeroTickInterval,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRowHeight(value) => {
                write!(f, "row_height must be a positive number, got {value}")
            }
            Self::InvalidMinimumHeight(value) => write!(
                f,
                "minimum_visible_height must be a non-negative number, got {value}"
            ),
            Self::ZeroTickInterval => write!(f, "tick_interval must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GridConfig, MonthlyPolicy};
    use std::time::Duration;

    #[test]
    fn default_config_is_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monthly_policy, MonthlyPolicy::Skip);
        assert_eq!(config.tick_interval, Duration::from_secs(60));
    }

    #[test]
    fn rejects_non_positive_row_height() {
        let err = GridConfig::default()
            .with_row_height(0.0)
            .validate()
            .expect_err("zero row height must fail");
        assert_eq!(err, ConfigError::InvalidRowHeight(0.0));
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let err = GridConfig::default()
            .with_tick_interval(Duration::ZERO)
            .validate()
            .expect_err("zero tick must fail");
        assert_eq!(err, ConfigError::ZeroTickInterval);
    }

    #[test]
    fn partial_json_overrides_keep_defaults() {
        let config: GridConfig = serde_json::from_value(serde_json::json!({
            "row_height": 48.0,
            "tick_interval": 30,
            "monthly_policy": "clamp_to_month_end"
        }))
        .expect("config should decode");

        assert_eq!(config.row_height, 48.0);
        assert_eq!(config.tick_interval, Duration::from_secs(30));
        assert_eq!(config.monthly_policy, MonthlyPolicy::ClampToMonthEnd);
        assert_eq!(config.minimum_visible_height, 20.0);
    }
}
