//! Configuration types for playback runs and logging.

use crate::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a run takes, and how that time is split across stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DurationPolicy {
    /// One total budget drawn uniformly from `[min_ms, max_ms]` per run and
    /// split evenly across stages.
    RandomizedTotal {
        /// Lower bound of the total budget.
        min_ms: u64,
        /// Upper bound of the total budget.
        max_ms: u64,
    },
    /// Every stage gets the same fixed budget.
    FixedPerStage {
        /// Budget of a single stage.
        stage_ms: u64,
    },
    /// Every line gets the same fixed interval.
    FixedPerLine {
        /// Interval before each line.
        line_ms: u64,
    },
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self::RandomizedTotal {
            min_ms: 30_000,
            max_ms: 50_000,
        }
    }
}

impl DurationPolicy {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        match *self {
            Self::RandomizedTotal { min_ms, max_ms } => {
                if min_ms > max_ms {
                    return Err(ConfigError::new("duration.min_ms", "exceeds max_ms")
                        .with_fix_hint("swap the bounds or make them equal"));
                }
                if max_ms == 0 {
                    return Err(ConfigError::new("duration.max_ms", "must be positive"));
                }
            }
            Self::FixedPerStage { stage_ms: 0 } => {
                return Err(ConfigError::new("duration.stage_ms", "must be positive"));
            }
            Self::FixedPerLine { line_ms: 0 } => {
                return Err(ConfigError::new("duration.line_ms", "must be positive"));
            }
            Self::FixedPerStage { .. } | Self::FixedPerLine { .. } => {}
        }
        Ok(())
    }
}

/// Largest accepted jitter multiplier.
pub const MAX_JITTER: f64 = 10.0;

/// Half-open range `[min, max)` of the multiplier applied to each line delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl Default for JitterRange {
    fn default() -> Self {
        Self { min: 0.5, max: 1.5 }
    }
}

impl JitterRange {
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 {
            return Err(ConfigError::new("jitter", "bounds must be finite and non-negative"));
        }
        if self.min >= self.max {
            return Err(ConfigError::new("jitter.min", "must be below jitter.max")
                .with_fix_hint("omit jitter to disable it"));
        }
        if self.max > MAX_JITTER {
            return Err(ConfigError::new("jitter.max", format!("must not exceed {MAX_JITTER}")));
        }
        Ok(())
    }
}

/// Configuration of a playback run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Duration policy.
    #[serde(default)]
    pub duration: DurationPolicy,
    /// Pause between the end of one stage and the start of the next.
    #[serde(default = "default_inter_stage_pause")]
    pub inter_stage_pause_ms: u64,
    /// Delay between the last line and the completion notification.
    #[serde(default = "default_terminal_delay")]
    pub terminal_delay_ms: u64,
    /// Per-line jitter; `None` disables it.
    #[serde(default = "default_jitter")]
    pub jitter: Option<JitterRange>,
    /// Seed for the run's random source; `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_inter_stage_pause() -> u64 {
    500
}

fn default_terminal_delay() -> u64 {
    2000
}

#[allow(clippy::unnecessary_wraps)]
fn default_jitter() -> Option<JitterRange> {
    Some(JitterRange::default())
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            duration: DurationPolicy::default(),
            inter_stage_pause_ms: default_inter_stage_pause(),
            terminal_delay_ms: default_terminal_delay(),
            jitter: default_jitter(),
            seed: None,
        }
    }
}

impl PlaybackConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for the ZK computation table: 2.5 s per stage.
    #[must_use]
    pub fn zk_computation() -> Self {
        Self::default().with_duration(DurationPolicy::FixedPerStage { stage_ms: 2500 })
    }

    /// Preset for the badge forging table: a line every 400 ms, no jitter,
    /// no pauses.
    #[must_use]
    pub fn badge_forge() -> Self {
        Self::default()
            .with_duration(DurationPolicy::FixedPerLine { line_ms: 400 })
            .with_jitter(None)
            .with_inter_stage_pause(Duration::ZERO)
            .with_terminal_delay(Duration::ZERO)
    }

    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field.
    pub fn validate(&self) -> Result<()> {
        self.duration.validate()?;
        if let Some(jitter) = &self.jitter {
            jitter.validate()?;
        }
        Ok(())
    }

    /// Sets the duration policy.
    #[must_use]
    pub fn with_duration(mut self, duration: DurationPolicy) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the inter-stage pause.
    #[must_use]
    pub fn with_inter_stage_pause(mut self, pause: Duration) -> Self {
        self.inter_stage_pause_ms = duration_ms(pause);
        self
    }

    /// Sets the terminal delay.
    #[must_use]
    pub fn with_terminal_delay(mut self, delay: Duration) -> Self {
        self.terminal_delay_ms = duration_ms(delay);
        self
    }

    /// Sets or disables the jitter range.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Option<JitterRange>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Gets the inter-stage pause as a Duration.
    #[must_use]
    pub fn inter_stage_pause(&self) -> Duration {
        Duration::from_millis(self.inter_stage_pause_ms)
    }

    /// Gets the terminal delay as a Duration.
    #[must_use]
    pub fn terminal_delay(&self) -> Duration {
        Duration::from_millis(self.terminal_delay_ms)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info").
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Sets the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PlaybackError;

    #[test]
    fn test_defaults() {
        let config = PlaybackConfig::new();
        assert_eq!(
            config.duration,
            DurationPolicy::RandomizedTotal {
                min_ms: 30_000,
                max_ms: 50_000
            }
        );
        assert_eq!(config.inter_stage_pause(), Duration::from_millis(500));
        assert_eq!(config.terminal_delay(), Duration::from_secs(2));
        assert_eq!(config.jitter, Some(JitterRange { min: 0.5, max: 1.5 }));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = PlaybackConfig::from_json(
            r#"{"duration": {"policy": "fixed_per_stage", "stage_ms": 2500}, "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(config.duration, DurationPolicy::FixedPerStage { stage_ms: 2500 });
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.inter_stage_pause_ms, 500);
        assert!(config.jitter.is_some());
    }

    #[test]
    fn test_from_json_null_jitter_disables_it() {
        let config = PlaybackConfig::from_json(r#"{"jitter": null}"#).unwrap();
        assert!(config.jitter.is_none());
    }

    #[test]
    fn test_inverted_budget_rejected() {
        let err = PlaybackConfig::from_json(
            r#"{"duration": {"policy": "randomized_total", "min_ms": 900, "max_ms": 100}}"#,
        )
        .unwrap_err();
        match err {
            PlaybackError::InvalidConfig(e) => assert_eq!(e.field, "duration.min_ms"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_budgets_rejected() {
        for policy in [
            DurationPolicy::FixedPerStage { stage_ms: 0 },
            DurationPolicy::FixedPerLine { line_ms: 0 },
            DurationPolicy::RandomizedTotal { min_ms: 0, max_ms: 0 },
        ] {
            assert!(PlaybackConfig::new().with_duration(policy).validate().is_err());
        }
    }

    #[test]
    fn test_bad_jitter_rejected() {
        let config = PlaybackConfig::new().with_jitter(Some(JitterRange { min: 1.5, max: 0.5 }));
        assert!(config.validate().is_err());

        let config = PlaybackConfig::new().with_jitter(Some(JitterRange {
            min: f64::NAN,
            max: 1.0,
        }));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_jitter_rejected() {
        let config = PlaybackConfig::new().with_jitter(Some(JitterRange { min: 0.5, max: 1e300 }));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jitter.max"));

        let edge = PlaybackConfig::new().with_jitter(Some(JitterRange {
            min: 0.5,
            max: MAX_JITTER,
        }));
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        assert!(PlaybackConfig::zk_computation().validate().is_ok());

        let badge = PlaybackConfig::badge_forge();
        assert!(badge.validate().is_ok());
        assert!(badge.jitter.is_none());
        assert_eq!(badge.terminal_delay(), Duration::ZERO);
    }

    #[test]
    fn test_logging_config() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoggingConfig::default());

        let config = LoggingConfig::default().with_level("forgeplay=debug").with_json(true);
        assert_eq!(config.level, "forgeplay=debug");
        assert!(config.json);
    }
}
