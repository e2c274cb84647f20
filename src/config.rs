//! Tuning surface for a tracking session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::float::Float;

/// Frames shorter than this cannot support a stable correlation search.
const MIN_WINDOW: usize = 256;

/// Configuration for a [PitchTracker](crate::tracker::PitchTracker).
///
/// Every threshold here is an empirically tuned product parameter. The
/// defaults are sane starting points for a sung voice, not canonical values;
/// callers are expected to tune them against their own input chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig<T: Float> {
    /// Frame length used for correlation, in samples. Incoming frames may be
    /// shorter than this, never longer.
    pub sample_window_size: usize,
    /// Lower bound of the plausible pitch range, in Hz. Bounds both the
    /// correlation search window and the output filter.
    pub min_frequency: T,
    /// Upper bound of the plausible pitch range, in Hz.
    pub max_frequency: T,
    /// Minimum normalized correlation peak accepted as a pitch.
    pub clarity_threshold: T,
    /// Minimum RMS level before estimation is attempted at all.
    pub rms_silence_threshold: T,
    /// Length of the smoothing history window.
    pub history_size: usize,
    /// Silence duration after which the smoothing history is discarded.
    pub gap_threshold: Duration,
    /// Clarity at or above which smoothing is bypassed and the output snaps
    /// to the estimate.
    pub high_confidence_threshold: T,
}

impl<T: Float> Default for TrackerConfig<T> {
    fn default() -> Self {
        TrackerConfig {
            sample_window_size: 2048,
            min_frequency: T::from_f64(80.0).unwrap(),
            max_frequency: T::from_f64(1000.0).unwrap(),
            clarity_threshold: T::from_f64(0.88).unwrap(),
            rms_silence_threshold: T::from_f64(0.015).unwrap(),
            history_size: 6,
            gap_threshold: Duration::from_millis(750),
            high_confidence_threshold: T::from_f64(0.9).unwrap(),
        }
    }
}

impl<T: Float> TrackerConfig<T> {
    /// Check the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_window_size < MIN_WINDOW {
            return Err(ConfigError::WindowTooSmall {
                size: self.sample_window_size,
                min: MIN_WINDOW,
            });
        }
        if !(self.min_frequency > T::zero() && self.min_frequency < self.max_frequency) {
            return Err(ConfigError::InvalidFrequencyRange {
                min: to_f64(self.min_frequency),
                max: to_f64(self.max_frequency),
            });
        }
        self.check_unit_interval("clarity_threshold", self.clarity_threshold)?;
        self.check_unit_interval("high_confidence_threshold", self.high_confidence_threshold)?;
        if !(self.rms_silence_threshold > T::zero()) {
            return Err(ConfigError::ThresholdOutOfBounds {
                name: "rms_silence_threshold",
                value: to_f64(self.rms_silence_threshold),
            });
        }
        if self.history_size == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        if self.gap_threshold.is_zero() {
            return Err(ConfigError::ZeroGapThreshold);
        }
        Ok(())
    }

    fn check_unit_interval(&self, name: &'static str, value: T) -> Result<(), ConfigError> {
        if value < T::zero() || value > T::one() {
            return Err(ConfigError::ThresholdOutOfBounds {
                name,
                value: to_f64(value),
            });
        }
        Ok(())
    }
}

fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// A configuration the tracker refuses to start with. This is the only error
/// that crosses the crate boundary; frame processing itself always degrades
/// to a "no pitch" result instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample window of {size} samples is too short, need at least {min}")]
    WindowTooSmall { size: usize, min: usize },
    #[error("pitch range {min} Hz .. {max} Hz is not a positive, ordered range")]
    InvalidFrequencyRange { min: f64, max: f64 },
    #[error("{name} of {value} is outside its valid range")]
    ThresholdOutOfBounds { name: &'static str, value: f64 },
    #[error("history size must be at least 1")]
    EmptyHistory,
    #[error("gap threshold must be non-zero")]
    ZeroGapThreshold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TrackerConfig::<f32>::default().validate().is_ok());
        assert!(TrackerConfig::<f64>::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_frequency_range() {
        let config = TrackerConfig::<f64> {
            min_frequency: 2000.0,
            max_frequency: 50.0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFrequencyRange { .. })
        ));
    }

    #[test]
    fn rejects_tiny_window() {
        let config = TrackerConfig::<f64> {
            sample_window_size: 64,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_out_of_bounds_clarity() {
        let config = TrackerConfig::<f64> {
            clarity_threshold: 1.5,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfBounds {
                name: "clarity_threshold",
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty_history() {
        let config = TrackerConfig::<f64> {
            history_size: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyHistory)));
    }
}
