//! Frame-to-frame pitch tracking: range filtering, octave-error correction,
//! and temporal smoothing over the raw estimator output.

mod filter;
mod octave;

use std::collections::VecDeque;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, TrackerConfig};
use crate::estimator::autocorrelation::AutocorrelationEstimator;
use crate::estimator::PitchEstimator;
use crate::float::Float;
use crate::utils::buffer::rms;

/// Weight of the previous output in the exponential smoothing step; the
/// remainder pulls toward the history-weighted target.
const SMOOTHING_RETAIN: f64 = 0.7;

/// One processed frame, handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedPitch<T>
where
    T: Float,
{
    /// Smoothed fundamental frequency, or zero when this frame held no
    /// pitch. Silence is reported as silence, never papered over with a
    /// stale value.
    pub frequency: T,
    /// Clarity of this frame's raw estimate, in [0, 1]. Nonzero alongside a
    /// zero `frequency` means "too weak to trust", not "nothing there".
    pub clarity: T,
    /// RMS level of the raw frame.
    pub volume_rms: T,
    /// True when this frame carries the first valid estimate after a
    /// silence gap; the smoothing history was restarted earlier in the same
    /// call.
    pub is_after_gap: bool,
}

/// Tracks the pitch of one monophonic voice across frames.
///
/// One tracker owns one listening session. Feed it frames through
/// [process_frame](PitchTracker::process_frame) and it hands back one
/// [TrackedPitch] per frame; [reset](PitchTracker::reset) returns it to the
/// pristine state between takes. All processing is synchronous and
/// frame-local except the bounded history kept here.
pub struct PitchTracker<T, E = AutocorrelationEstimator<T>>
where
    T: Float,
{
    config: TrackerConfig<T>,
    estimator: E,
    history: VecDeque<(T, T)>,
    smoothed: Option<T>,
    last_confident: Option<T>,
    last_detection: Option<Instant>,
}

impl<T> PitchTracker<T>
where
    T: Float + std::iter::Sum,
{
    /// Build a tracker around the default autocorrelation estimator.
    pub fn new(config: TrackerConfig<T>) -> Result<Self, ConfigError> {
        let estimator = AutocorrelationEstimator::new(&config);
        PitchTracker::with_estimator(config, estimator)
    }
}

impl<T, E> PitchTracker<T, E>
where
    T: Float + std::iter::Sum,
    E: PitchEstimator<T>,
{
    /// Build a tracker around a custom estimator implementation.
    pub fn with_estimator(config: TrackerConfig<T>, estimator: E) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = config.history_size;
        Ok(PitchTracker {
            config,
            estimator,
            history: VecDeque::with_capacity(capacity),
            smoothed: None,
            last_confident: None,
            last_detection: None,
        })
    }

    pub fn config(&self) -> &TrackerConfig<T> {
        &self.config
    }

    /// Number of entries currently in the smoothing window.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Forget everything learned from previous frames.
    pub fn reset(&mut self) {
        self.history.clear();
        self.smoothed = None;
        self.last_confident = None;
        self.last_detection = None;
    }

    /// Process one frame captured now.
    pub fn process_frame(&mut self, signal: &[T], sample_rate: usize) -> TrackedPitch<T> {
        self.process_frame_at(signal, sample_rate, Instant::now())
    }

    /// Process one frame with an explicit capture instant.
    ///
    /// The calling cadence may be irregular; gap detection runs on the
    /// wall-clock instants supplied here, never on frame counts.
    pub fn process_frame_at(
        &mut self,
        signal: &[T],
        sample_rate: usize,
        at: Instant,
    ) -> TrackedPitch<T> {
        let volume_rms = rms(signal);
        let estimate = self.estimator.estimate(signal, sample_rate);
        let estimate = filter::restrict_range(
            estimate,
            self.config.min_frequency,
            self.config.max_frequency,
        );

        let Some(pitch) = estimate.pitch() else {
            // The history survives so tracking can resume inside the gap
            // window, but the frame itself reports silence.
            return TrackedPitch {
                frequency: T::zero(),
                clarity: estimate.clarity(),
                volume_rms,
                is_after_gap: false,
            };
        };

        let is_after_gap = self
            .last_detection
            .is_some_and(|previous| at.duration_since(previous) > self.config.gap_threshold);
        if is_after_gap {
            debug!("silence gap ended, restarting the smoothing window");
            self.history.clear();
            self.smoothed = None;
            self.last_confident = None;
        }

        let frequency = octave::correct(
            pitch.frequency,
            self.history.make_contiguous(),
            self.last_confident,
        );

        self.push_history(frequency, pitch.clarity);
        let output = self.smooth(frequency, pitch.clarity, is_after_gap);

        self.last_detection = Some(at);
        if pitch.clarity >= self.config.high_confidence_threshold {
            self.last_confident = Some(output);
        }

        TrackedPitch {
            frequency: output,
            clarity: pitch.clarity,
            volume_rms,
            is_after_gap,
        }
    }

    fn push_history(&mut self, frequency: T, clarity: T) {
        if self.history.len() == self.config.history_size {
            self.history.pop_front();
        }
        self.history.push_back((frequency, clarity));
    }

    /// High-confidence estimates snap straight through; weaker ones are
    /// pulled toward a recency- and clarity-weighted average of the window,
    /// then damped against the previous output.
    fn smooth(&mut self, frequency: T, clarity: T, after_gap: bool) -> T {
        if after_gap || clarity >= self.config.high_confidence_threshold {
            self.smoothed = Some(frequency);
            return frequency;
        }
        let target = self.weighted_target().unwrap_or(frequency);
        let output = match self.smoothed {
            Some(previous) => {
                let retain = T::from_f64(SMOOTHING_RETAIN).unwrap();
                previous * retain + target * (T::one() - retain)
            }
            None => target,
        };
        self.smoothed = Some(output);
        output
    }

    /// Weighted mean of the history: weight grows linearly with recency and
    /// quadratically with clarity, so clean recent frames dominate.
    fn weighted_target(&self) -> Option<T> {
        let mut numerator = T::zero();
        let mut denominator = T::zero();
        for (index, &(frequency, clarity)) in self.history.iter().enumerate() {
            let weight = T::from_usize(index + 1).unwrap() * clarity * clarity;
            numerator = numerator + frequency * weight;
            denominator = denominator + weight;
        }
        (denominator > T::zero()).then(|| numerator / denominator)
    }
}
