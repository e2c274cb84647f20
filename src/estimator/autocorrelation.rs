use log::trace;

use crate::config::TrackerConfig;
use crate::estimator::internals::{taper_compensation, trim_quiet_edges, EstimatorInternals};
use crate::estimator::{Estimate, Pitch, PitchEstimator};
use crate::float::Float;
use crate::utils::buffer::rms;
use crate::utils::peak::{descending_run_end, max_in_window, refine_peak};

/// Samples quieter than this are trimmed off the frame edges before
/// correlating, isolating the periodic region.
const EDGE_AMPLITUDE: f64 = 0.2;

/// Trimmed frames shorter than this cannot support a stable correlation.
const MIN_TRIMMED_LEN: usize = 100;

/// Candidates below this frequency get a relaxed clarity bar: the buffer is
/// short relative to the wavelength and periodicity scores suffer.
const LOW_FREQ_HZ: f64 = 200.0;
const LOW_FREQ_CLARITY_SCALE: f64 = 0.92;

/// Autocorrelation pitch estimator for a single voice.
///
/// Finds the lag at which the frame best lines up with itself, restricted to
/// the lags the configured pitch range allows, and refines it to sub-sample
/// precision. Clarity is the normalized height of the chosen peak.
pub struct AutocorrelationEstimator<T>
where
    T: Float,
{
    min_frequency: T,
    max_frequency: T,
    clarity_threshold: T,
    rms_silence_threshold: T,
    internals: EstimatorInternals<T>,
}

impl<T> AutocorrelationEstimator<T>
where
    T: Float,
{
    pub fn new(config: &TrackerConfig<T>) -> Self {
        AutocorrelationEstimator {
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            clarity_threshold: config.clarity_threshold,
            rms_silence_threshold: config.rms_silence_threshold,
            internals: EstimatorInternals::new(config.sample_window_size),
        }
    }
}

impl<T> PitchEstimator<T> for AutocorrelationEstimator<T>
where
    T: Float + std::iter::Sum,
{
    fn estimate(&mut self, signal: &[T], sample_rate: usize) -> Estimate<T> {
        assert!(
            signal.len() <= self.internals.window,
            "frame of {} samples exceeds the configured window of {}",
            signal.len(),
            self.internals.window
        );

        let level = rms(signal);
        if !level.is_finite() || level < self.rms_silence_threshold {
            return Estimate::None;
        }

        let trimmed = trim_quiet_edges(signal, T::from_f64(EDGE_AMPLITUDE).unwrap());
        let length = trimmed.len();
        if length < MIN_TRIMMED_LEN {
            return Estimate::None;
        }

        let sample_rate_t = T::from_usize(sample_rate).unwrap();
        let min_lag = (sample_rate_t / self.max_frequency)
            .ceil()
            .to_usize()
            .unwrap_or(0)
            .max(2);
        let max_lag = (sample_rate_t / self.min_frequency)
            .floor()
            .to_usize()
            .unwrap_or(0)
            .min(length / 2);
        if min_lag > max_lag {
            return Estimate::None;
        }

        let mut correlation_ref = self.internals.buffers.get_real_buffer();
        let correlation = &mut correlation_ref[..];
        self.internals.autocorrelation(trimmed, correlation);

        let energy = correlation[0];
        if !(energy > T::zero()) {
            return Estimate::None;
        }

        // Never let the trivial lag-0 self-match win: the search starts past
        // the initial strictly-descending run of the correlation. Selection
        // runs on the raw values; their linear taper is what keeps the
        // equally periodic peaks at two and three periods below this one.
        let start = descending_run_end(&correlation[..=max_lag]).max(min_lag);
        let Some((peak_lag, peak_value)) = max_in_window(correlation, start..max_lag + 1) else {
            return Estimate::None;
        };
        if !(peak_value > T::zero()) {
            return Estimate::None;
        }

        // Clarity undoes the taper so a clean tone scores near 1.0 at any
        // lag, not (length - lag) / length.
        let clarity = (peak_value / energy * taper_compensation(length, peak_lag)).min(T::one());
        let coarse_frequency = sample_rate_t / T::from_usize(peak_lag).unwrap();

        let mut bar = self.clarity_threshold;
        if coarse_frequency < T::from_f64(LOW_FREQ_HZ).unwrap() {
            bar = bar * T::from_f64(LOW_FREQ_CLARITY_SCALE).unwrap();
        }
        if clarity < bar {
            trace!("correlation peak too weak: clarity {} < {}", clarity, bar);
            return Estimate::Unclear { clarity };
        }

        // Refine on a locally compensated neighborhood: the raw taper would
        // drag the parabola's vertex toward lag zero.
        let neighborhood = [
            correlation[peak_lag - 1] * taper_compensation(length, peak_lag - 1),
            peak_value * taper_compensation(length, peak_lag),
            correlation[peak_lag + 1] * taper_compensation(length, peak_lag + 1),
        ];
        let refined_lag = T::from_usize(peak_lag - 1).unwrap() + refine_peak(&neighborhood, 1);
        if !(refined_lag > T::zero()) {
            return Estimate::None;
        }
        let frequency = sample_rate_t / refined_lag;
        if !frequency.is_finite() {
            return Estimate::None;
        }

        Estimate::Detected(Pitch { frequency, clarity })
    }
}
