//! Single-frame fundamental frequency estimation.

use crate::float::Float;

pub mod autocorrelation;
pub mod internals;

pub use internals::Pitch;

/// Outcome of estimating one frame.
///
/// "No pitch this frame" is an explicit variant rather than a nullable
/// number so call sites handle it exhaustively. [Estimate::Unclear] keeps
/// the measured clarity around, letting a caller distinguish "nothing there"
/// from "signal too weak to trust".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate<T: Float> {
    /// An accepted pitch measurement.
    Detected(Pitch<T>),
    /// A correlation peak existed but fell below the clarity bar.
    Unclear { clarity: T },
    /// Silence, noise, or degenerate input.
    None,
}

impl<T: Float> Estimate<T> {
    pub fn pitch(&self) -> Option<Pitch<T>> {
        match self {
            Estimate::Detected(pitch) => Some(*pitch),
            _ => Option::None,
        }
    }

    /// Clarity measured for this frame; zero when none was computed.
    pub fn clarity(&self) -> T {
        match self {
            Estimate::Detected(pitch) => pitch.clarity,
            Estimate::Unclear { clarity } => *clarity,
            Estimate::None => T::zero(),
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Estimate::Detected(_))
    }
}

/// A periodicity estimator examining one frame at a time.
///
/// The default implementation is [autocorrelation::AutocorrelationEstimator];
/// any estimator satisfying the same accuracy contract can stand in behind
/// the tracker.
pub trait PitchEstimator<T>
where
    T: Float,
{
    /// Estimate the fundamental frequency of one frame of mono samples in
    /// [-1, 1]. Every failure mode — silence, noise, NaN-laden input,
    /// degenerate correlations — degrades to [Estimate::None]; frame content
    /// never causes a panic.
    fn estimate(&mut self, signal: &[T], sample_rate: usize) -> Estimate<T>;
}
