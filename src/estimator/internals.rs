use std::sync::Arc;

use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::float::Float;
use crate::utils::buffer::{copy_complex_to_real, copy_real_to_complex, modulus_squared, BufferPool};

/// A single-frame pitch measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pitch<T>
where
    T: Float,
{
    /// Fundamental frequency, Hz.
    pub frequency: T,
    /// Normalized correlation peak height in [0, 1].
    pub clarity: T,
}

/// Scratch storage shared across frames.
///
/// FFT plans are built once for the fixed transform length and the working
/// buffers come from a [BufferPool], so steady-state estimation does not
/// allocate. The transform length is twice the window: the zero-padded tail
/// makes the circular FFT product equal to the linear autocorrelation at
/// every lag the search can reach.
pub struct EstimatorInternals<T>
where
    T: Float,
{
    pub window: usize,
    pub buffers: BufferPool<T>,
    fft: Arc<dyn Fft<T>>,
    inv_fft: Arc<dyn Fft<T>>,
}

impl<T> EstimatorInternals<T>
where
    T: Float,
{
    pub fn new(window: usize) -> Self {
        let len = 2 * window;
        let mut planner = FftPlanner::new();
        EstimatorInternals {
            window,
            buffers: BufferPool::new(len),
            fft: planner.plan_fft_forward(len),
            inv_fft: planner.plan_fft_inverse(len),
        }
    }

    /// Compute the autocorrelation of `signal` into `result`:
    /// forward FFT, modulus squared, inverse FFT, normalized by the
    /// transform length (rustfft does not normalize on its own).
    pub fn autocorrelation(&self, signal: &[T], result: &mut [T]) {
        let mut ref1 = self.buffers.get_complex_buffer();
        let mut ref2 = self.buffers.get_complex_buffer();
        let signal_complex = &mut ref1[..];
        let scratch = &mut ref2[..];

        copy_real_to_complex(signal, signal_complex);
        self.fft.process_with_scratch(signal_complex, scratch);
        modulus_squared(signal_complex);
        self.inv_fft.process_with_scratch(signal_complex, scratch);

        let normalization = T::one() / T::from_usize(signal_complex.len()).unwrap();
        for value in signal_complex.iter_mut() {
            value.re = value.re * normalization;
        }
        copy_complex_to_real(signal_complex, result);
    }
}

/// The periodic region of `signal`: leading and trailing runs of samples
/// quieter than `threshold` are cut away. Empty when nothing reaches the
/// threshold.
pub fn trim_quiet_edges<T: Float>(signal: &[T], threshold: T) -> &[T] {
    let start = signal.iter().position(|s| s.abs() >= threshold);
    let end = signal.iter().rposition(|s| s.abs() >= threshold);
    match (start, end) {
        (Some(start), Some(end)) => &signal[start..=end],
        _ => &signal[..0],
    }
}

/// Factor undoing the linear taper of the raw autocorrelation at `lag`: the
/// raw estimate over a buffer of `length` samples sums only `length - lag`
/// products, so even a perfectly periodic signal decays linearly with lag.
///
/// Peak *selection* must stay on the raw values — the taper is what keeps
/// the peaks at two and three periods below the fundamental one. Only the
/// clarity score and the sub-sample refinement use the compensated values.
pub fn taper_compensation<T: Float>(length: usize, lag: usize) -> T {
    T::from_usize(length).unwrap() / T::from_usize(length - lag).unwrap()
}
