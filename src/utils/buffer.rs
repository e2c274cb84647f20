use object_pool::{Pool, Reusable};
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real components of `output`. Imaginary components
/// and the tail beyond `input.len()` are zeroed.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero());
}

/// Copy the real components of `input` into `output`, zeroing any tail.
pub fn copy_complex_to_real<T: Float>(input: &[Complex<T>], output: &mut [T]) {
    assert!(input.len() <= output.len());
    input
        .iter()
        .zip(output.iter_mut())
        .for_each(|(i, o)| *o = i.re);
    output[input.len()..].iter_mut().for_each(|o| *o = T::zero());
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the imaginary component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T>(arr: &[T]) -> T
where
    T: Float + std::iter::Sum,
{
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Root-mean-square level of `arr`. Zero for an empty slice.
pub fn rms<T>(arr: &[T]) -> T
where
    T: Float + std::iter::Sum,
{
    if arr.is_empty() {
        return T::zero();
    }
    (square_sum(arr) / T::from_usize(arr.len()).unwrap()).sqrt()
}

/// A pool of real/complex scratch buffers. Buffers are created on first use
/// and recycled once `Drop`ed, so steady-state frame processing never
/// allocates. The real-time caller in front of this crate runs on a display
/// or audio callback and cannot afford allocator hiccups.
pub struct BufferPool<T> {
    real_buffers: Pool<Vec<T>>,
    complex_buffers: Pool<Vec<Complex<T>>>,
    pub buffer_size: usize,
}

impl<T: Float> BufferPool<T> {
    pub fn new(buffer_size: usize) -> Self {
        BufferPool {
            real_buffers: Pool::new(0, || new_real_buffer(buffer_size)),
            complex_buffers: Pool::new(0, || new_complex_buffer(buffer_size)),
            buffer_size,
        }
    }

    /// Get a buffer that is returned to the pool when `Drop`ed.
    pub fn get_real_buffer(&self) -> Reusable<Vec<T>> {
        self.real_buffers.pull(|| new_real_buffer(self.buffer_size))
    }

    /// Get a buffer that is returned to the pool when `Drop`ed.
    pub fn get_complex_buffer(&self) -> Reusable<Vec<Complex<T>>> {
        self.complex_buffers
            .pull(|| new_complex_buffer(self.buffer_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_recycled() {
        let buffers = BufferPool::new(3);
        let mut buf1 = buffers.get_real_buffer();
        buf1[0] = 5.5;
        {
            // Dropped at the end of the scope, then reused below.
            let mut buf2 = buffers.get_real_buffer();
            buf2[1] = 6.6;
        }
        {
            let mut buf3 = buffers.get_real_buffer();
            buf3[2] = 7.7;
        }
        drop(buf1);

        let buf1 = &buffers.get_real_buffer();
        let buf2 = &buffers.get_real_buffer();
        // Buffers are distributed in LIFO order, so compare them "backwards".
        assert_eq!(&buf2[..], &[0.0, 6.6, 7.7]);
        assert_eq!(&buf1[..], &[5.5, 0., 0.]);
    }

    #[test]
    fn rms_of_known_signal() {
        let signal = vec![0.5f64, -0.5, 0.5, -0.5];
        assert!((rms(&signal) - 0.5).abs() < 1e-12);
        assert_eq!(rms::<f64>(&[]), 0.0);
    }
}
