//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::float::Float as NumFloat;
use rustfft::FftNum;
use std::fmt::{Debug, Display};

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
///
/// The tracker needs `sqrt` and `log2`, so this extends the full
/// [num_traits::Float](rustfft::num_traits::float::Float) rather than `FloatCore`.
pub trait Float: Display + Debug + NumFloat + FftNum {}

impl Float for f64 {}
impl Float for f32 {}
