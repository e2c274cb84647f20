use log::debug;

use crate::estimator::Estimate;
use crate::float::Float;

/// Drop estimates outside the plausible musical range.
///
/// Subsonic and ultrasonic artifacts degrade to "no pitch"; nothing here
/// raises an error toward the real-time caller. Stateless by design.
pub(crate) fn restrict_range<T: Float>(estimate: Estimate<T>, min: T, max: T) -> Estimate<T> {
    match estimate {
        Estimate::Detected(pitch) if pitch.frequency < min || pitch.frequency > max => {
            debug!("discarding out-of-range estimate at {} Hz", pitch.frequency);
            Estimate::None
        }
        other => other,
    }
}
