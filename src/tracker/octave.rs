use std::cmp::Ordering;

use log::debug;

use crate::float::Float;

/// Maximum per-frame change, in Hz, that still reads as a gradual
/// transition. Glides and vibrato stay under this; octave locks do not.
const MAX_GRADUAL_STEP_HZ: f64 = 200.0;

/// Relative half-width of the band around each harmonic ratio that triggers
/// a fold. Kept tight on purpose: folding a genuine interval jump creates a
/// discontinuity, which is worse than letting an octave error through.
const RATIO_TOLERANCE: f64 = 0.025;

/// Harmonic and sub-harmonic ratios autocorrelation tends to lock onto,
/// paired with the factor that folds the estimate back.
const FOLD_RATIOS: [(f64, f64); 4] = [
    (2.0, 0.5),
    (0.5, 2.0),
    (3.0, 1.0 / 3.0),
    (1.0 / 3.0, 3.0),
];

/// Fold a harmonic or sub-harmonic misdetection back onto the fundamental.
///
/// `history` holds the recent (frequency, clarity) window, oldest first.
/// Gradual transitions pass through untouched, as does anything whose ratio
/// to the recent stable frequency falls outside the fold bands.
pub(crate) fn correct<T: Float>(
    frequency: T,
    history: &[(T, T)],
    last_confident: Option<T>,
) -> T {
    if is_gradual(frequency, history) {
        return frequency;
    }
    let Some(reference) = reference_frequency(history, last_confident) else {
        return frequency;
    };
    let Some(ratio) = (frequency / reference).to_f64() else {
        return frequency;
    };
    for (target, fold) in FOLD_RATIOS {
        if (ratio / target - 1.0).abs() <= RATIO_TOLERANCE {
            let corrected = frequency * T::from_f64(fold).unwrap();
            debug!(
                "folding {} Hz back onto {} Hz ({}x lock)",
                frequency, corrected, target
            );
            return corrected;
        }
    }
    frequency
}

/// Median frequency of the window once it holds at least three entries;
/// with a shorter window the last confident frequency anchors the
/// comparison instead. Median, not mean: a single outlier in the window
/// must not drag the reference.
fn reference_frequency<T: Float>(history: &[(T, T)], last_confident: Option<T>) -> Option<T> {
    if history.len() < 3 {
        return last_confident;
    }
    let mut frequencies: Vec<T> = history.iter().map(|&(frequency, _)| frequency).collect();
    frequencies.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = frequencies.len() / 2;
    if frequencies.len() % 2 == 0 {
        Some((frequencies[mid - 1] + frequencies[mid]) / T::from_usize(2).unwrap())
    } else {
        Some(frequencies[mid])
    }
}

/// The last three deltas (two inside the window plus the incoming change)
/// all move the same way, none by more than [MAX_GRADUAL_STEP_HZ]. A zero
/// delta is compatible with either direction.
fn is_gradual<T: Float>(frequency: T, history: &[(T, T)]) -> bool {
    if history.len() < 3 {
        return false;
    }
    let tail = &history[history.len() - 3..];
    let points = [tail[0].0, tail[1].0, tail[2].0, frequency];
    let deltas = [
        points[1] - points[0],
        points[2] - points[1],
        points[3] - points[2],
    ];
    let max_step = T::from_f64(MAX_GRADUAL_STEP_HZ).unwrap();
    let bounded = deltas.iter().all(|d| d.abs() <= max_step);
    let rising = deltas.iter().all(|d| *d >= T::zero());
    let falling = deltas.iter().all(|d| *d <= T::zero());
    bounded && (rising || falling)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stable_history(frequency: f64, len: usize) -> Vec<(f64, f64)> {
        vec![(frequency, 0.95); len]
    }

    #[test]
    fn folds_octave_jump_down() {
        let history = stable_history(440.0, 5);
        let corrected = correct(880.0, &history, None);
        assert!((corrected - 440.0).abs() < 1e-9);
    }

    #[test]
    fn folds_sub_octave_jump_up() {
        let history = stable_history(440.0, 5);
        let corrected = correct(220.0, &history, None);
        assert!((corrected - 440.0).abs() < 1e-9);
    }

    #[test]
    fn folds_third_harmonic() {
        let history = stable_history(200.0, 5);
        let corrected = correct(600.0, &history, None);
        assert!((corrected - 200.0).abs() < 1e-9);
    }

    #[test]
    fn respects_tolerance_band() {
        let history = stable_history(440.0, 5);
        // 2.5% above the 2x ratio: still folded.
        assert!((correct(880.0 * 1.025, &history, None) - 451.0).abs() < 1.0);
        // 4% above the 2x ratio: a genuine interval, passed through.
        let outside = 880.0 * 1.04;
        assert_eq!(correct(outside, &history, None), outside);
    }

    #[test]
    fn gradual_rise_is_never_folded() {
        // A steep glide landing inside the 2x fold band against the window
        // median (790 / 400 = 1.975), with monotone deltas under the bound.
        let history = vec![(210.0, 0.9), (400.0, 0.9), (590.0, 0.9)];
        let corrected = correct(790.0, &history, None);
        assert_eq!(corrected, 790.0);
    }

    #[test]
    fn abrupt_jump_after_stable_window_is_folded() {
        // deltas: 0, 0, +440 -- the last step breaks the gradual bound.
        let history = stable_history(440.0, 3);
        assert!((correct(880.0, &history, None) - 440.0).abs() < 1e-9);
    }

    #[test]
    fn short_history_uses_last_confident_anchor() {
        let history = stable_history(440.0, 2);
        assert!((correct(880.0, &history, Some(440.0)) - 440.0).abs() < 1e-9);
        // Without an anchor there is nothing to compare against.
        assert_eq!(correct(880.0, &history, None), 880.0);
    }

    #[test]
    fn unrelated_jump_passes_through() {
        let history = stable_history(440.0, 5);
        assert_eq!(correct(700.0, &history, None), 700.0);
    }
}
