use std::ops::Range;

use crate::float::Float;

struct Point<T: Float> {
    x: T,
    y: T,
}

/// Index where the initial strictly-descending run of `arr` ends.
///
/// An autocorrelation always starts at its global maximum, the lag-0
/// self-match. Walking past the first descent keeps that trivial peak (and
/// its shoulder) out of the search window.
pub fn descending_run_end<T: Float>(arr: &[T]) -> usize {
    let mut i = 1;
    while i < arr.len() && arr[i] < arr[i - 1] {
        i += 1;
    }
    i
}

/// Index and value of the maximum of `arr` restricted to `range`.
/// `None` when the range is empty or out of bounds.
pub fn max_in_window<T: Float>(arr: &[T], range: Range<usize>) -> Option<(usize, T)> {
    let start = range.start;
    let end = range.end.min(arr.len());
    if start >= end {
        return None;
    }
    let mut best = (start, arr[start]);
    for i in start + 1..end {
        if arr[i] > best.1 {
            best = (i, arr[i]);
        }
    }
    Some(best)
}

/// Refine an integer peak index to sub-sample precision with a parabola
/// through the three values around it. Falls back to the integer index when
/// the peak sits on a boundary or the curvature vanishes.
pub fn refine_peak<T: Float>(arr: &[T], idx: usize) -> T {
    if idx == 0 || idx + 1 >= arr.len() {
        return T::from_usize(idx).unwrap();
    }
    let refined = quadratic_interpolation(
        Point {
            x: T::from_usize(idx - 1).unwrap(),
            y: arr[idx - 1],
        },
        Point {
            x: T::from_usize(idx).unwrap(),
            y: arr[idx],
        },
        Point {
            x: T::from_usize(idx + 1).unwrap(),
            y: arr[idx + 1],
        },
    );
    if refined.x.is_finite() {
        refined.x
    } else {
        T::from_usize(idx).unwrap()
    }
}

fn quadratic_interpolation<T: Float>(left: Point<T>, center: Point<T>, right: Point<T>) -> Point<T> {
    let denominator = T::from_f64(2.0).unwrap() * center.y - left.y - right.y;
    if denominator == T::zero() {
        return center;
    }
    let shift = T::from_f64(0.5).unwrap() * (right.y - left.y) / denominator;
    let x = center.x + shift;
    let y = center.y + T::from_f64(0.25).unwrap() * (right.y - left.y) * shift;
    Point { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_recovers_parabola_vertex() {
        // y = -x^2 + 4 sampled off-center.
        let point = quadratic_interpolation(
            Point {
                x: -1.5,
                y: -(1.5 * 1.5) + 4.0,
            },
            Point {
                x: -0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
            Point {
                x: 0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
        );
        assert_eq!(point.x, 0.0);
        assert_eq!(point.y, 4.0);
    }

    #[test]
    fn descending_run_stops_at_first_rise() {
        let arr = vec![5.0f64, 4.0, 3.0, 3.5, 9.0];
        assert_eq!(descending_run_end(&arr), 3);
    }

    #[test]
    fn descending_run_covers_monotone_input() {
        let arr = vec![3.0f64, 2.0, 1.0];
        assert_eq!(descending_run_end(&arr), 3);
    }

    #[test]
    fn max_in_window_respects_bounds() {
        let arr = vec![0.0f64, 9.0, 1.0, 7.0, 2.0];
        assert_eq!(max_in_window(&arr, 2..5), Some((3, 7.0)));
        assert_eq!(max_in_window(&arr, 4..4), None);
        assert_eq!(max_in_window::<f64>(&arr, 7..9), None);
    }

    #[test]
    fn refine_peak_interpolates_between_samples() {
        // Peak of a symmetric triangle lies between samples 1 and 2.
        let arr = vec![0.0f64, 2.0, 2.0, 0.0];
        let refined = refine_peak(&arr, 1);
        assert!((refined - 1.5).abs() < 1e-12);
    }

    #[test]
    fn refine_peak_keeps_boundary_indices() {
        let arr = vec![3.0f64, 1.0];
        assert_eq!(refine_peak(&arr, 0), 0.0);
    }
}
