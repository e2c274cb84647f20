//! Nearest-note lookup over the fixed equal-temperament table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::float::Float;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const A4_HZ: f64 = 440.0;
const A4_MIDI: i32 = 69;
const CENTS_PER_OCTAVE: f64 = 1200.0;

/// A named pitch together with the deviation of a measured frequency
/// from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note<T>
where
    T: Float,
{
    /// Scientific pitch name, e.g. "A4".
    pub name: String,
    /// Deviation of the measured frequency from the named note, in cents.
    pub cents: i32,
    /// Equal-temperament frequency of the named note, Hz.
    pub reference_frequency: T,
}

/// Fixed table of named pitches, C0 through B8, built from A4 = 440 Hz.
pub struct NoteTable<T>
where
    T: Float,
{
    entries: Vec<(&'static str, i32, T)>,
}

impl<T: Float> NoteTable<T> {
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(9 * NOTE_NAMES.len());
        for octave in 0..=8 {
            for (step, name) in NOTE_NAMES.iter().enumerate() {
                let midi = (octave + 1) * 12 + step as i32;
                let frequency = A4_HZ * 2f64.powf(f64::from(midi - A4_MIDI) / 12.0);
                entries.push((*name, octave, T::from_f64(frequency).unwrap()));
            }
        }
        NoteTable { entries }
    }

    /// The named note nearest to `frequency` by absolute Hz distance, with
    /// the measured deviation in cents. `None` for silence or degenerate
    /// input.
    pub fn closest_note(&self, frequency: T) -> Option<Note<T>> {
        if !(frequency.is_finite() && frequency > T::zero()) {
            return None;
        }
        let &(name, octave, reference) = self.entries.iter().min_by(|a, b| {
            let da = (frequency - a.2).abs();
            let db = (frequency - b.2).abs();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        })?;
        let cents = (T::from_f64(CENTS_PER_OCTAVE).unwrap() * (frequency / reference).log2())
            .round()
            .to_i32()?;
        Some(Note {
            name: format!("{name}{octave}"),
            cents,
            reference_frequency: reference,
        })
    }
}

impl<T: Float> Default for NoteTable<T> {
    fn default() -> Self {
        NoteTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_pitches_map_to_themselves() {
        let table = NoteTable::<f64>::new();
        for (frequency, name) in [
            (440.0, "A4"),
            (261.63, "C4"),
            (493.88, "B4"),
            (880.0, "A5"),
            (220.0, "A3"),
        ] {
            let note = table.closest_note(frequency).unwrap();
            assert_eq!(note.name, name);
            assert!(note.cents.abs() <= 1, "{name} was {} cents off", note.cents);
        }
    }

    #[test]
    fn deviation_is_reported_in_cents() {
        let table = NoteTable::<f64>::new();
        // A quarter tone above A4.
        let sharp = 440.0 * 2f64.powf(50.0 / 1200.0);
        let note = table.closest_note(sharp).unwrap();
        assert_eq!(note.cents, 50);
    }

    #[test]
    fn nearest_is_measured_in_hz_not_cents() {
        let table = NoteTable::<f64>::new();
        // A4 = 440, A#4 = 466.16; the Hz midpoint 453.08 still belongs to A4
        // even though it is past the midpoint in log-frequency.
        let note = table.closest_note(453.0).unwrap();
        assert_eq!(note.name, "A4");
    }

    #[test]
    fn rejects_degenerate_input() {
        let table = NoteTable::<f64>::new();
        assert!(table.closest_note(0.0).is_none());
        assert!(table.closest_note(-100.0).is_none());
        assert!(table.closest_note(f64::NAN).is_none());
    }
}
