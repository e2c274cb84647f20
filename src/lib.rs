//! # Pitch Tracking
//! *pitch_tracking* estimates and tracks the fundamental frequency of a
//! monophonic voice signal in real time, one frame at a time. It was built
//! for vocal-training applications, where the hard problem is turning noisy,
//! discontinuous short-time frames into a stable, artifact-free frequency
//! stream.
//!
//! # Pipeline
//! Each frame runs through four stages inside [tracker::PitchTracker]:
//!
//!   * an autocorrelation [estimator] producing a raw frequency and clarity,
//!   * a range filter discarding subsonic and ultrasonic artifacts,
//!   * an octave-error corrector folding harmonic misdetections back onto
//!     the fundamental,
//!   * a temporal tracker smoothing the stream and reporting silence gaps.
//!
//! The [note] module maps tracked frequencies onto named pitches with a
//! deviation in cents.
//!
//! # Examples
//! ```
//! use pitch_tracking::config::TrackerConfig;
//! use pitch_tracking::tracker::PitchTracker;
//!
//! const SAMPLE_RATE: usize = 48000;
//! const SIZE: usize = 2048;
//!
//! // Signal coming from some source (microphone, generated, etc...)
//! let dt = 1.0 / SAMPLE_RATE as f64;
//! let freq = 440.0;
//! let signal: Vec<f64> = (0..SIZE)
//!     .map(|x| 0.5 * (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!     .collect();
//!
//! let mut tracker = PitchTracker::new(TrackerConfig::default()).unwrap();
//! let tracked = tracker.process_frame(&signal, SAMPLE_RATE);
//!
//! println!("Frequency: {}, Clarity: {}", tracked.frequency, tracked.clarity);
//! ```

pub use config::TrackerConfig;
pub use estimator::Pitch;
pub use tracker::{PitchTracker, TrackedPitch};

pub mod config;
pub mod estimator;
pub mod float;
pub mod note;
pub mod tracker;
pub mod utils;
