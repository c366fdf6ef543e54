//! Sample arithmetic and configuration-time table generation.

pub mod helpers;
pub mod wavetable;

pub use wavetable::Waveform;
