//! Configuration errors.
//!
//! Every failure the core can report happens while a component is being
//! built. Once constructed, the signal path has no fallible operations:
//! framing violations are recovered in place and counted instead.

use thiserror::Error;

/// A configuration that cannot be realized by the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The requested clock is faster than the master clock can divide down to.
    #[error("{clock} clock: cannot derive {requested_hz} Hz from {input_hz} Hz")]
    RateTooHigh {
        clock: &'static str,
        input_hz: f64,
        requested_hz: f64,
    },

    /// No integer divisor gets close enough to the requested clock.
    #[error(
        "{clock} clock: {requested_hz} Hz requested, {actual_hz} Hz achievable \
         ({deviation_ppm} ppm, max {max_ppm} ppm)"
    )]
    Deviation {
        clock: &'static str,
        requested_hz: f64,
        actual_hz: f64,
        deviation_ppm: f64,
        max_ppm: f64,
    },

    #[error("invalid sample rate {0} Hz")]
    InvalidSampleRate(f64),

    #[error("unsupported bit depth {0}, expected 8, 16, 24 or 32")]
    UnsupportedBitDepth(u32),

    /// The stream needs more bytes per microframe than one packet can carry.
    #[error("configuration requires {bytes} bytes per microframe, packets hold at most {max}")]
    PacketTooLarge { bytes: usize, max: usize },

    #[error("{configured} channels configured, component is built for {supported}")]
    ChannelCount { configured: usize, supported: usize },

    #[error("waveform table length {0} is not a power of two")]
    TableLength(usize),

    #[error("waveform table is {table}-bit, stream is {stream}-bit")]
    TableDepth { table: u32, stream: u32 },

    #[error("waveform gain {0} is outside [0, 1]")]
    Gain(f64),

    /// The DAC sequencer needs at least three master ticks per sample.
    #[error("sample period of {cycles} master cycles is too short")]
    SamplePeriodTooShort { cycles: u32 },

    #[error("{0} level meter segments, expected 1 to 32")]
    Segments(usize),
}
