/// USB high-speed microframes per second (one every 125 µs).
pub const MICROFRAMES_PER_SECOND: f64 = 8_000.0;

/// Largest isochronous payload the transport can carry in one microframe.
pub const MAX_PACKET_SIZE: usize = 1024;

/// Depth of every sample FIFO inside the core.
pub const FIFO_DEPTH: usize = 16;

/// Width of the oscillator phase accumulator.
pub const PHI_BITS: u32 = 32;

/// Target rate of the delta-sigma modulation strobe in Hz.
pub const MODULATION_HZ: f64 = 30e6;

/// Master clock the pipeline runs from by default (USB domain, 60 MHz).
pub const DEFAULT_MASTER_HZ: f64 = 60e6;

/// Number of audio channels this design is built for.
pub const CHANNELS: usize = 2;

/// Default oscillator wavetable length.
pub const DEFAULT_TABLE_LENGTH: usize = 256;

/// Self-test tones in Hz, one per channel in order.
pub const DEFAULT_TONES: [f64; CHANNELS] = [1_000.0, 10_000.0];

/// Default number of level meter segments.
pub const DEFAULT_SEGMENTS: usize = 6;

/// The level meter bitmap is a `u32`.
pub const MAX_SEGMENTS: usize = 32;
