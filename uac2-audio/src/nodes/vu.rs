//! Logarithmic level meter.
//!
//! Samples are queued as they arrive and drained one per sample-clock tick.
//! Each drained sample is rectified and becomes the current level, which
//! lights a bar of `segments` positions against logarithmically spaced
//! thresholds:
//!
//! ```text
//! logscale(s) = floor(segments^(s / segments) / segments * (2^(bits-1) - 1))
//! ```

use crate::clock::RateDivider;
use crate::config::{BitDepth, StreamConfig};
use crate::constants::MAX_SEGMENTS;
use crate::dsp::helpers::magnitude;
use crate::error::ConfigError;
use crate::io::SampleFifo;
use crate::node::{Sample, SampleSink};

/// Level meter. Sink node: always accepts samples.
///
/// # Example
/// ```ignore
/// let mut vu = LevelMeter::new(&config, 60e6, 6)?;
///
/// // per master tick:
/// if let Some(sample) = incoming { vu.push(sample); }
/// vu.tick();
/// leds.write(vu.leds())?;
/// ```
pub struct LevelMeter {
    depth: BitDepth,
    segments: usize,
    thresholds: [u32; MAX_SEGMENTS],
    queue: SampleFifo,
    clock: RateDivider,
    level: u32,
    lit: usize,
    dropped: u32,
}

impl LevelMeter {
    /// Build a meter with `segments` display positions, ticking at the
    /// stream's sample rate from `master_hz`.
    pub fn new(config: &StreamConfig, master_hz: f64, segments: usize) -> Result<Self, ConfigError> {
        if segments == 0 || segments > MAX_SEGMENTS {
            return Err(ConfigError::Segments(segments));
        }
        let sample_cycles = RateDivider::derive("sample", master_hz, config.sample_rate(), Some(0.0))?;

        let depth = config.bit_depth();
        let mut thresholds = [0u32; MAX_SEGMENTS];
        for (s, threshold) in thresholds.iter_mut().enumerate().take(segments) {
            *threshold = logscale(s, segments, depth);
        }

        Ok(LevelMeter {
            depth,
            segments,
            thresholds,
            queue: SampleFifo::new(),
            clock: RateDivider::new(sample_cycles),
            level: 0,
            lit: 0,
            dropped: 0,
        })
    }

    /// Queue a sample. Never refuses; a full queue drops the sample.
    pub fn push(&mut self, sample: Sample) {
        if self.queue.write(sample).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            tracing::trace!(dropped = self.dropped, "level meter queue full");
        }
    }

    /// Advance one master tick.
    pub fn tick(&mut self) {
        if self.clock.tick() {
            // An empty queue repeats the last sample
            let sample = self.queue.read_or_hold();
            self.level = magnitude(sample, self.depth);
            self.lit = self.segments_for(self.level);
        }
    }

    /// Number of lit segments for a given level.
    ///
    /// `s + 1` for the highest `s` with `logscale(s) <= level`; 0 below the
    /// lowest threshold.
    pub fn segments_for(&self, level: u32) -> usize {
        self.thresholds[..self.segments]
            .iter()
            .rposition(|&t| t <= level)
            .map_or(0, |s| s + 1)
    }

    /// Rectified level of the most recent sample.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of lit segments, `0..=segments`.
    pub fn lit(&self) -> usize {
        self.lit
    }

    /// Display bitmap: the lowest `lit()` bits set.
    pub fn leds(&self) -> u32 {
        if self.lit >= 32 {
            u32::MAX
        } else {
            (1 << self.lit) - 1
        }
    }

    /// Threshold of segment `s`.
    pub fn threshold(&self, s: usize) -> u32 {
        self.thresholds[s]
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Samples lost to a full queue.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl SampleSink for LevelMeter {
    fn ready(&self) -> bool {
        true
    }

    fn push(&mut self, sample: Sample) -> bool {
        LevelMeter::push(self, sample);
        true
    }
}

/// Threshold of segment `s` of `segments` at `depth`.
pub fn logscale(s: usize, segments: usize, depth: BitDepth) -> u32 {
    let full_scale = depth.signed_max() as f64;
    let y = libm::pow(segments as f64, s as f64 / segments as f64) / segments as f64;
    libm::floor(y * full_scale) as u32
}
