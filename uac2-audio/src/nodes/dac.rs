//! First-order delta-sigma DAC.
//!
//! Each channel adds its held sample into a `bit_depth`-wide accumulator on
//! every modulation strobe; the carry out of that addition is the channel's
//! one-bit output. Averaged over many strobes the density of ones is
//! `held / 2^bit_depth`, so a low-pass filter on the output pin recovers the
//! audio.
//!
//! ## Sequencing
//!
//! ```text
//! STANDBY ─► WAIT ──(timer = 0)──► CHANNEL-READ ──► LATCH ─┐
//!             ▲                                            │
//!             └────────────────────────────────────────────┘
//! ```
//!
//! One pass takes exactly one sample period. CHANNEL-READ pops one sample
//! from each channel's FIFO into the channel; LATCH raises the update strobe
//! for one tick so every channel adopts its new sample on the same tick.
//! The accumulators are never reset.

use crate::clock::RateDivider;
use crate::config::{BitDepth, StreamConfig};
use crate::constants::MODULATION_HZ;
use crate::dsp::helpers::to_offset_binary;
use crate::error::ConfigError;
use crate::io::SampleFifo;
use crate::node::Sample;

/// One modulator channel.
#[derive(Debug, Clone)]
pub struct DacChannel {
    depth: BitDepth,
    signed: bool,
    /// Sample copied from the FIFO, waiting for the update strobe.
    input: Sample,
    /// Unsigned sample being modulated.
    held: Sample,
    accumulator: u32,
    output: bool,
}

impl DacChannel {
    /// `signed` channels take two's complement input and convert it to
    /// offset binary on update.
    pub const fn new(depth: BitDepth, signed: bool) -> Self {
        DacChannel {
            depth,
            signed,
            input: 0,
            held: 0,
            accumulator: 0,
            output: false,
        }
    }

    /// Load the next sample. It takes effect on [`update()`](Self::update).
    pub fn set_input(&mut self, sample: Sample) {
        self.input = sample & self.depth.mask();
    }

    /// Update strobe: adopt the loaded sample.
    pub fn update(&mut self) {
        self.held = if self.signed {
            to_offset_binary(self.input, self.depth)
        } else {
            self.input
        };
    }

    /// Modulation strobe: one accumulator step. Returns the new output bit.
    #[inline]
    pub fn modulate(&mut self) -> bool {
        let sum = self.accumulator as u64 + self.held as u64;
        self.accumulator = (sum & self.depth.mask() as u64) as u32;
        self.output = (sum >> self.depth.bits()) & 1 == 1;
        self.output
    }

    pub fn output(&self) -> bool {
        self.output
    }

    /// The unsigned value being modulated.
    pub fn held(&self) -> Sample {
        self.held
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    Standby,
    Wait,
    ChannelRead,
    Latch,
}

/// Multi-channel delta-sigma DAC with per-channel input FIFOs.
pub struct DeltaSigmaDac<const C: usize> {
    channels: [DacChannel; C],
    inputs: [SampleFifo; C],
    pulse: RateDivider,
    sample_cycles: u32,
    timer: u32,
    sequence: Sequence,
    latch: bool,
}

impl<const C: usize> DeltaSigmaDac<C> {
    /// Build a DAC running from `master_hz`.
    ///
    /// The modulation strobe targets 30 MHz with any deviation accepted; the
    /// sample period must divide the master clock exactly.
    pub fn new(config: &StreamConfig, master_hz: f64, signed: bool) -> Result<Self, ConfigError> {
        config.expect_channels(C)?;

        let pulse_cycles = RateDivider::derive("modulation", master_hz, MODULATION_HZ, None)?;
        let sample_cycles =
            RateDivider::derive("sampling", master_hz, config.sample_rate(), Some(0.0))?;
        if sample_cycles < 3 {
            return Err(ConfigError::SamplePeriodTooShort {
                cycles: sample_cycles,
            });
        }

        tracing::info!(pulse_cycles, sample_cycles, "delta-sigma DAC clocks");

        let depth = config.bit_depth();
        Ok(DeltaSigmaDac {
            channels: core::array::from_fn(|_| DacChannel::new(depth, signed)),
            inputs: core::array::from_fn(|_| SampleFifo::new()),
            pulse: RateDivider::new(pulse_cycles),
            sample_cycles,
            timer: 0,
            sequence: Sequence::Standby,
            latch: false,
        })
    }

    /// Queue a sample for `channel`. Returns it back if that FIFO is full.
    pub fn push(&mut self, channel: usize, sample: Sample) -> Result<(), Sample> {
        self.inputs[channel].write(sample)
    }

    /// Whether `channel`'s FIFO has room.
    pub fn ready(&self, channel: usize) -> bool {
        self.inputs[channel].w_rdy()
    }

    /// The per-channel input FIFOs, for wiring as sample sinks.
    pub fn inputs_mut(&mut self) -> &mut [SampleFifo; C] {
        &mut self.inputs
    }

    /// Advance one master tick. Returns the output bit of every channel.
    pub fn tick(&mut self) -> [bool; C] {
        let stb = self.pulse.tick();
        self.latch = false;

        self.sequence = match self.sequence {
            Sequence::Standby => Sequence::Wait,
            Sequence::Wait => {
                if self.timer == 0 {
                    // WAIT + CHANNEL-READ + LATCH = sample_cycles
                    self.timer = self.sample_cycles - 3;
                    Sequence::ChannelRead
                } else {
                    self.timer -= 1;
                    Sequence::Wait
                }
            }
            Sequence::ChannelRead => {
                for (channel, fifo) in self.channels.iter_mut().zip(self.inputs.iter_mut()) {
                    // An empty FIFO repeats its last sample
                    channel.set_input(fifo.read_or_hold());
                }
                Sequence::Latch
            }
            Sequence::Latch => {
                self.latch = true;
                Sequence::Wait
            }
        };

        // Modulate with the sample held before this tick's update
        if stb {
            for channel in self.channels.iter_mut() {
                channel.modulate();
            }
        }
        if self.latch {
            for channel in self.channels.iter_mut() {
                channel.update();
            }
        }

        self.outputs()
    }

    /// Current output bit of every channel.
    pub fn outputs(&self) -> [bool; C] {
        core::array::from_fn(|i| self.channels[i].output())
    }

    /// `true` on the tick all channels adopted a new sample.
    pub fn latch(&self) -> bool {
        self.latch
    }

    pub fn channel(&self, index: usize) -> &DacChannel {
        &self.channels[index]
    }

    /// Master ticks per sample period.
    pub fn sample_cycles(&self) -> u32 {
        self.sample_cycles
    }

    /// Master ticks per modulation strobe.
    pub fn pulse_cycles(&self) -> u32 {
        self.pulse.cycles()
    }
}
