//! Host-to-device stream deserializer: bytes → per-channel samples.
//!
//! Each byte from the transport carries a `first` marker, set on the first
//! byte of every isochronous packet. A packet always begins with channel 0,
//! so the marker is the only framing information: there is no byte counter
//! beyond the position inside the current subslot.
//!
//! ## Subslot layout (24-bit, 4-byte subslot)
//!
//! ```text
//! byte 0   padding (discarded)
//! byte 1   sample bits  0..8
//! byte 2   sample bits  8..16
//! byte 3   sample bits 16..24
//! ```
//!
//! 8/16/32-bit subslots carry no padding; bytes are always low-to-high.
//!
//! ## Error recovery
//!
//! A `first` marker on any byte but the first of a subslot means the host
//! cut the previous subslot short. The partial subslot is dropped and the
//! marked byte is taken as byte 0 of channel 0, so decoding continues with
//! the packet the host just started.

use crate::config::{BitDepth, StreamConfig};
use crate::error::ConfigError;
use crate::node::{Sample, SampleSink};

use super::Packet;

/// Position of the deserializer inside a subslot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemuxState {
    /// Waiting for byte `k` of the current subslot.
    Byte(u8),
    /// A marker arrived mid-subslot. Resolved on the same byte.
    Error,
}

/// One completed subslot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emitted {
    pub channel: usize,
    pub sample: Sample,
}

/// Next state for a byte arriving in `state`, before its data is stored.
///
/// Only the marker matters: the marker is expected in `Byte(0)` and forbidden
/// everywhere else.
pub const fn transition(state: DemuxState, first: bool) -> DemuxState {
    match state {
        DemuxState::Byte(k) if k > 0 && first => DemuxState::Error,
        other => other,
    }
}

/// Registers carried from one byte to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemuxRegisters {
    pub state: DemuxState,
    /// Channel the current subslot belongs to.
    pub channel: usize,
    /// Bytes of the current subslot received so far, placed at their offsets.
    pub subslot: u32,
}

impl DemuxRegisters {
    pub const RESET: DemuxRegisters = DemuxRegisters {
        state: DemuxState::Byte(0),
        channel: 0,
        subslot: 0,
    };
}

/// Result of one byte through [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: DemuxRegisters,
    /// Completed subslot, on its last byte.
    pub emitted: Option<Emitted>,
    /// The byte's marker arrived mid-subslot.
    pub violation: bool,
}

/// One byte through the deserializer for `C` channels at `depth`.
///
/// A pure function of its inputs: `(registers, byte, marker) → (registers,
/// sample)`. A violation drops the partial subslot and handles the byte as
/// byte 0 of channel 0, so `next.state` is never `Error`.
pub const fn step<const C: usize>(regs: DemuxRegisters, packet: Packet, depth: BitDepth) -> Step {
    let state = transition(regs.state, packet.first);
    let violation = matches!(state, DemuxState::Error);

    let (k, channel) = match state {
        DemuxState::Error => (0, 0),
        DemuxState::Byte(0) => (0, if packet.first { 0 } else { (regs.channel + 1) % C }),
        DemuxState::Byte(k) => (k, regs.channel),
    };

    let byte = (packet.data as u32) << (8 * k as u32);
    let subslot = if k == 0 { byte } else { regs.subslot | byte };

    if k as usize + 1 == depth.subslot_size() {
        Step {
            next: DemuxRegisters {
                state: DemuxState::Byte(0),
                channel,
                subslot,
            },
            emitted: Some(Emitted {
                channel,
                sample: (subslot >> depth.padding_bits()) & depth.mask(),
            }),
            violation,
        }
    } else {
        Step {
            next: DemuxRegisters {
                state: DemuxState::Byte(k + 1),
                channel,
                subslot,
            },
            emitted: None,
            violation,
        }
    }
}

/// Deserializes a UAC2 byte stream into samples for `C` channels.
pub struct StreamToSamples<const C: usize> {
    depth: BitDepth,
    regs: DemuxRegisters,
    error: bool,
    violations: u32,
    dropped: u32,
}

impl<const C: usize> StreamToSamples<C> {
    pub fn new(config: &StreamConfig) -> Result<Self, ConfigError> {
        config.expect_channels(C)?;

        Ok(StreamToSamples {
            depth: config.bit_depth(),
            regs: DemuxRegisters::RESET,
            error: false,
            violations: 0,
            dropped: 0,
        })
    }

    /// Consume one byte. The caller has checked that a downstream sink is ready.
    ///
    /// Returns the finished sample on the last byte of a subslot.
    pub fn receive(&mut self, packet: Packet) -> Option<Emitted> {
        let step = step::<C>(self.regs, packet, self.depth);
        self.regs = step.next;
        self.error = step.violation;

        if step.violation {
            self.violations = self.violations.wrapping_add(1);
            tracing::debug!(
                violations = self.violations,
                "framing violation, resynchronising"
            );
        }
        step.emitted
    }

    /// No byte this tick: hold the channel counter and partial subslot at zero.
    ///
    /// The byte position is kept, so a gap inside a packet desynchronizes
    /// the channel count until the next `first` marker: the next subslot
    /// is counted from channel 0 and lands on channel 1. Transports must
    /// deliver the bytes of one packet on consecutive ticks.
    pub fn idle(&mut self) {
        self.regs.channel = 0;
        self.regs.subslot = 0;
        self.error = false;
    }

    /// Run one tick against a set of per-channel sinks.
    ///
    /// The byte is consumed only if at least one sink is ready; otherwise
    /// the deserializer idles. A finished sample goes to the sink of its
    /// channel; if that sink is full the sample is lost and counted in
    /// [`dropped()`](Self::dropped).
    pub fn feed<S: SampleSink>(
        &mut self,
        packet: Option<Packet>,
        outputs: &mut [S; C],
    ) -> Option<Emitted> {
        match packet {
            Some(packet) if outputs.iter().any(|s| s.ready()) => {
                let emitted = self.receive(packet)?;
                if !outputs[emitted.channel].push(emitted.sample) {
                    self.dropped = self.dropped.wrapping_add(1);
                    tracing::trace!(
                        channel = emitted.channel,
                        dropped = self.dropped,
                        "sink full, sample lost"
                    );
                }
                Some(emitted)
            }
            _ => {
                self.idle();
                None
            }
        }
    }

    pub fn state(&self) -> DemuxState {
        self.regs.state
    }

    /// Channel the current subslot belongs to.
    pub fn channel(&self) -> usize {
        self.regs.channel
    }

    /// `true` for the tick on which a framing violation was detected.
    pub fn error(&self) -> bool {
        self.error
    }

    /// Framing violations seen since construction.
    pub fn violations(&self) -> u32 {
        self.violations
    }

    /// Completed samples lost to a full sink.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
