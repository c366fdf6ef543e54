//! Byte-stream framing between the transport and the sample path.
//!
//! ## Components
//!
//! | Component | Direction | Description |
//! |-----------|-----------|-------------|
//! | [`StreamToSamples`] | host → device | byte stream to per-channel samples |
//! | [`SamplesToStream`] | device → host | per-channel samples to byte stream |
//! | [`SyncFifo`] | internal | depth-limited sample queue |
//!
//! ## Wire format
//!
//! A frame is one subslot per channel, channel 0 first. A subslot is
//! `subslot_size` bytes, low byte first. Channel order is implied by
//! position in the packet; nothing on the wire names a channel.

pub mod demux;
pub mod fifo;
pub mod mux;

pub use demux::{DemuxRegisters, DemuxState, Emitted, StreamToSamples};
pub use fifo::SyncFifo;
pub use mux::SamplesToStream;

use crate::constants::FIFO_DEPTH;

/// The sample queue used throughout the core.
pub type SampleFifo = SyncFifo<FIFO_DEPTH>;

/// One byte from the transport with its packet-start marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub data: u8,
    /// Set on the first byte of an isochronous packet.
    pub first: bool,
}

impl Packet {
    pub const fn new(data: u8, first: bool) -> Self {
        Packet { data, first }
    }
}
