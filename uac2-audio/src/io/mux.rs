//! Device-to-host stream serializer: per-channel samples → bytes.
//!
//! A channel selector and a byte offset address the subslot of the selected
//! channel's pending sample. The output byte is always valid; every byte the
//! transport takes advances the offset, and taking the last byte of a
//! subslot hands the sample back to its source and moves to the next channel.
//!
//! The subslot is rebuilt from the source's payload on every read, with the
//! sample in the upper bytes and the padding (24-bit only) in the low byte.

use crate::config::{BitDepth, StreamConfig};
use crate::error::ConfigError;
use crate::node::SampleSource;

/// Serializes `C` sample sources into a UAC2 byte stream.
pub struct SamplesToStream<const C: usize> {
    depth: BitDepth,
    channel: usize,
    offset: usize,
}

impl<const C: usize> SamplesToStream<C> {
    pub fn new(config: &StreamConfig) -> Result<Self, ConfigError> {
        config.expect_channels(C)?;
        Ok(SamplesToStream {
            depth: config.bit_depth(),
            channel: 0,
            offset: 0,
        })
    }

    /// The byte currently on offer.
    pub fn byte<S: SampleSource>(&self, inputs: &[S; C]) -> u8 {
        let sample = inputs[self.channel].payload() & self.depth.mask();
        let subslot = sample << self.depth.padding_bits();
        (subslot >> (8 * self.offset)) as u8
    }

    /// The transport takes the current byte.
    ///
    /// On the last byte of a subslot the selected source's sample is
    /// accepted, exactly once per subslot.
    pub fn transfer<S: SampleSource>(&mut self, inputs: &mut [S; C]) -> u8 {
        let byte = self.byte(inputs);

        if self.offset + 1 == self.depth.subslot_size() {
            inputs[self.channel].accept();
            self.channel = (self.channel + 1) % C;
            self.offset = 0;
        } else {
            self.offset += 1;
        }

        byte
    }

    /// Channel whose sample is being serialized.
    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Byte position inside the current subslot.
    pub fn offset(&self) -> usize {
        self.offset
    }
}
