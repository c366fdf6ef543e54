//! Per-session stream configuration.
//!
//! A [`StreamConfig`] is built once, validated, and handed by reference to
//! every component. Nothing in the core changes it afterwards.

use crate::constants::{MAX_PACKET_SIZE, MICROFRAMES_PER_SECOND};
use crate::error::ConfigError;
use crate::node::Sample;

/// Sample width. All channels of a pipeline share one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Eight = 8,
    Sixteen = 16,
    TwentyFour = 24,
    ThirtyTwo = 32,
}

impl BitDepth {
    /// Number of significant bits per sample.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Bytes per channel per frame on the wire.
    ///
    /// 24-bit samples travel in 4-byte subslots with one padding byte.
    pub const fn subslot_size(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
            BitDepth::TwentyFour | BitDepth::ThirtyTwo => 4,
        }
    }

    /// Padding bits at the low end of a subslot.
    pub const fn padding_bits(self) -> u32 {
        self.subslot_size() as u32 * 8 - self.bits()
    }

    /// Mask covering the significant bits of a [`Sample`].
    pub const fn mask(self) -> Sample {
        match self {
            BitDepth::ThirtyTwo => u32::MAX,
            _ => (1 << self.bits()) - 1,
        }
    }

    /// Largest positive value of a signed sample at this depth.
    pub const fn signed_max(self) -> Sample {
        self.mask() >> 1
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = ConfigError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            32 => Ok(BitDepth::ThirtyTwo),
            other => Err(ConfigError::UnsupportedBitDepth(other)),
        }
    }
}

/// Sample rate, bit depth and channel count of one streaming session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConfig {
    sample_rate: f64,
    bit_depth: BitDepth,
    channels: usize,
}

impl StreamConfig {
    /// Validate a stream configuration.
    ///
    /// Fails if the rate is not a positive finite number, the bit depth is
    /// not one of 8/16/24/32, or one microframe's worth of audio does not fit
    /// in a single isochronous packet.
    pub fn new(sample_rate: f64, bit_depth: u32, channels: usize) -> Result<Self, ConfigError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        let bit_depth = BitDepth::try_from(bit_depth)?;
        if channels == 0 {
            return Err(ConfigError::ChannelCount {
                configured: 0,
                supported: crate::constants::CHANNELS,
            });
        }

        let config = StreamConfig {
            sample_rate,
            bit_depth,
            channels,
        };

        let bytes = config.bytes_per_microframe();
        tracing::info!(
            sample_rate,
            bit_depth = bit_depth.bits(),
            channels,
            bytes_per_microframe = bytes,
            "stream configuration"
        );
        if bytes > MAX_PACKET_SIZE {
            return Err(ConfigError::PacketTooLarge {
                bytes,
                max: MAX_PACKET_SIZE,
            });
        }

        Ok(config)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn subslot_size(&self) -> usize {
        self.bit_depth.subslot_size()
    }

    /// Nominal samples per channel in one 125 µs microframe.
    pub fn samples_per_microframe(&self) -> f64 {
        self.sample_rate / MICROFRAMES_PER_SECOND
    }

    /// Audio bytes the transport moves per microframe, truncated.
    pub fn bytes_per_microframe(&self) -> usize {
        (self.samples_per_microframe() * (self.subslot_size() * self.channels) as f64) as usize
    }

    /// Endpoint packet size the transport should provision.
    ///
    /// One byte above the nominal microframe payload leaves room for the
    /// host's rate adjustments.
    pub fn max_packet_size(&self) -> usize {
        self.bytes_per_microframe() + 1
    }

    /// Fail unless this configuration has exactly `supported` channels.
    pub(crate) fn expect_channels(&self, supported: usize) -> Result<(), ConfigError> {
        if self.channels != supported {
            return Err(ConfigError::ChannelCount {
                configured: self.channels,
                supported,
            });
        }
        Ok(())
    }
}
