//! Asynchronous-endpoint feedback word.
//!
//! The transport reports how many samples per microframe the device
//! consumes so the host can pace its isochronous sends. This core has no
//! rate-adaptation loop, so the word is derived once from the configured
//! sample rate and never changes.

use fixed::types::U16F16;

use crate::config::StreamConfig;

/// Feedback word reported to the host.
///
/// The word is `round(samples_per_microframe * 2^17)`: a Q16.16 value
/// scaled by two, which is the form the transport forwards on the wire.
///
/// | Rate | Samples per microframe | Word |
/// |------|------------------------|------|
/// | 48 kHz | 6.0 | `0x000C_0000` |
/// | 44.1 kHz | 5.5125 | `0x000B_0666` |
/// | 96 kHz | 12.0 | `0x0018_0000` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    nominal: U16F16,
    value: u32,
}

impl Feedback {
    pub fn new(config: &StreamConfig) -> Self {
        let spm = config.samples_per_microframe();
        let value = libm::round(spm * (1u32 << 17) as f64) as u32;

        tracing::info!(samples_per_microframe = spm, value, "feedback word");

        Feedback {
            nominal: U16F16::saturating_from_num(spm),
            value,
        }
    }

    /// The feedback word.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Nominal samples per microframe as Q16.16.
    pub fn samples_per_microframe(&self) -> U16F16 {
        self.nominal
    }

    /// Byte `address` of the word, low byte first. Zero past the fourth byte.
    pub fn byte(&self, address: usize) -> u8 {
        match address {
            0..=3 => (self.value >> (8 * address)) as u8,
            _ => 0,
        }
    }

    /// The word as it goes on the wire.
    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.value.to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn feedback(rate: f64) -> Feedback {
        Feedback::new(&StreamConfig::new(rate, 24, 2).unwrap())
    }

    #[test]
    fn forty_eight_khz() {
        let fb = feedback(48_000.0);
        assert_eq!(fb.value(), 0x000C_0000);
        assert_eq!(fb.samples_per_microframe(), U16F16::from_num(6));
        assert_eq!(fb.to_le_bytes(), [0x00, 0x00, 0x0C, 0x00]);
    }

    #[test]
    fn fractional_rate_rounds() {
        // 5.5125 * 131072 = 722534.4
        let fb = feedback(44_100.0);
        assert_eq!(fb.value(), 722_534);
        assert_relative_eq!(fb.samples_per_microframe().to_num::<f64>(), 5.5125, epsilon = 1e-4);
    }

    #[test]
    fn word_is_twice_nominal_q16() {
        for &rate in [8_000.0, 32_000.0, 48_000.0, 96_000.0].iter() {
            let fb = feedback(rate);
            assert_eq!(fb.value(), fb.samples_per_microframe().to_bits() << 1, "{} Hz", rate);
        }
    }

    #[test]
    fn byte_addressing() {
        let fb = feedback(96_000.0);
        assert_eq!(fb.value(), 0x0018_0000);
        assert_eq!(fb.byte(0), 0x00);
        assert_eq!(fb.byte(1), 0x00);
        assert_eq!(fb.byte(2), 0x18);
        assert_eq!(fb.byte(3), 0x00);
        assert_eq!(fb.byte(4), 0);
        assert_eq!(fb.byte(usize::MAX), 0);

        for a in 0..4 {
            assert_eq!(fb.byte(a), fb.to_le_bytes()[a]);
        }
    }

    #[test]
    fn constant_for_the_session() {
        let config = StreamConfig::new(48_000.0, 16, 2).unwrap();
        assert_eq!(Feedback::new(&config), Feedback::new(&config));
    }
}
