//! Oscillator lookup tables.
//!
//! Tables are built once, at configuration time, and shared read-only by
//! every oscillator that plays them. Generation is plain `f64` arithmetic in
//! a fixed order, so the same parameters always give the same table.

use crate::config::BitDepth;
use crate::dsp::helpers::wrap_signed;
use crate::error::ConfigError;
use crate::node::Sample;

/// Full scale.
pub const GAIN_UNITY: f64 = 1.0;
/// -2 dB.
pub const GAIN_MINUS_2DB: f64 = 0.794328;
/// -6 dB.
pub const GAIN_MINUS_6DB: f64 = 0.501187;

/// One period of a waveform, `N` entries long.
pub struct Waveform<const N: usize> {
    samples: [Sample; N],
    depth: BitDepth,
    signed: bool,
}

impl<const N: usize> Waveform<N> {
    /// One period of a cosine scaled to the range of `depth`.
    ///
    /// Entry `x` is `cos(2π·x/N)` times half of `2^bits - 1`, shifted up by
    /// the same amount when unsigned, multiplied by `gain` and truncated
    /// toward zero. Signed tables store two's complement patterns.
    pub fn cosine(depth: BitDepth, gain: f64, signed: bool) -> Result<Self, ConfigError> {
        if !N.is_power_of_two() {
            return Err(ConfigError::TableLength(N));
        }
        if !(0.0..=1.0).contains(&gain) {
            return Err(ConfigError::Gain(gain));
        }

        let half_scale = depth.mask() as f64 / 2.0;
        let mut samples = [0; N];

        for (x, entry) in samples.iter_mut().enumerate() {
            let mut y = libm::cos(core::f64::consts::TAU * x as f64 / N as f64) * half_scale;
            if !signed {
                y += half_scale;
            }
            y *= gain;

            *entry = if signed {
                wrap_signed(y as i64, depth)
            } else {
                y as u64 as Sample
            };
        }

        tracing::debug!(length = N, bits = depth.bits(), gain, signed, "built cosine table");

        Ok(Waveform {
            samples,
            depth,
            signed,
        })
    }

    /// Table entry at `index`, wrapping past the end.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Sample {
        self.samples[index & (N - 1)]
    }

    pub fn samples(&self) -> &[Sample; N] {
        &self.samples
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Number of phase bits used to index the table.
    pub const fn index_bits() -> u32 {
        N.trailing_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::helpers::sign_extend;

    #[test]
    fn signed_cosine_endpoints() {
        let t = Waveform::<256>::cosine(BitDepth::TwentyFour, GAIN_UNITY, true).unwrap();
        let d = BitDepth::TwentyFour;

        // cos(0) = 1 -> (2^24 - 1) / 2 = 8388607.5, truncated
        assert_eq!(sign_extend(t.get(0), d), 8_388_607);
        // cos(π) = -1
        assert_eq!(sign_extend(t.get(128), d), -8_388_607);
        // cos(π/2) ~ 0
        assert!(sign_extend(t.get(64), d).abs() <= 1);
        // symmetric about π
        assert_eq!(t.get(1), t.get(255));
    }

    #[test]
    fn unsigned_cosine_range() {
        let t = Waveform::<64>::cosine(BitDepth::Sixteen, GAIN_UNITY, false).unwrap();
        // 65535 / 2 + 65535 / 2 = 65535
        assert_eq!(t.get(0), 65_535);
        assert_eq!(t.get(32), 0);
        assert!(t.samples().iter().all(|&s| s <= 0xFFFF));
    }

    #[test]
    fn unsigned_thirty_two_bit_fits() {
        let t = Waveform::<16>::cosine(BitDepth::ThirtyTwo, GAIN_UNITY, false).unwrap();
        assert_eq!(t.get(0), u32::MAX);
        assert_eq!(t.get(8), 0);
    }

    #[test]
    fn gain_scales_amplitude() {
        let d = BitDepth::Sixteen;
        let t = Waveform::<32>::cosine(d, GAIN_MINUS_6DB, true).unwrap();
        // 32767.5 * 0.501187 = 16422.65
        assert_eq!(sign_extend(t.get(0), d), 16_422);
        assert_eq!(sign_extend(t.get(16), d), -16_422);
    }

    #[test]
    fn zero_gain_is_silent() {
        let t = Waveform::<8>::cosine(BitDepth::Eight, 0.0, true).unwrap();
        assert!(t.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn deterministic() {
        let a = Waveform::<256>::cosine(BitDepth::TwentyFour, GAIN_MINUS_2DB, true).unwrap();
        let b = Waveform::<256>::cosine(BitDepth::TwentyFour, GAIN_MINUS_2DB, true).unwrap();
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            Waveform::<100>::cosine(BitDepth::Sixteen, 1.0, true).err(),
            Some(ConfigError::TableLength(100))
        );
        assert_eq!(
            Waveform::<64>::cosine(BitDepth::Sixteen, 1.5, true).err(),
            Some(ConfigError::Gain(1.5))
        );
        assert!(Waveform::<64>::cosine(BitDepth::Sixteen, f64::NAN, true).is_err());
    }

    #[test]
    fn index_wraps() {
        let t = Waveform::<8>::cosine(BitDepth::Eight, 1.0, true).unwrap();
        assert_eq!(t.get(8), t.get(0));
        assert_eq!(t.get(9), t.get(1));
        assert_eq!(Waveform::<256>::index_bits(), 8);
    }
}
