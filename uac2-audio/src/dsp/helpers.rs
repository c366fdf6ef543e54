//! Bit-level helpers for `bit_depth`-wide samples.

use crate::config::BitDepth;
use crate::node::Sample;

/// Interpret a two's complement sample as a signed integer.
#[inline(always)]
pub fn sign_extend(raw: Sample, depth: BitDepth) -> i32 {
    let shift = 32 - depth.bits();
    ((raw << shift) as i32) >> shift
}

/// Wrap a signed integer into a `depth`-bit two's complement pattern.
#[inline(always)]
pub fn wrap_signed(value: i64, depth: BitDepth) -> Sample {
    (value as u32) & depth.mask()
}

/// Convert a two's complement sample to offset binary.
///
/// Equivalent to subtracting `2^(bits-1)` modulo `2^bits`: the most negative
/// value maps to 0, zero to mid-scale, the most positive value to full scale.
#[inline(always)]
pub fn to_offset_binary(raw: Sample, depth: BitDepth) -> Sample {
    (raw ^ (1 << (depth.bits() - 1))) & depth.mask()
}

/// Absolute value of a two's complement sample.
#[inline(always)]
pub fn magnitude(raw: Sample, depth: BitDepth) -> u32 {
    sign_extend(raw, depth).unsigned_abs()
}

/// `(a + b) >> 1` in the sample's own signedness, without overflow.
#[inline(always)]
pub fn average(a: Sample, b: Sample, depth: BitDepth, signed: bool) -> Sample {
    if signed {
        let sum = sign_extend(a, depth) as i64 + sign_extend(b, depth) as i64;
        wrap_signed(sum >> 1, depth)
    } else {
        ((a as u64 + b as u64) >> 1) as Sample
    }
}
