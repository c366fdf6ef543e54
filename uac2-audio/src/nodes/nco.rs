//! Numerically controlled oscillator using a phase accumulator and table lookup.
//!
//! The top `log2(N)` bits of a 32-bit phase accumulator select a table
//! entry. The output is the average of that entry and the next one, which
//! halves the quantization step of a short table.

use crate::constants::PHI_BITS;
use crate::dsp::helpers::average;
use crate::dsp::wavetable::Waveform;
use crate::node::{Sample, SampleSource};

/// Table-lookup oscillator. Source node: always has a sample on offer.
///
/// The phase only moves when the consumer takes a sample, so the output
/// frequency `phase_increment * sample_rate / 2^32` holds only while the
/// consumer keeps pace with the sample rate.
///
/// # Example
/// ```ignore
/// let table = Waveform::<256>::cosine(BitDepth::TwentyFour, 1.0, true)?;
/// let mut nco = Nco::new(&table);
/// nco.set_frequency(1_000.0, 48_000.0);
///
/// let sample = nco.payload();
/// nco.accept();
/// ```
pub struct Nco<'t, const N: usize> {
    table: &'t Waveform<N>,
    /// Phase accumulator (wraps naturally at 32 bits = one period).
    phase_accumulator: u32,
    /// Phase step per accepted sample.
    phase_increment: u32,
}

impl<'t, const N: usize> Nco<'t, N> {
    /// Create an oscillator at phase 0 with increment 0 (DC at table[0]).
    pub const fn new(table: &'t Waveform<N>) -> Self {
        Nco {
            table,
            phase_accumulator: 0,
            phase_increment: 0,
        }
    }

    /// Phase step producing `hz` at `sample_rate`, truncated.
    pub fn phase_increment_for(hz: f64, sample_rate: f64) -> u32 {
        (hz * (1u64 << PHI_BITS) as f64 / sample_rate) as u32
    }

    /// Set the phase step directly.
    pub fn set_phase_increment(&mut self, increment: u32) {
        self.phase_increment = increment;
    }

    /// Set the output frequency in Hz for a consumer running at `sample_rate`.
    pub fn set_frequency(&mut self, hz: f64, sample_rate: f64) {
        self.phase_increment = Self::phase_increment_for(hz, sample_rate);
    }

    pub fn phase_increment(&self) -> u32 {
        self.phase_increment
    }

    pub fn phase(&self) -> u32 {
        self.phase_accumulator
    }

    /// Table index selected by the current phase.
    #[inline(always)]
    fn index(&self) -> usize {
        let bits = Waveform::<N>::index_bits();
        if bits == 0 {
            0
        } else {
            (self.phase_accumulator >> (PHI_BITS - bits)) as usize
        }
    }

    /// The current output sample: `(table[idx] + table[idx + 1]) >> 1`.
    pub fn sample(&self) -> Sample {
        let index = self.index();
        average(
            self.table.get(index),
            self.table.get(index + 1),
            self.table.bit_depth(),
            self.table.is_signed(),
        )
    }

    /// Step the phase once. Called when the consumer takes a sample.
    #[inline]
    pub fn advance(&mut self) {
        self.phase_accumulator = self.phase_accumulator.wrapping_add(self.phase_increment);
    }
}

impl<const N: usize> SampleSource for Nco<'_, N> {
    fn payload(&self) -> Sample {
        self.sample()
    }

    fn accept(&mut self) {
        self.advance();
    }
}
