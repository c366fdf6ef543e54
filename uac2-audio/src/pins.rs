//! Output pins for the DAC bits and the level meter bar.
//!
//! Generic over any [`embedded_hal::digital::OutputPin`], so the same code
//! drives GPIO on a board or a recording mock in tests.
//!
//! # Example
//!
//! ```ignore
//! let mut dac = DacPins::new([left_pin, right_pin]);
//! let mut bar = LedBar::new([led0, led1, led2, led3, led4, led5]);
//!
//! let out = pipeline.tick(rx, tx_ready);
//! dac.write(&out.dac)?;
//! bar.write(out.leds)?;
//! ```

use embedded_hal::digital::{OutputPin, PinState};

/// One pin per DAC channel.
pub struct DacPins<P, const C: usize> {
    pins: [P; C],
}

impl<P: OutputPin, const C: usize> DacPins<P, C> {
    pub fn new(pins: [P; C]) -> Self {
        DacPins { pins }
    }

    /// Drive every channel's pin to its output bit.
    pub fn write(&mut self, bits: &[bool; C]) -> Result<(), P::Error> {
        for (pin, &bit) in self.pins.iter_mut().zip(bits.iter()) {
            pin.set_state(PinState::from(bit))?;
        }
        Ok(())
    }

    pub fn release(self) -> [P; C] {
        self.pins
    }
}

/// A bar of `S` LEDs, LED `i` lit by bit `i` of the meter bitmap.
pub struct LedBar<P, const S: usize> {
    pins: [P; S],
}

impl<P: OutputPin, const S: usize> LedBar<P, S> {
    pub fn new(pins: [P; S]) -> Self {
        LedBar { pins }
    }

    /// Show a bitmap. Bits beyond the last LED are ignored.
    pub fn write(&mut self, bitmap: u32) -> Result<(), P::Error> {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            let lit = i < 32 && (bitmap >> i) & 1 == 1;
            pin.set_state(PinState::from(lit))?;
        }
        Ok(())
    }

    pub fn release(self) -> [P; S] {
        self.pins
    }
}
