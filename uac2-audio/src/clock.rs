//! Integer clock division from the master clock.
//!
//! Every timed block in the core (oscillator pacing, delta-sigma modulation,
//! DAC and meter sample ticks) runs from one master clock. [`RateDivider`]
//! turns that clock into a one-tick strobe at a derived rate. The divisor is
//! fixed at construction, so the strobe period never drifts.

use crate::error::ConfigError;

/// A strobe that fires once every `cycles` master ticks.
///
/// # Example
/// ```ignore
/// let cycles = RateDivider::derive("sampling", 60e6, 48e3, Some(0.0))?;
/// let mut divider = RateDivider::new(cycles);
///
/// // once per master tick:
/// if divider.tick() {
///     // sample-rate work
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RateDivider {
    cycles: u32,
    counter: u32,
}

impl RateDivider {
    /// Compute the divisor that takes `input_hz` closest to `output_hz`.
    ///
    /// `cycles = round(input_hz / output_hz)`. With `max_deviation_ppm` set,
    /// the realized rate `input_hz / cycles` must lie within that many parts
    /// per million of `output_hz`; `Some(0.0)` accepts exact divisors only.
    /// `clock` names the clock in logs and errors.
    pub fn derive(
        clock: &'static str,
        input_hz: f64,
        output_hz: f64,
        max_deviation_ppm: Option<f64>,
    ) -> Result<u32, ConfigError> {
        let too_high = ConfigError::RateTooHigh {
            clock,
            input_hz,
            requested_hz: output_hz,
        };
        if !(output_hz > 0.0) || !input_hz.is_finite() {
            return Err(too_high);
        }

        let cycles = libm::round(input_hz / output_hz);
        if cycles < 1.0 || cycles > u32::MAX as f64 {
            return Err(too_high);
        }
        let cycles = cycles as u32;

        let actual_hz = input_hz / cycles as f64;
        let deviation_ppm = libm::fabs(actual_hz - output_hz) / output_hz * 1e6;

        if let Some(max_ppm) = max_deviation_ppm {
            if deviation_ppm > max_ppm {
                return Err(ConfigError::Deviation {
                    clock,
                    requested_hz: output_hz,
                    actual_hz,
                    deviation_ppm,
                    max_ppm,
                });
            }
        }

        tracing::debug!(
            clock,
            requested_hz = output_hz,
            actual_hz,
            deviation_ppm,
            cycles,
            "derived clock"
        );

        Ok(cycles)
    }

    /// Divider with a known divisor. `cycles` of 0 is treated as 1.
    pub const fn new(cycles: u32) -> Self {
        let cycles = if cycles == 0 { 1 } else { cycles };
        RateDivider {
            cycles,
            counter: cycles - 1,
        }
    }

    /// Derive and build in one step.
    pub fn for_rate(
        clock: &'static str,
        input_hz: f64,
        output_hz: f64,
        max_deviation_ppm: Option<f64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(Self::derive(clock, input_hz, output_hz, max_deviation_ppm)?))
    }

    /// Advance one master tick. Returns `true` on the strobe tick.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if self.counter == 0 {
            self.counter = self.cycles - 1;
            true
        } else {
            self.counter -= 1;
            false
        }
    }

    /// Master ticks per strobe.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}
