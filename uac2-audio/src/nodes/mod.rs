//! Signal-path nodes.
//!
//! | Node | Role | Pacing |
//! |------|------|--------|
//! | [`Nco`] | source | advances when its consumer takes a sample |
//! | [`DeltaSigmaDac`] | sink | sample clock + modulation clock |
//! | [`LevelMeter`] | sink | sample clock |

mod dac;
mod nco;
mod vu;

pub use dac::{DacChannel, DeltaSigmaDac};
pub use nco::Nco;
pub use vu::{logscale, LevelMeter};
