//! # uac2-audio
//!
//! A `no_std`, zero-allocation model of the real-time signal path of a
//! USB Audio Class 2 streaming device, written in pure Rust. It converts
//! between the transport's isochronous byte stream and per-channel PCM
//! samples, synthesizes loopback test tones, turns samples into one-bit
//! pulse-density outputs, and drives a logarithmic level meter, all paced
//! from a single master clock.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Config | [`config`] / [`error`] | Validated stream parameters, `ConfigError` |
//! | Timing | [`clock`] | Master-clock division with a deviation limit |
//! | Trait | [`node`] | `SampleSource` / `SampleSink` ready/valid streams |
//! | I/O | [`io`] | Byte-stream framing, sample FIFOs |
//! | DSP | [`dsp`] / [`nodes`] | Wavetables, oscillator, delta-sigma DAC, level meter |
//! | Transport | [`feedback`] | Asynchronous feedback word |
//! | Top | [`pipeline`] | All of the above on one tick |
//! | Board | [`pins`] | `embedded-hal` output pins (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use uac2_audio::config::StreamConfig;
//! use uac2_audio::dsp::wavetable::{Waveform, GAIN_MINUS_2DB};
//! use uac2_audio::pipeline::{Pipeline, PipelineConfig};
//!
//! let stream = StreamConfig::new(48_000.0, 24, 2)?;
//! let table = Waveform::<256>::cosine(stream.bit_depth(), GAIN_MINUS_2DB, true)?;
//! let mut pipeline = Pipeline::new(&PipelineConfig::new(stream), &table)?;
//!
//! // Once per master clock tick:
//! let out = pipeline.tick(rx_byte, tx_ready);
//! if out.framing_error {
//!     // host cut a subslot short; already recovered
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `pins` | yes | [`pins`] output drivers (requires `embedded-hal`) |
//!
//! ## Stream parameters
//!
//! - **Bit depth:** 8, 16, 24 (in 4-byte subslots) or 32
//! - **Channels:** const generic, 2 in the default design ([`constants::CHANNELS`])
//! - **Packet limit:** 1024 bytes per microframe ([`constants::MAX_PACKET_SIZE`])
//! - **FIFO depth:** 16 samples ([`constants::FIFO_DEPTH`])

#![no_std]

pub mod clock;
pub mod config;
pub mod constants;
pub mod dsp;
pub mod error;
pub mod feedback;
pub mod io;
pub mod node;
pub mod nodes;
pub mod pipeline;

#[cfg(feature = "pins")]
pub mod pins;
