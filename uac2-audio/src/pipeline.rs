//! The core signal path, wired together.
//!
//! ```text
//!                     ┌──────────────────┐   ┌───────────────┐
//!  host bytes ──────► │ StreamToSamples  ├─► │ DeltaSigmaDac ├──► DAC pins
//!                     └────────┬─────────┘   └───────────────┘
//!                              │ channel 0   ┌───────────────┐
//!                              └───────────► │  LevelMeter   ├──► LED bar
//!                                            └───────────────┘
//!                     ┌──────────────────┐   ┌───────────────┐
//!  host bytes ◄────── │ SamplesToStream  │ ◄─┤  Nco × C      │
//!                     └──────────────────┘   └───────────────┘
//! ```
//!
//! Everything runs from one master tick. [`Pipeline::tick`] is the whole
//! per-tick schedule: take at most one byte from the host, offer one byte
//! back, step the DAC and the meter. Nothing inside blocks or allocates.

use crate::config::StreamConfig;
use crate::constants::{DEFAULT_MASTER_HZ, DEFAULT_SEGMENTS, DEFAULT_TONES};
use crate::dsp::Waveform;
use crate::error::ConfigError;
use crate::feedback::Feedback;
use crate::io::{Emitted, Packet, SamplesToStream, StreamToSamples};
use crate::nodes::{DeltaSigmaDac, LevelMeter, Nco};

/// Everything needed to build a [`Pipeline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig<const C: usize> {
    pub stream: StreamConfig,
    /// Master tick rate in Hz.
    pub master_hz: f64,
    /// Level meter segments.
    pub segments: usize,
    /// Host samples are two's complement.
    pub signed: bool,
    /// Oscillator frequency of each loopback channel, in Hz.
    pub tones: [f64; C],
}

impl<const C: usize> PipelineConfig<C> {
    /// 60 MHz master clock, six meter segments, signed samples, and the
    /// default test tones.
    pub fn new(stream: StreamConfig) -> Self {
        PipelineConfig {
            stream,
            master_hz: DEFAULT_MASTER_HZ,
            segments: DEFAULT_SEGMENTS,
            signed: true,
            tones: core::array::from_fn(|i| DEFAULT_TONES[i % DEFAULT_TONES.len()]),
        }
    }
}

/// What the pipeline drives on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineTick<const C: usize> {
    /// Byte on offer to the host (taken if the host was ready).
    pub to_host: u8,
    /// Sample completed from the host stream this tick.
    pub received: Option<Emitted>,
    /// One-bit DAC output per channel.
    pub dac: [bool; C],
    /// All DAC channels adopted new samples this tick.
    pub latch: bool,
    /// Level meter bitmap.
    pub leds: u32,
    /// A framing violation was detected and recovered this tick.
    pub framing_error: bool,
}

/// The complete signal path for `C` channels, with oscillators reading an
/// `N`-entry table.
///
/// # Example
/// ```ignore
/// let stream = StreamConfig::new(48_000.0, 24, 2)?;
/// let table = Waveform::<256>::cosine(stream.bit_depth(), GAIN_MINUS_2DB, true)?;
/// let mut pipeline = Pipeline::new(&PipelineConfig::new(stream), &table)?;
///
/// loop {
///     let out = pipeline.tick(usb.rx_byte(), usb.tx_ready());
///     dac_pins.write(&out.dac)?;
///     leds.write(out.leds)?;
/// }
/// ```
pub struct Pipeline<'t, const N: usize, const C: usize> {
    demux: StreamToSamples<C>,
    mux: SamplesToStream<C>,
    oscillators: [Nco<'t, N>; C],
    dac: DeltaSigmaDac<C>,
    meter: LevelMeter,
    feedback: Feedback,
    sample_rate: f64,
}

impl<'t, const N: usize, const C: usize> Pipeline<'t, N, C> {
    pub fn new(config: &PipelineConfig<C>, table: &'t Waveform<N>) -> Result<Self, ConfigError> {
        let stream = &config.stream;
        if table.bit_depth() != stream.bit_depth() {
            return Err(ConfigError::TableDepth {
                table: table.bit_depth().bits(),
                stream: stream.bit_depth().bits(),
            });
        }

        let demux = StreamToSamples::new(stream)?;
        let mux = SamplesToStream::new(stream)?;
        let dac = DeltaSigmaDac::new(stream, config.master_hz, config.signed)?;
        let meter = LevelMeter::new(stream, config.master_hz, config.segments)?;
        let feedback = Feedback::new(stream);

        let sample_rate = stream.sample_rate();
        let oscillators = core::array::from_fn(|i| {
            let mut nco = Nco::new(table);
            nco.set_frequency(config.tones[i], sample_rate);
            nco
        });

        tracing::info!(
            channels = C,
            table_length = N,
            master_hz = config.master_hz,
            max_packet_size = stream.max_packet_size(),
            "pipeline ready"
        );

        Ok(Pipeline {
            demux,
            mux,
            oscillators,
            dac,
            meter,
            feedback,
            sample_rate,
        })
    }

    /// Advance one master tick.
    ///
    /// `from_host` is the byte the transport presents this tick, if any.
    /// `to_host_ready` says whether the transport takes the byte on offer.
    pub fn tick(&mut self, from_host: Option<Packet>, to_host_ready: bool) -> PipelineTick<C> {
        let to_host = if to_host_ready {
            self.mux.transfer(&mut self.oscillators)
        } else {
            self.mux.byte(&self.oscillators)
        };

        let received = self.demux.feed(from_host, self.dac.inputs_mut());
        if let Some(Emitted { channel: 0, sample }) = received {
            self.meter.push(sample);
        }

        let dac = self.dac.tick();
        self.meter.tick();

        PipelineTick {
            to_host,
            received,
            dac,
            latch: self.dac.latch(),
            leds: self.meter.leds(),
            framing_error: self.demux.error(),
        }
    }

    /// Retune the loopback oscillator of `channel`.
    pub fn set_tone(&mut self, channel: usize, hz: f64) {
        self.oscillators[channel].set_frequency(hz, self.sample_rate);
    }

    pub fn oscillator_mut(&mut self, channel: usize) -> &mut Nco<'t, N> {
        &mut self.oscillators[channel]
    }

    /// Byte `address` of the feedback word.
    pub fn feedback_byte(&self, address: usize) -> u8 {
        self.feedback.byte(address)
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn demux(&self) -> &StreamToSamples<C> {
        &self.demux
    }

    pub fn dac(&self) -> &DeltaSigmaDac<C> {
        &self.dac
    }

    pub fn meter(&self) -> &LevelMeter {
        &self.meter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BitDepth;
    use crate::dsp::helpers::to_offset_binary;

    fn stream() -> StreamConfig {
        StreamConfig::new(48_000.0, 24, 2).unwrap()
    }

    fn table() -> Waveform<256> {
        Waveform::cosine(BitDepth::TwentyFour, 1.0, true).unwrap()
    }

    /// One 24-bit stereo frame as it appears on the wire.
    fn frame(left: u32, right: u32) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&(left << 8).to_le_bytes());
        bytes[4..].copy_from_slice(&(right << 8).to_le_bytes());
        bytes
    }

    #[test]
    fn default_config() {
        let config = PipelineConfig::<2>::new(stream());
        assert_eq!(config.master_hz, 60e6);
        assert_eq!(config.segments, 6);
        assert!(config.signed);
        assert_eq!(config.tones, [1_000.0, 10_000.0]);
    }

    #[test]
    fn oscillators_start_at_configured_tones() {
        let t = table();
        let mut pipeline = Pipeline::new(&PipelineConfig::<2>::new(stream()), &t).unwrap();
        assert_eq!(pipeline.oscillator_mut(0).phase_increment(), 89_478_485);
        assert_eq!(pipeline.oscillator_mut(1).phase_increment(), 894_784_853);

        pipeline.set_tone(1, 12_000.0);
        assert_eq!(pipeline.oscillator_mut(1).phase_increment(), 1 << 30);
    }

    #[test]
    fn rejects_table_of_other_depth() {
        let t = Waveform::<64>::cosine(BitDepth::Sixteen, 1.0, true).unwrap();
        assert_eq!(
            Pipeline::new(&PipelineConfig::<2>::new(stream()), &t).err(),
            Some(ConfigError::TableDepth {
                table: 16,
                stream: 24
            })
        );
    }

    #[test]
    fn rejects_channel_mismatch() {
        let t = table();
        let mono = StreamConfig::new(48_000.0, 24, 1).unwrap();
        assert!(matches!(
            Pipeline::<256, 2>::new(&PipelineConfig::new(mono), &t),
            Err(ConfigError::ChannelCount { .. })
        ));
    }

    #[test]
    fn feedback_is_exposed_per_byte() {
        let t = table();
        let pipeline = Pipeline::new(&PipelineConfig::<2>::new(stream()), &t).unwrap();
        assert_eq!(pipeline.feedback().value(), 0x000C_0000);
        assert_eq!(pipeline.feedback_byte(2), 0x0C);
        assert_eq!(pipeline.feedback_byte(7), 0);
    }

    #[test]
    fn host_samples_reach_dac_and_meter() {
        let t = table();
        let mut pipeline = Pipeline::new(&PipelineConfig::<2>::new(stream()), &t).unwrap();
        let bytes = frame(0x7F_FFFF, 0x80_0001);

        let mut received = [None; 8];
        for (i, &b) in bytes.iter().enumerate() {
            received[i] = pipeline.tick(Some(Packet::new(b, i == 0)), false).received;
        }
        assert_eq!(received[3], Some(Emitted { channel: 0, sample: 0x7F_FFFF }));
        assert_eq!(received[7], Some(Emitted { channel: 1, sample: 0x80_0001 }));

        let mut latched = None;
        let mut leds = 0;
        for _ in 8..1300 {
            let out = pipeline.tick(None, false);
            if out.latch {
                latched = Some([pipeline.dac().channel(0).held(), pipeline.dac().channel(1).held()]);
            }
            leds = out.leds;
        }

        let d = BitDepth::TwentyFour;
        assert_eq!(
            latched,
            Some([to_offset_binary(0x7F_FFFF, d), to_offset_binary(0x80_0001, d)])
        );
        assert_eq!(pipeline.meter().level(), 0x7F_FFFF);
        assert_eq!(leds, 0b11_1111);
    }

    #[test]
    fn framing_violation_is_flagged_for_one_tick() {
        let t = table();
        let mut pipeline = Pipeline::new(&PipelineConfig::<2>::new(stream()), &t).unwrap();

        // A subslot cut short after two bytes, then a new packet
        let bytes = [(0x00, true), (0x11, false), (0x00, true), (0x01, false), (0x02, false), (0x03, false)];
        let mut errors = [false; 6];
        let mut last = None;
        for (i, &(data, first)) in bytes.iter().enumerate() {
            let out = pipeline.tick(Some(Packet::new(data, first)), false);
            errors[i] = out.framing_error;
            if out.received.is_some() {
                last = out.received;
            }
        }

        assert_eq!(errors, [false, false, true, false, false, false]);
        assert_eq!(last, Some(Emitted { channel: 0, sample: 0x03_0201 }));
        assert_eq!(pipeline.demux().violations(), 1);
    }

    #[test]
    fn loopback_stream_carries_oscillator_samples() {
        let t = table();
        let mut pipeline = Pipeline::new(&PipelineConfig::<2>::new(stream()), &t).unwrap();

        let mut reference = [Nco::new(&t), Nco::new(&t)];
        reference[0].set_frequency(1_000.0, 48_000.0);
        reference[1].set_frequency(10_000.0, 48_000.0);

        let mut decoder = StreamToSamples::<2>::new(&stream()).unwrap();
        let mut decoded = 0;
        for i in 0..8 * 32 {
            let byte = pipeline.tick(None, true).to_host;
            if let Some(e) = decoder.receive(Packet::new(byte, i == 0)) {
                let nco = &mut reference[e.channel];
                assert_eq!(e.sample, nco.sample(), "sample {} on channel {}", decoded, e.channel);
                nco.advance();
                decoded += 1;
            }
        }
        assert_eq!(decoded, 64);
    }

    #[test]
    fn oscillators_hold_while_host_is_not_reading() {
        let t = table();
        let mut pipeline = Pipeline::new(&PipelineConfig::<2>::new(stream()), &t).unwrap();

        let first = pipeline.tick(None, false).to_host;
        for _ in 0..100 {
            assert_eq!(pipeline.tick(None, false).to_host, first);
        }
        assert_eq!(pipeline.oscillator_mut(0).phase(), 0);
    }
}
