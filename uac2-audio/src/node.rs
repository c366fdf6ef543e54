/// One sample as a right-aligned bit pattern, `bit_depth` bits wide.
///
/// Bits above the configured depth are always zero. Whether the pattern is
/// two's complement or unsigned is a property of the producer; see
/// [`dsp::helpers`](crate::dsp::helpers) for conversions.
pub type Sample = u32;

/// Producer side of a ready/valid sample stream.
///
/// The payload is always valid. A consumer reads [`payload()`](Self::payload)
/// as often as it likes and calls [`accept()`](Self::accept) exactly once per
/// sample it takes.
pub trait SampleSource {
    /// The sample currently on offer.
    fn payload(&self) -> Sample;

    /// The consumer took the current payload; move on to the next one.
    fn accept(&mut self);
}

/// Consumer side of a ready/valid sample stream.
pub trait SampleSink {
    /// Whether a sample pushed now would be taken.
    fn ready(&self) -> bool;

    /// Offer one sample. Returns `false` if it was not taken.
    fn push(&mut self, sample: Sample) -> bool;
}
