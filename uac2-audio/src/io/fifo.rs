//! Synchronous first-in-first-out sample queue.
//!
//! Both ends live in the same clock domain, so unlike a cross-domain ring
//! buffer there is no atomic hand-off: the owner writes and reads from the
//! same tick loop.
//!
//! Overflow and underflow behave like a buffered hardware FIFO:
//!
//! - a write to a full queue is rejected and the sample handed back;
//! - the read port ([`r_data()`](SyncFifo::r_data)) shows the head entry, or
//!   keeps showing the last sample read while the queue is empty.

use crate::node::{Sample, SampleSink};

/// Fixed-capacity FIFO holding up to `DEPTH` samples.
pub struct SyncFifo<const DEPTH: usize> {
    buffer: [Sample; DEPTH],
    /// Index of the oldest entry.
    head: usize,
    len: usize,
    /// Sample on the read port while empty.
    last: Sample,
}

impl<const DEPTH: usize> SyncFifo<DEPTH> {
    /// Create an empty queue. The read port starts at 0.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `DEPTH` must be at least 1.
    pub const fn new() -> Self {
        assert!(DEPTH >= 1, "FIFO must hold at least one entry");

        SyncFifo {
            buffer: [0; DEPTH],
            head: 0,
            len: 0,
            last: 0,
        }
    }

    /// Append a sample.
    ///
    /// Returns `Err(sample)` if the queue is full, returning it to the caller.
    pub fn write(&mut self, sample: Sample) -> Result<(), Sample> {
        if self.is_full() {
            return Err(sample);
        }
        let tail = (self.head + self.len) % DEPTH;
        self.buffer[tail] = sample;
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest sample, or `None` if empty.
    pub fn read(&mut self) -> Option<Sample> {
        if self.is_empty() {
            return None;
        }
        let sample = self.buffer[self.head];
        self.head = (self.head + 1) % DEPTH;
        self.len -= 1;
        self.last = sample;
        Some(sample)
    }

    /// Pop the oldest sample, or repeat the last one read if empty.
    pub fn read_or_hold(&mut self) -> Sample {
        self.read().unwrap_or(self.last)
    }

    /// The sample on the read port: the head entry, or the last sample read.
    pub fn r_data(&self) -> Sample {
        if self.is_empty() {
            self.last
        } else {
            self.buffer[self.head]
        }
    }

    /// Read port has data.
    pub fn r_rdy(&self) -> bool {
        !self.is_empty()
    }

    /// Write port has room.
    pub fn w_rdy(&self) -> bool {
        !self.is_full()
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn is_full(&self) -> bool {
        self.len == DEPTH
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn capacity(&self) -> usize {
        DEPTH
    }
}

impl<const DEPTH: usize> Default for SyncFifo<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> SampleSink for SyncFifo<DEPTH> {
    fn ready(&self) -> bool {
        self.w_rdy()
    }

    fn push(&mut self, sample: Sample) -> bool {
        self.write(sample).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Usable in statics and other const contexts
    static EMPTY: SyncFifo<16> = SyncFifo::new();

    #[test]
    fn const_constructible() {
        assert!(EMPTY.is_empty());
        assert_eq!(EMPTY.r_data(), 0);
    }

    #[test]
    fn write_and_read() {
        let mut q: SyncFifo<3> = SyncFifo::new();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);

        q.write(0x00_1234).unwrap();
        assert_eq!(q.len(), 1);
        assert!(q.r_rdy());

        q.write(0x80_0000).unwrap();
        q.write(0x7F_FFFF).unwrap();
        assert_eq!(q.len(), 3);
        assert!(q.is_full());
        assert!(!q.w_rdy());

        // Full: write is rejected and the sample returned
        assert_eq!(q.write(0xFF_FFFF), Err(0xFF_FFFF));

        assert_eq!(q.read(), Some(0x00_1234));
        assert_eq!(q.read(), Some(0x80_0000));
        assert_eq!(q.read(), Some(0x7F_FFFF));
        assert_eq!(q.read(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn read_port_shows_head() {
        let mut q: SyncFifo<4> = SyncFifo::new();
        q.write(7).unwrap();
        q.write(8).unwrap();
        assert_eq!(q.r_data(), 7);
        // Peeking does not consume
        assert_eq!(q.r_data(), 7);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn read_port_holds_last_value_when_empty() {
        let mut q: SyncFifo<4> = SyncFifo::new();
        assert_eq!(q.r_data(), 0);

        q.write(0xABCD).unwrap();
        assert_eq!(q.read(), Some(0xABCD));
        assert!(q.is_empty());
        assert_eq!(q.r_data(), 0xABCD);
        assert_eq!(q.read(), None);
        assert_eq!(q.r_data(), 0xABCD);
    }

    #[test]
    fn read_or_hold_pops_then_repeats() {
        let mut q: SyncFifo<4> = SyncFifo::new();
        q.write(0x7F_FFFF).unwrap();
        q.write(0).unwrap();
        q.write(0x80_0001).unwrap();

        assert_eq!(q.read_or_hold(), 0x7F_FFFF);
        assert_eq!(q.read_or_hold(), 0);
        assert_eq!(q.read_or_hold(), 0x80_0001);
        assert_eq!(q.read_or_hold(), 0x80_0001);
        assert!(q.is_empty());
    }

    #[test]
    fn stereo_frames_survive_index_wrap() {
        // Two-deep queue carrying left/right pairs: the indices wrap on
        // every frame
        let mut q: SyncFifo<2> = SyncFifo::new();
        for frame in 0..10u32 {
            let left = frame << 16;
            let right = (frame << 16) | 0xFFFF;
            q.write(left).unwrap();
            q.write(right).unwrap();
            assert!(q.is_full());

            assert_eq!(q.read(), Some(left));
            assert_eq!(q.read(), Some(right));
            assert!(q.is_empty());
        }
    }

    #[test]
    fn producer_ahead_of_sample_clock() {
        // Producer bursts three samples per drain of one until the queue
        // fills; order is preserved and the overflow handed back
        let mut q: SyncFifo<4> = SyncFifo::new();
        let mut next = 0u32;
        let mut drained = 0u32;
        let mut rejected = 0;
        for _ in 0..4 {
            for _ in 0..3 {
                match q.write(next) {
                    Ok(()) => next += 1,
                    Err(s) => {
                        assert_eq!(s, next);
                        rejected += 1;
                    }
                }
            }
            assert_eq!(q.read(), Some(drained));
            drained += 1;
        }
        assert!(rejected > 0);
        while let Some(s) = q.read() {
            assert_eq!(s, drained);
            drained += 1;
        }
        assert_eq!(drained, next);
    }

    #[test]
    fn sixteen_deep_sample_queue() {
        let mut q: SyncFifo<16> = SyncFifo::new();
        assert_eq!(q.capacity(), 16);
        for i in 0..16 {
            assert!(q.ready());
            assert!(q.push(i));
        }
        assert!(!q.ready());
        assert!(!q.push(99));
        assert_eq!(q.len(), 16);
        assert_eq!(q.read(), Some(0));
    }
}
