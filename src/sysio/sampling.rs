//! Continuous sampling engine
//!
//! The native acquisition unit free-runs into four rotating raw buffers.
//! Producer and consumer meet only through two single-byte indices: the
//! completion handler advances the producer index (the sole writer of it)
//! and the periodic poll advances the consumer index. No lock is needed;
//! the Release store in [`SamplingEngine::advance`] paired with the Acquire
//! load in [`SamplingEngine::poll`] publishes the buffer contents.
//!
//! Samples arrive interleaved highest-line-first: sample `i` in a buffer
//! belongs to physical line `lines - 1 - (i % lines)`.

use core::sync::atomic::{AtomicU8, Ordering};

/// Samples accumulated per line per buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleDepth {
    /// 32 samples per line, 8 interleaved lines
    X32,
    /// 64 samples per line, 4 interleaved lines
    X64,
}

impl SampleDepth {
    /// Interleaved physical lines per buffer
    pub fn lines(self) -> u8 {
        match self {
            SampleDepth::X32 => 8,
            SampleDepth::X64 => 4,
        }
    }

    /// Shift that divides a per-line sum down to an average
    fn shift(self) -> u32 {
        match self {
            SampleDepth::X32 => 5,
            SampleDepth::X64 => 6,
        }
    }
}

/// Raw samples per rotating buffer
pub const BUFFER_LEN: usize = 256;

/// Number of rotating buffers
pub const BUFFER_COUNT: usize = 4;

/// Maximum interleaved lines
const MAX_LINES: usize = 8;

/// Rotating-buffer sampling engine with smoothed per-line values
pub struct SamplingEngine {
    buffers: [[u16; BUFFER_LEN]; BUFFER_COUNT],
    /// Index of the most recently completed buffer; written only by the
    /// acquisition-completion context
    producer: AtomicU8,
    /// Index of the last buffer folded into the line values; written only
    /// by `poll`
    consumer: u8,
    depth: SampleDepth,
    line_values: [u16; MAX_LINES],
}

impl SamplingEngine {
    pub fn new(depth: SampleDepth) -> Self {
        Self {
            buffers: [[0; BUFFER_LEN]; BUFFER_COUNT],
            producer: AtomicU8::new(0),
            consumer: 0,
            depth,
            line_values: [0; MAX_LINES],
        }
    }

    /// Publish the next completed buffer and return the slot the hardware
    /// should fill after it
    ///
    /// This is the only work permitted in the acquisition-completion
    /// context: one wrapping increment and one atomic store. Exactly one
    /// call per completion event; a missed or doubled call corrupts the
    /// channel interleaving.
    pub fn advance(&self) -> usize {
        let next = (self.producer.load(Ordering::Relaxed) + 1) % BUFFER_COUNT as u8;
        self.producer.store(next, Ordering::Release);
        (next as usize + 1) % BUFFER_COUNT
    }

    /// Fill the next buffer slot and publish it
    ///
    /// Completion path for sources that deliver whole buffers through
    /// ordinary control flow (platform glue, host tests).
    pub fn complete(&mut self, samples: &[u16; BUFFER_LEN]) {
        let slot = (self.producer.load(Ordering::Relaxed) as usize + 1) % BUFFER_COUNT;
        self.buffers[slot] = *samples;
        self.producer.store(slot as u8, Ordering::Release);
    }

    /// Fold the most recently completed buffer into the smoothed line values
    ///
    /// Returns `true` if new data was folded in. Equal indices mean no new
    /// buffer has completed since the last call; that is a quiet no-op, so
    /// calling twice without a new completion leaves the values unchanged.
    pub fn poll(&mut self) -> bool {
        let producer = self.producer.load(Ordering::Acquire);
        if producer == self.consumer {
            return false;
        }

        let lines = self.depth.lines() as usize;
        let buffer = &self.buffers[producer as usize];
        let mut sums = [0u32; MAX_LINES];
        for (i, &sample) in buffer.iter().enumerate() {
            sums[lines - 1 - (i % lines)] += u32::from(sample);
        }
        for line in 0..lines {
            let avg = sums[line] >> self.depth.shift();
            self.line_values[line] = ((u32::from(self.line_values[line]) + avg) >> 1) as u16;
        }

        self.consumer = producer;
        true
    }

    /// Smoothed value of one physical line; unassigned lines read zero
    pub fn line_value(&self, line: usize) -> u16 {
        self.line_values.get(line).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interleaved(lines: usize, per_line: impl Fn(usize) -> u16) -> [u16; BUFFER_LEN] {
        let mut buf = [0u16; BUFFER_LEN];
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = per_line(lines - 1 - (i % lines));
        }
        buf
    }

    #[test]
    fn test_poll_without_new_data_is_noop() {
        let mut engine = SamplingEngine::new(SampleDepth::X64);
        assert!(!engine.poll());
        assert_eq!(engine.line_value(0), 0);
    }

    #[test]
    fn test_poll_averages_interleaved_lines() {
        let mut engine = SamplingEngine::new(SampleDepth::X64);
        // Line n carries a constant 100 * n
        engine.complete(&interleaved(4, |line| 100 * line as u16));
        assert!(engine.poll());
        // First poll blends each average with the zero initial value
        for line in 0..4 {
            assert_eq!(engine.line_value(line), 50 * line as u16);
        }
    }

    #[test]
    fn test_poll_is_idempotent_until_next_completion() {
        let mut engine = SamplingEngine::new(SampleDepth::X32);
        engine.complete(&interleaved(8, |_| 400));
        assert!(engine.poll());
        let snapshot: Vec<u16> = (0..8).map(|l| engine.line_value(l)).collect();

        assert!(!engine.poll());
        let again: Vec<u16> = (0..8).map(|l| engine.line_value(l)).collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn test_smoothing_converges_toward_steady_input() {
        let mut engine = SamplingEngine::new(SampleDepth::X64);
        for _ in 0..16 {
            engine.complete(&interleaved(4, |_| 1000));
            assert!(engine.poll());
        }
        assert_eq!(engine.line_value(0), 999);
    }

    #[test]
    fn test_advance_rotates_modulo_buffer_count() {
        let engine = SamplingEngine::new(SampleDepth::X32);
        // Next fill slot always trails the published buffer by one
        assert_eq!(engine.advance(), 2);
        assert_eq!(engine.advance(), 3);
        assert_eq!(engine.advance(), 0);
        assert_eq!(engine.advance(), 1);
        assert_eq!(engine.advance(), 2);
    }

    #[test]
    fn test_producer_wraparound_still_detected() {
        let mut engine = SamplingEngine::new(SampleDepth::X64);
        // Four completions wrap the producer back to its starting index
        // mid-sequence; each one must still be observable
        for round in 1..=8 {
            engine.complete(&interleaved(4, |_| round as u16));
            assert!(engine.poll(), "completion {} not observed", round);
        }
    }
}
