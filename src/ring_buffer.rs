//! Fixed-capacity circular byte buffer.
//!
//! `RingBuffer` is a FIFO byte pipe with a capacity set once at construction.
//! Writes and reads never block and never fail: a request larger than what the
//! buffer can currently accept (or hand out) is clamped, and the returned count
//! is the only signal of a short transfer. Callers loop with the remainder.
//!
//! # Concurrency
//!
//! The buffer has **no internal synchronization**. Sharing one instance between
//! threads or tasks requires an external lock chosen by the caller, e.g.
//! `Arc<Mutex<RingBuffer>>`. No reference into the storage ever escapes, so
//! holding the lock for the duration of a single call is sufficient.

use std::fmt;
use std::io;

pub struct RingBuffer {
    buffer: Box<[u8]>,
    write_available: usize,
    read_available: usize,
    write_index: usize,
    read_index: usize,
}

impl RingBuffer {
    /// Creates an empty buffer holding exactly `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            write_available: capacity,
            read_available: 0,
            write_index: 0,
            read_index: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if there is no space left for writing.
    pub fn is_full(&self) -> bool {
        self.write_available == 0
    }

    /// Returns true if there is no data left for reading.
    pub fn is_empty(&self) -> bool {
        self.read_available == 0
    }

    pub fn write_bytes_available(&self) -> usize {
        self.write_available
    }

    pub fn read_bytes_available(&self) -> usize {
        self.read_available
    }

    /// Copies bytes from `source` into the buffer.
    ///
    /// Returns the number of bytes actually written, which is less than
    /// `source.len()` when there is not enough free space.
    pub fn write(&mut self, source: &[u8]) -> usize {
        if self.is_full() || source.is_empty() {
            return 0;
        }

        let length = source.len().min(self.write_available);
        let capacity = self.capacity();
        let remaining = capacity - self.write_index;

        if length > remaining {
            // Wrap-around: fill the tail, then continue from the start
            self.buffer[self.write_index..].copy_from_slice(&source[..remaining]);
            self.buffer[..length - remaining].copy_from_slice(&source[remaining..length]);
        } else {
            self.buffer[self.write_index..self.write_index + length]
                .copy_from_slice(&source[..length]);
        }

        self.write_index = (self.write_index + length) % capacity;
        self.write_available -= length;
        self.read_available += length;

        length
    }

    /// Copies bytes out of the buffer into `dest`.
    ///
    /// Returns the number of bytes actually read, which is less than
    /// `dest.len()` when the buffer holds fewer bytes.
    pub fn read(&mut self, dest: &mut [u8]) -> usize {
        if self.is_empty() || dest.is_empty() {
            return 0;
        }

        let length = dest.len().min(self.read_available);
        let capacity = self.capacity();
        let remaining = capacity - self.read_index;

        if length > remaining {
            // Wrap-around: drain the tail, then continue from the start
            dest[..remaining].copy_from_slice(&self.buffer[self.read_index..]);
            dest[remaining..length].copy_from_slice(&self.buffer[..length - remaining]);
        } else {
            dest[..length]
                .copy_from_slice(&self.buffer[self.read_index..self.read_index + length]);
        }

        self.read_index = (self.read_index + length) % capacity;
        self.write_available += length;
        self.read_available -= length;

        length
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("write_available", &self.write_available)
            .field("read_available", &self.read_available)
            .field("write_index", &self.write_index)
            .field("read_index", &self.read_index)
            .finish()
    }
}

/// `Ok(0)` means the buffer is full, so `write_all` surfaces it as `WriteZero`.
impl io::Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `Ok(0)` means the buffer is currently empty.
impl io::Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(RingBuffer::read(self, buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_conserved(buf: &RingBuffer) {
        assert_eq!(
            buf.write_bytes_available() + buf.read_bytes_available(),
            buf.capacity()
        );
    }

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = RingBuffer::new(16);
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.write_bytes_available(), 16);
        assert_eq!(buf.read_bytes_available(), 0);
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = RingBuffer::new(0);
    }

    #[test]
    fn test_basic_operations() {
        let mut buf = RingBuffer::new(10);

        assert_eq!(buf.write(b"hello"), 5);
        assert_eq!(buf.read_bytes_available(), 5);
        assert_eq!(buf.write_bytes_available(), 5);

        let mut out = [0u8; 3];
        assert_eq!(buf.read(&mut out), 3);
        assert_eq!(&out, b"hel");

        let mut out = [0u8; 5];
        assert_eq!(buf.read(&mut out), 2);
        assert_eq!(&out[..2], b"lo");
        assert!(buf.is_empty());
        assert_conserved(&buf);
    }

    #[test]
    fn test_wraparound() {
        let mut buf = RingBuffer::new(5);

        assert_eq!(buf.write(b"12345"), 5);
        assert!(buf.is_full());

        let mut out = [0u8; 2];
        assert_eq!(buf.read(&mut out), 2);
        assert_eq!(&out, b"12");

        // Wraps to the start of storage
        assert_eq!(buf.write(b"ab"), 2);
        assert!(buf.is_full());

        let mut out = [0u8; 10];
        assert_eq!(buf.read(&mut out), 5);
        assert_eq!(&out[..5], b"345ab");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_exact_fit_to_boundary() {
        let mut buf = RingBuffer::new(6);
        let mut out = [0u8; 6];

        buf.write(b"abc");
        buf.read(&mut out[..3]);

        // Exactly fills the tail, cursor wraps to 0 without a split copy
        assert_eq!(buf.write(b"def"), 3);
        assert_eq!(buf.write_index, 0);
        assert_eq!(buf.read(&mut out[..3]), 3);
        assert_eq!(&out[..3], b"def");
        assert_eq!(buf.read_index, 0);
    }

    #[test]
    fn test_write_clamps_to_available() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.write(b"abcdefgh"), 4);
        assert!(buf.is_full());

        let mut out = [0u8; 4];
        buf.read(&mut out);
        assert_eq!(&out, b"abcd");
    }

    #[test]
    fn test_full_and_empty_are_noops() {
        let mut buf = RingBuffer::new(3);
        let mut out = [0u8; 3];

        for _ in 0..3 {
            assert_eq!(buf.read(&mut out), 0);
        }
        assert_eq!(buf.read_index, 0);
        assert_eq!(buf.write_bytes_available(), 3);

        buf.write(b"xyz");
        for _ in 0..3 {
            assert_eq!(buf.write(b"more"), 0);
        }
        assert_eq!(buf.write_index, 0);
        assert_eq!(buf.read_bytes_available(), 3);

        buf.read(&mut out);
        assert_eq!(&out, b"xyz");
    }

    #[test]
    fn test_zero_length_is_noop() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.write(&[]), 0);
        assert_eq!(buf.read(&mut []), 0);
        assert!(buf.is_empty());

        buf.write(b"ab");
        assert_eq!(buf.write(&[]), 0);
        assert_eq!(buf.read(&mut []), 0);
        assert_eq!(buf.read_bytes_available(), 2);
        assert_eq!(buf.write_index, 2);
        assert_eq!(buf.read_index, 0);
    }

    #[test]
    fn test_io_traits() {
        use std::io::{Read, Write};

        let mut buf = RingBuffer::new(4);
        let err = buf.write_all(b"too long").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert!(buf.is_full());

        let mut out = Vec::new();
        // read_to_end stops at the first Ok(0)
        buf.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"too ");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_debug_omits_contents() {
        let mut buf = RingBuffer::new(8);
        buf.write(b"secret");
        let text = format!("{:?}", buf);
        assert!(text.contains("read_available: 6"));
        assert!(!text.contains("115"));
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    enum Op {
        Write(Vec<u8>),
        Read(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop::collection::vec(any::<u8>(), 0..40).prop_map(Op::Write),
            (0usize..40).prop_map(Op::Read),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_matches_fifo_model(
            capacity in 1usize..32,
            ops in prop::collection::vec(op_strategy(), 0..100)
        ) {
            let mut buf = RingBuffer::new(capacity);
            let mut model: VecDeque<u8> = VecDeque::new();

            for op in ops {
                match op {
                    Op::Write(data) => {
                        let expected = data.len().min(capacity - model.len());
                        let n = buf.write(&data);
                        prop_assert_eq!(n, expected);
                        model.extend(&data[..n]);
                    }
                    Op::Read(len) => {
                        let mut out = vec![0u8; len];
                        let n = buf.read(&mut out);
                        prop_assert_eq!(n, len.min(model.len()));
                        let want: Vec<u8> = model.drain(..n).collect();
                        prop_assert_eq!(&out[..n], &want[..]);
                    }
                }
                prop_assert_eq!(
                    buf.write_bytes_available() + buf.read_bytes_available(),
                    capacity
                );
                prop_assert_eq!(buf.read_bytes_available(), model.len());
                prop_assert!(buf.write_index < capacity);
                prop_assert!(buf.read_index < capacity);
                prop_assert_eq!(buf.is_full(), model.len() == capacity);
                prop_assert_eq!(buf.is_empty(), model.is_empty());
            }
        }

        #[test]
        fn prop_chunked_stream_round_trips(
            capacity in 1usize..16,
            data in prop::collection::vec(any::<u8>(), 0..200),
            chunk in 1usize..20
        ) {
            let mut buf = RingBuffer::new(capacity);
            let mut out = Vec::with_capacity(data.len());
            let mut scratch = vec![0u8; chunk];
            let mut pending = &data[..];

            while !pending.is_empty() || !buf.is_empty() {
                let end = chunk.min(pending.len());
                let n = buf.write(&pending[..end]);
                pending = &pending[n..];
                let m = buf.read(&mut scratch);
                out.extend_from_slice(&scratch[..m]);
            }
            prop_assert_eq!(out, data);
        }
    }
}
