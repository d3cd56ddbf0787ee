//! Fixed-capacity ring buffers for bytes, plus a D-Bus service hosting them.
//!
//! [`RingBuffer`] is the core: a non-blocking FIFO byte pipe that clamps
//! oversized transfers and reports the actual count. It is not thread-safe;
//! the [`registry`] wraps each hosted buffer in its own lock.

pub mod config;
pub mod error;
pub mod feed;
pub mod registry;
pub mod ring_buffer;
pub mod service;
pub mod sources;

pub use error::Error;
pub use ring_buffer::RingBuffer;
