use crate::error::Error;
use crate::registry::Stats;
use crate::ring_buffer::RingBuffer;
use crate::sources::ByteSource;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Producer task copying a [`ByteSource`] into one hosted ring buffer.
pub struct Feeder {
    id: String,
    buffer: Arc<Mutex<RingBuffer>>,
    source: Arc<dyn ByteSource>,
    chunk_size: usize,
    poll: Duration,
    stats: Arc<Stats>,
}

impl Feeder {
    pub fn new(
        id: String,
        buffer: Arc<Mutex<RingBuffer>>,
        source: Arc<dyn ByteSource>,
        chunk_size: usize,
        poll_ms: u64,
        stats: Arc<Stats>,
    ) -> Self {
        Self {
            id,
            buffer,
            source,
            chunk_size: chunk_size.max(1),
            poll: Duration::from_millis(poll_ms),
            stats,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Runs until the source is exhausted and everything read from it has been
    /// written. Returns the number of bytes fed into the buffer.
    pub async fn run(self) -> Result<u64, Error> {
        let mut pending: Vec<u8> = Vec::new();
        let mut offset = 0usize;
        let mut fed = 0u64;

        loop {
            if offset == pending.len() {
                pending = self.source.read_chunk(self.chunk_size).await?;
                offset = 0;
                if pending.is_empty() {
                    info!("Feed for buffer '{}' exhausted after {} bytes", self.id, fed);
                    return Ok(fed);
                }
            }

            // Short writes keep the remainder for the next round
            let n = self.buffer.lock().await.write(&pending[offset..]);
            offset += n;
            fed += n as u64;
            self.stats.record_written(n);

            if n == 0 {
                debug!("Buffer '{}' full, backing off", self.id);
                sleep(self.poll).await;
            }
        }
    }
}
