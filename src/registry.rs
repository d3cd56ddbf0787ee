use crate::config::FlattenedConfig;
use crate::error::Error;
use crate::feed::Feeder;
use crate::ring_buffer::RingBuffer;
use crate::sources::{ByteSource, FileSource};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Byte totals across every hosted buffer.
#[derive(Debug, Default)]
pub struct Stats {
    written: AtomicU64,
    read: AtomicU64,
}

impl Stats {
    pub fn record_written(&self, n: usize) {
        self.written.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_read(&self, n: usize) {
        self.read.fetch_add(n as u64, Ordering::Relaxed);
    }

    /// Returns (total bytes written, total bytes read).
    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.written.load(Ordering::Relaxed),
            self.read.load(Ordering::Relaxed),
        )
    }
}

/// Independent ring buffers addressed by id.
///
/// Every buffer sits behind its own lock; each call holds it for exactly one
/// buffer operation.
pub struct Registry {
    buffers: HashMap<String, Arc<Mutex<RingBuffer>>>,
    stats: Arc<Stats>,
}

impl Registry {
    /// Builds the registry and one [`Feeder`] per buffer with a feed configured.
    pub async fn from_config(cfg: FlattenedConfig) -> Result<(Self, Vec<Feeder>), Error> {
        let stats = Arc::new(Stats::default());
        let mut buffers = HashMap::new();
        let mut feeds = Vec::new();

        for b in cfg.buffers.into_iter() {
            let buffer = Arc::new(Mutex::new(RingBuffer::new(b.capacity)));
            log::debug!("Created ring buffer '{}' with {} bytes", b.id, b.capacity);
            if let Some(feed) = b.feed {
                feeds.push((b.id.clone(), buffer.clone(), feed));
            }
            buffers.insert(b.id, buffer);
        }

        let opened = join_all(feeds.iter().map(|(_, _, feed)| FileSource::new(feed))).await;

        let mut feeders = Vec::with_capacity(feeds.len());
        for ((id, buffer, feed), src) in feeds.into_iter().zip(opened) {
            let src = src.map_err(|e| {
                log::error!("Failed to open feed {} for buffer '{}': {}", feed.path, id, e);
                Error::from(e)
            })?;
            let src: Arc<dyn ByteSource> = Arc::new(src);
            feeders.push(Feeder::new(
                id,
                buffer,
                src,
                feed.chunk_size(),
                feed.poll_ms(),
                stats.clone(),
            ));
        }

        Ok((Self { buffers, stats }, feeders))
    }

    fn get(&self, id: &str) -> Result<&Arc<Mutex<RingBuffer>>, Error> {
        self.buffers
            .get(id)
            .ok_or_else(|| Error::UnknownBuffer(id.to_string()))
    }

    /// Returns the number of bytes accepted, possibly fewer than `data.len()`.
    pub async fn write(&self, id: &str, data: &[u8]) -> Result<usize, Error> {
        let n = self.get(id)?.lock().await.write(data);
        self.stats.record_written(n);
        Ok(n)
    }

    /// Returns up to `length` bytes; the result is never larger than what the
    /// buffer holds.
    pub async fn read(&self, id: &str, length: usize) -> Result<Vec<u8>, Error> {
        let mut buffer = self.get(id)?.lock().await;
        let mut out = vec![0u8; length.min(buffer.read_bytes_available())];
        let n = buffer.read(&mut out);
        drop(buffer);

        out.truncate(n);
        self.stats.record_read(n);
        Ok(out)
    }

    pub async fn is_full(&self, id: &str) -> Result<bool, Error> {
        Ok(self.get(id)?.lock().await.is_full())
    }

    pub async fn is_empty(&self, id: &str) -> Result<bool, Error> {
        Ok(self.get(id)?.lock().await.is_empty())
    }

    pub async fn write_bytes_available(&self, id: &str) -> Result<usize, Error> {
        Ok(self.get(id)?.lock().await.write_bytes_available())
    }

    pub async fn read_bytes_available(&self, id: &str) -> Result<usize, Error> {
        Ok(self.get(id)?.lock().await.read_bytes_available())
    }

    pub async fn capacity(&self, id: &str) -> Result<usize, Error> {
        Ok(self.get(id)?.lock().await.capacity())
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.buffers.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn get_stats(&self) -> (u64, u64) {
        self.stats.snapshot()
    }
}
