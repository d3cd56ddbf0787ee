use crate::error::Error;
use crate::registry::Registry;
use log::error;
use std::sync::Arc;
use zbus::interface;

pub const BUS_NAME: &str = "lv.lumii.ringbuf";
pub const OBJECT_PATH: &str = "/lv/lumii/ringbuf/Registry";

/// D-Bus front end for the hosted ring buffers.
pub struct RingBufferService(Arc<Registry>);

impl RingBufferService {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self(registry)
    }
}

/// Flattens a result into the (status, value) pair returned over the bus.
fn reply<T: Default>(op: &str, id: &str, res: Result<T, Error>) -> (i32, T) {
    match res {
        Ok(v) => (0, v),
        Err(e) => {
            error!("{} on buffer '{}' failed: {}", op, id, e);
            (e.to_status(), T::default())
        }
    }
}

#[interface(name = "lv.lumii.ringbuf.RingBuffer")]
impl RingBufferService {
    /// Write copies `data` into buffer `id`.
    /// Returns (status, written); `written` may be less than the data length.
    async fn write(&self, id: &str, data: Vec<u8>) -> (i32, u64) {
        let res = self.0.write(id, &data).await.map(|n| n as u64);
        reply("Write", id, res)
    }

    /// Read returns up to `length` bytes from buffer `id`.
    async fn read(&self, id: &str, length: u64) -> (i32, Vec<u8>) {
        let length = usize::try_from(length).unwrap_or(usize::MAX);
        reply("Read", id, self.0.read(id, length).await)
    }

    async fn is_full(&self, id: &str) -> (i32, bool) {
        reply("IsFull", id, self.0.is_full(id).await)
    }

    async fn is_empty(&self, id: &str) -> (i32, bool) {
        reply("IsEmpty", id, self.0.is_empty(id).await)
    }

    async fn get_write_bytes_available(&self, id: &str) -> (i32, u64) {
        let res = self.0.write_bytes_available(id).await.map(|n| n as u64);
        reply("GetWriteBytesAvailable", id, res)
    }

    async fn get_read_bytes_available(&self, id: &str) -> (i32, u64) {
        let res = self.0.read_bytes_available(id).await.map(|n| n as u64);
        reply("GetReadBytesAvailable", id, res)
    }

    /// ListBuffers returns the ids of all hosted buffers.
    async fn list_buffers(&self) -> Vec<String> {
        self.0.ids()
    }

    /// GetStats returns (total_bytes_written, total_bytes_read).
    async fn get_stats(&self) -> (u64, u64) {
        self.0.get_stats()
    }
}
