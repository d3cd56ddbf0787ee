use crate::config::FeedConfig;
use crate::error::Error;
use async_trait::async_trait;
use std::io;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio::sync::Mutex;

/// Producer of bytes for a feeder. An empty chunk means the source is exhausted.
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn read_chunk(&self, max: usize) -> Result<Vec<u8>, Error>;
}

pub struct FileSource {
    path: String,
    file: Mutex<File>,
    offset: Mutex<u64>,
    loop_on_eof: bool,
}

impl FileSource {
    pub async fn new(cfg: &FeedConfig) -> io::Result<Self> {
        Self::open(&cfg.path, cfg.loop_.unwrap_or(false)).await
    }

    pub async fn open(path: &str, loop_on_eof: bool) -> io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self {
            path: path.to_string(),
            file: Mutex::new(file),
            offset: Mutex::new(0),
            loop_on_eof,
        })
    }
}

#[async_trait]
impl ByteSource for FileSource {
    async fn read_chunk(&self, max: usize) -> Result<Vec<u8>, Error> {
        let mut file = self.file.lock().await;
        let mut offset = self.offset.lock().await;
        let mut buf = vec![0u8; max];

        // Seek to saved offset
        file.seek(SeekFrom::Start(*offset)).await?;

        let n = match file.read(&mut buf).await? {
            0 if self.loop_on_eof && *offset > 0 => {
                log::debug!("Rewinding feed source {}", self.path);
                file.seek(SeekFrom::Start(0)).await?;
                *offset = 0;
                file.read(&mut buf).await?
            }
            n => n,
        };

        *offset += n as u64;
        buf.truncate(n);
        Ok(buf)
    }
}
