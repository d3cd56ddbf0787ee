use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use log::error;

pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_POLL_MS: u64 = 10;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub buffers: Vec<BufferConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BufferConfig {
    pub id: String,
    pub capacity: usize,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub feed: Option<FeedConfig>,
}

/// A file that keeps a buffer topped up.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub path: String,
    #[serde(default, rename = "loop")]
    pub loop_: Option<bool>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub poll_ms: Option<u64>,
}

impl FeedConfig {
    pub fn chunk_size(&self) -> usize {
        match self.chunk_size {
            Some(n) if n > 0 => n,
            _ => DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn poll_ms(&self) -> u64 {
        self.poll_ms.unwrap_or(DEFAULT_POLL_MS)
    }
}

pub struct FlattenedConfig {
    pub buffers: Vec<BufferConfig>,
}

pub fn get_config_path() -> String {
    if let Ok(home) = std::env::var("HOME") {
        format!("{}/.config/ringbuf-dbus/config.toml", home)
    } else {
        "/etc/ringbuf-dbus/config.toml".to_string()
    }
}

pub fn load_config(path: &str) -> Result<FlattenedConfig, Box<dyn std::error::Error>> {

    if !Path::new(path).exists() {
        return Err(format!("Config file not found: {}", path).into());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;

    let cfg = parse_config(&content)
        .map_err(|e| format!("Failed to parse TOML config {}: {}", path, e))?;

    log::info!("Config loaded from: {}", path);
    Ok(cfg)
}

pub fn parse_config(content: &str) -> Result<FlattenedConfig, toml::de::Error> {
    let cfg: Config = toml::from_str(content)?;

    log::info!("Found {} buffers in config", cfg.buffers.len());

    let mut buffers = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    for b in cfg.buffers.into_iter().filter(|b| b.enabled) {
        if !is_valid_id(&b.id) {
            error!("Invalid buffer id '{}'. Use [a-z0-9][a-z0-9_-]*", b.id);
            continue;
        }
        // A zero-sized ring buffer is a contract violation, reject it here
        if b.capacity == 0 {
            error!("Buffer '{}' has zero capacity - skipping", b.id);
            continue;
        }
        if !seen_ids.insert(b.id.clone()) {
            error!("Duplicate buffer id '{}' - skipping", b.id);
            continue;
        }
        buffers.push(b);
    }

    let feeds = buffers.iter().filter(|b| b.feed.is_some()).count();
    log::info!("Enabled buffers: {} ({} with feeds)", buffers.len(), feeds);

    if buffers.is_empty() {
        log::warn!("No enabled ring buffers found in config - every request will fail");
    }

    Ok(FlattenedConfig { buffers })
}

fn is_valid_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_lc_alnum(c) => {},
        _ => return false,
    }
    for c in chars {
        if !(is_lc_alnum(c) || c == '-' || c == '_') { return false; }
    }
    true
}

fn is_lc_alnum(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9')
}
