//! Configuration and per-call options
//!
//! [`Config`] is the user-facing, JSON-loadable description of a store.
//! [`Options`] is the engine tuning derived from it. [`ReadOptions`] and
//! [`WriteOptions`] are small immutable values passed explicitly to every
//! call; nothing here is shared or mutated behind the caller's back.

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bloom filter bits per key; the filter is always enabled
pub const DEFAULT_FILTER_BITS: usize = 10;

/// Block compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Store blocks uncompressed
    None,
    /// Snappy block compression
    #[default]
    Snappy,
}

/// Store configuration as loaded from JSON
///
/// Every field is optional in the JSON document. Zero sizes mean "use the
/// engine default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the store
    pub path: PathBuf,
    /// Enable block compression
    pub compression: bool,
    /// Block size in bytes
    pub block_size: usize,
    /// Write buffer size in bytes
    pub write_buffer_size: usize,
    /// Block cache capacity in bytes; no cache when zero
    pub cache_size: usize,
}

impl Config {
    /// Configuration for a store at `path` with engine defaults
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parse a JSON document
    pub fn from_json(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Read and parse a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }
}

/// Engine tuning
///
/// Engines are free to ignore knobs that mean nothing to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    path: PathBuf,
    create_if_missing: bool,
    error_if_exists: bool,
    paranoid_checks: bool,
    compression: Compression,
    block_size: Option<usize>,
    block_restart_interval: Option<usize>,
    write_buffer_size: Option<usize>,
    max_open_files: Option<usize>,
    cache_size: Option<usize>,
    filter_bits: usize,
}

impl Options {
    /// Engine defaults for a store at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_if_missing: true,
            error_if_exists: false,
            paranoid_checks: false,
            compression: Compression::default(),
            block_size: None,
            block_restart_interval: None,
            write_buffer_size: None,
            max_open_files: None,
            cache_size: None,
            filter_bits: DEFAULT_FILTER_BITS,
        }
    }

    /// Derive tuning from a [`Config`]
    pub fn from_config(config: &Config) -> Self {
        let positive = |n: usize| (n > 0).then_some(n);
        let mut options = Self::new(&config.path);
        options.compression = if config.compression {
            Compression::Snappy
        } else {
            Compression::None
        };
        options.block_size = positive(config.block_size);
        options.write_buffer_size = positive(config.write_buffer_size);
        options.cache_size = positive(config.cache_size);
        options
    }

    /// Create the store when it does not exist
    pub fn create_if_missing(mut self, enabled: bool) -> Self {
        self.create_if_missing = enabled;
        self
    }

    /// Fail to open when the store already exists
    pub fn error_if_exists(mut self, enabled: bool) -> Self {
        self.error_if_exists = enabled;
        self
    }

    /// Aggressive integrity checking
    pub fn paranoid_checks(mut self, enabled: bool) -> Self {
        self.paranoid_checks = enabled;
        self
    }

    /// Set the block compression
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the block size
    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = Some(size);
        self
    }

    /// Set the number of keys between restart points
    pub fn block_restart_interval(mut self, interval: usize) -> Self {
        self.block_restart_interval = Some(interval);
        self
    }

    /// Set the write buffer size
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = Some(size);
        self
    }

    /// Set the open file limit
    pub fn max_open_files(mut self, files: usize) -> Self {
        self.max_open_files = Some(files);
        self
    }

    /// Enable an LRU block cache of `size` bytes
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Set bloom filter bits per key
    pub fn filter_bits(mut self, bits: usize) -> Self {
        self.filter_bits = bits;
        self
    }

    /// Store directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a missing store is created
    pub fn create_if_missing_enabled(&self) -> bool {
        self.create_if_missing
    }

    /// Whether opening an existing store fails
    pub fn error_if_exists_enabled(&self) -> bool {
        self.error_if_exists
    }

    /// Whether paranoid checks are on
    pub fn paranoid_checks_enabled(&self) -> bool {
        self.paranoid_checks
    }

    /// Block compression
    pub fn compression_type(&self) -> Compression {
        self.compression
    }

    /// Block size, if overridden
    pub fn block_size_bytes(&self) -> Option<usize> {
        self.block_size
    }

    /// Restart interval, if overridden
    pub fn block_restart_interval_keys(&self) -> Option<usize> {
        self.block_restart_interval
    }

    /// Write buffer size, if overridden
    pub fn write_buffer_size_bytes(&self) -> Option<usize> {
        self.write_buffer_size
    }

    /// Open file limit, if overridden
    pub fn max_open_files_limit(&self) -> Option<usize> {
        self.max_open_files
    }

    /// Block cache capacity, if a cache is configured
    pub fn cache_size_bytes(&self) -> Option<usize> {
        self.cache_size
    }

    /// Bloom filter bits per key
    pub fn filter_bits_per_key(&self) -> usize {
        self.filter_bits
    }
}

/// Options for reads and cursor creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Verify block checksums on read
    pub verify_checksums: bool,
    /// Populate the block cache with blocks read
    pub fill_cache: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            verify_checksums: false,
            fill_cache: true,
        }
    }
}

impl ReadOptions {
    /// Read options for range scans, which should not evict hot blocks
    pub fn for_iteration() -> Self {
        Self {
            fill_cache: false,
            ..Self::default()
        }
    }
}

/// Options for writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Flush to stable storage before returning
    pub sync: bool,
}

impl WriteOptions {
    /// Durable write options
    pub fn synced() -> Self {
        Self { sync: true }
    }
}
