//! Configuration for TagKV
//!
//! Centralized configuration with sensible defaults. The storage path is the
//! only setting most callers touch: its suffix picks the durability mode.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::merge::{Concatenate, MergeOperator};

/// Path suffix that selects [`Durability::Durable`]
pub const DURABLE_SUFFIX: &str = ".db";

/// Durability mode, fixed for the lifetime of an open store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// fsync on every commit (safest, slowest)
    Durable,

    /// No fsync on commit; commits become durable on flush or close
    Fast,
}

impl Durability {
    /// Infer the mode from the storage path naming convention
    pub fn for_path(path: &Path) -> Self {
        if path.to_string_lossy().ends_with(DURABLE_SUFFIX) {
            Durability::Durable
        } else {
            Durability::Fast
        }
    }

    /// Whether commits wait for the disk
    pub fn is_sync(self) -> bool {
        matches!(self, Durability::Durable)
    }

    pub(crate) fn as_redb(self) -> redb::Durability {
        match self {
            Durability::Durable => redb::Durability::Immediate,
            Durability::Fast => redb::Durability::None,
        }
    }
}

/// Main configuration for a TagKV store
#[derive(Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Database file; missing parent directories are created on open
    pub path: PathBuf,

    /// Commit durability (inferred from `path` unless overridden)
    pub durability: Durability,

    /// Engine page cache size in bytes (engine default when None)
    pub cache_size: Option<usize>,

    // -------------------------------------------------------------------------
    // Merge Configuration
    // -------------------------------------------------------------------------
    /// Operator used for merge entries at commit time
    pub merge_operator: Arc<dyn MergeOperator>,
}

impl Config {
    /// Config for `path` with durability inferred from its suffix
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            durability: Durability::for_path(&path),
            path,
            cache_size: None,
            merge_operator: Arc::new(Concatenate),
        }
    }

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("path", &self.path)
            .field("durability", &self.durability)
            .field("cache_size", &self.cache_size)
            .field("merge_operator", &self.merge_operator.name())
            .finish()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    path: Option<PathBuf>,
    durability: Option<Durability>,
    cache_size: Option<usize>,
    merge_operator: Option<Arc<dyn MergeOperator>>,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the durability inferred from the path
    pub fn durability(mut self, durability: Durability) -> Self {
        self.durability = Some(durability);
        self
    }

    /// Set the engine page cache size (in bytes)
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    /// Set the merge operator
    pub fn merge_operator(mut self, operator: impl MergeOperator + 'static) -> Self {
        self.merge_operator = Some(Arc::new(operator));
        self
    }

    pub fn build(self) -> Config {
        let mut config = Config::new(self.path.unwrap_or_else(|| PathBuf::from("./tagkv.db")));
        if let Some(durability) = self.durability {
            config.durability = durability;
        }
        config.cache_size = self.cache_size;
        if let Some(operator) = self.merge_operator {
            config.merge_operator = operator;
        }
        config
    }
}
