//! Process-wide engine configuration.
//!
//! Built once at startup and handed to the backend; never mutated per call.
//!
//! `max_memory` and `max_objects` are cache budgets: the backend tracks its
//! live rasters against them but never fails a resize for exceeding them.
//! Only the opt-in `max_alloc` refuses work.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default memory ceiling (100 MiB).
pub const DEFAULT_MAX_MEMORY: u64 = 100 * 1024 * 1024;

/// Default ceiling on live rasters across all concurrent calls.
pub const DEFAULT_MAX_OBJECTS: usize = 500;

/// Invalid engine configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_memory must be non-zero")]
    ZeroMemory,

    #[error("max_objects must be non-zero")]
    ZeroObjects,

    #[error("max_alloc must be non-zero when set")]
    ZeroAlloc,
}

/// Cache budgets and allocation limit for the imaging backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Bytes of live rasters the backend aims to stay under
    pub max_memory: u64,
    /// Number of live rasters the backend aims to stay under
    pub max_objects: usize,
    /// Hard ceiling on a single raster allocation, off by default
    pub max_alloc: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_memory: DEFAULT_MAX_MEMORY,
            max_objects: DEFAULT_MAX_OBJECTS,
            max_alloc: None,
        }
    }
}

impl EngineConfig {
    pub fn new(max_memory: u64, max_objects: usize) -> Result<Self, ConfigError> {
        Self {
            max_memory,
            max_objects,
            max_alloc: None,
        }
        .validated()
    }

    /// Refuse any single raster larger than `bytes`.
    pub fn with_max_alloc(mut self, bytes: u64) -> Self {
        self.max_alloc = Some(bytes);
        self
    }

    /// Check the limits are usable.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.max_memory == 0 {
            return Err(ConfigError::ZeroMemory);
        }
        if self.max_objects == 0 {
            return Err(ConfigError::ZeroObjects);
        }
        if self.max_alloc == Some(0) {
            return Err(ConfigError::ZeroAlloc);
        }
        Ok(self)
    }

    /// Decoder limits: the `image` defaults, tightened by `max_alloc` if set.
    pub fn decoder_limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        if let Some(max_alloc) = self.max_alloc {
            limits.max_alloc = Some(max_alloc);
        }
        limits
    }
}
