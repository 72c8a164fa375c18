//! Configuration module for dashboard settings and YAML loading
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `InstrumentConfig`, `OffsetConfig`, ...)
//! - YAML loading functionality (`load_config`)
//! - Application constants with environment variable overrides
//! - Logging initialization (`init_logging`)

pub mod constants;
mod loader;
pub mod logging;
mod types;

// Re-export types
pub use types::{
    AppConfig, InstrumentConfig, OffsetConfig, ReleaseConfig, ResourceConfig, StorageConfig,
};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str};

// Re-export logging init
pub use logging::init_logging;
