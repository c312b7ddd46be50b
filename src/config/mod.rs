//! Configuration loading and management for the shift engine.
//!
//! This module provides the engine's behavioral configuration — shift-type
//! thresholds, pay-rate multipliers, the job-bonus inclusion switch, and the
//! job deletion policy — with canonical defaults and optional YAML loading.
//!
//! # Example
//!
//! ```
//! use shift_engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert!(config.validate().is_ok());
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::load_config;
pub use types::{EngineConfig, JobDeletePolicy, RateMultipliers, ShiftTypeThresholds};
