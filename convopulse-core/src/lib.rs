//! # convopulse-core
//!
//! Core library for convopulse - user engagement analytics for chat
//! interaction logs.
//!
//! This library provides:
//! - Domain types for normalized interaction events
//! - A resilient CSV normalizer for raw log exports
//! - The engagement metrics engine (activity, sessions, features, retention)
//! - Report writers (HTML dashboard, CSV summary, JSON)
//! - A deterministic synthetic-log simulator
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Raw:** CSV log exports on disk (immutable)
//! - **Normalized:** chronologically ordered [`Event`]s with parsed
//!   timestamps and author roles
//! - **Derived:** one [`EngagementMetrics`] result per run (regenerable)
//!
//! ## Example
//!
//! ```rust,no_run
//! use convopulse_core::{Config, CsvNormalizer, MetricsEngine};
//! use std::path::Path;
//!
//! let config = Config::load().expect("failed to load config");
//! let result = CsvNormalizer::new()
//!     .normalize_file(Path::new("interactions.csv"))
//!     .expect("failed to read log");
//!
//! let engine = MetricsEngine::new(config.metrics.to_engine_config());
//! let metrics = engine.compute(&result.events);
//! println!("{} users, {} events", metrics.total_users, metrics.total_events);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{CsvNormalizer, NormalizeResult};
pub use metrics::{FeatureRule, MetricsConfig, MetricsEngine};
pub use report::ReportWriter;
pub use simulate::{Scenario, Simulator};
pub use types::*;

// Public modules
pub mod config;
pub mod csv;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod simulate;
pub mod types;
