#![forbid(unsafe_code)]

//! Core domain model and reporting logic for the health tracker.
//!
//! This crate provides:
//! - Domain types (categories, units, event records, reports)
//! - Named time-of-day windows
//! - The in-memory record store and its aggregation engine
//! - Daily and period report builders
//! - Configuration and journal replay

pub mod types;
pub mod error;
pub mod window;
pub mod store;
pub mod convert;
pub mod aggregate;
pub mod report;
pub mod config;
pub mod logging;
pub mod journal;
pub mod service;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use window::TimeWindow;
pub use store::RecordStore;
pub use config::{Config, DailyTargets};
pub use journal::{JournalEntry, ReplaySummary};
pub use service::HealthService;
