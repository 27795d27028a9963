//! Core types for the reporting pipeline.
//!
//! This module provides foundational types used throughout the crate:
//! - **IDs**: Strongly-typed tracking identifiers (TestId, GroupId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for transport, observability, and shutdown

mod config;
mod errors;
mod ids;

pub use config::{ObservabilityConfig, ReporterConfig, ShutdownConfig, TransportConfig};
pub use errors::{Error, Result};
pub use ids::{GroupId, TestId};
