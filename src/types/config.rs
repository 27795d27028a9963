//! Configuration structures.
//!
//! Defaults cover the common embedding; a host can deserialize overrides from
//! a JSON/TOML document or build the structs directly.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Global reporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReporterConfig {
    /// Transport configuration.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// End-of-run shutdown behavior.
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

/// Transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Address of the listening protocol consumer.
    pub connect_addr: String,

    /// Connection establishment timeout.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Write timeout per frame. A consumer that cannot accept a frame
    /// within this window surfaces as an I/O error to the caller.
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,

    /// Maximum frame payload size accepted on the read side.
    pub max_frame_bytes: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_addr: "127.0.0.1:6750".to_string(),
            connect_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            max_frame_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// End-of-run shutdown behavior.
///
/// Some hosts tear the process down the moment the run completes; on those,
/// the reporter pauses after the run-complete signal so the final frame has
/// time to flush before the quit hook runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// Request application shutdown after the run-complete signal.
    pub quit_after_run: bool,

    /// Pause between the run-complete signal and the quit request.
    #[serde(with = "humantime_serde")]
    pub quit_delay: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            quit_after_run: false,
            quit_delay: Duration::from_secs(1),
        }
    }
}
