//! # Testwire - Test-Run Reporting Bridge
//!
//! Observes a running test execution and republishes each lifecycle event
//! (suite/group start, test start, test finish, diagnostic output) as a
//! message of a compact wire reporting protocol, delivered to a listening
//! consumer such as an IDE, CI harness, or dashboard.
//!
//! ## Architecture
//!
//! The translator is the only component with non-trivial logic; everything
//! around it is sequencing:
//! ```text
//!   host runner ──XML fragment──▶ EventConverter ──messages──▶ wire::serialize
//!                                      │                            │
//!                              started-id tracking                  ▼
//!                              (start/end pairing)          Transport::send
//!                                                          (framed, ordered)
//! ```
//!
//! Single-threaded and synchronous by design: the host invokes the
//! [`reporter::RunObserver`] methods one at a time on its own thread, and
//! sends are fire-and-forget.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod events;
pub mod protocol;
pub mod reporter;
pub mod transport;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Error, ReporterConfig, Result};
