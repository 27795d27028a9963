//! Reporting protocol messages.
//!
//! Canonical definitions of the wire vocabulary. Messages are value objects:
//! the translator constructs them once and never mutates them afterwards.
//! Group start/end messages must nest correctly around the messages of
//! contained tests, and every TestEnd follows the TestStart for the same test.

use serde::{Deserialize, Serialize};

pub mod wire;

/// The closed outcome vocabulary a finished test is classified into.
///
/// The framework reports status as a free-form string; [`TestState::from_framework_status`]
/// is the only sanctioned mapping into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestState {
    Cancelled,
    Error,
    NotRunnable,
    Failure,
    Inconclusive,
    Success,
    Ignored,
    Skipped,
}

impl TestState {
    /// Map a framework status string into the closed vocabulary.
    ///
    /// Matching is case-insensitive. Both "skipped" and "explicit" collapse
    /// into [`TestState::Skipped`]; the collapsing is intentional. Returns
    /// `None` for anything outside the vocabulary; the caller decides how
    /// hard to fail.
    pub fn from_framework_status(status: &str) -> Option<Self> {
        match status.to_ascii_lowercase().as_str() {
            "cancelled" => Some(TestState::Cancelled),
            "error" => Some(TestState::Error),
            "invalid" => Some(TestState::NotRunnable),
            "failed" => Some(TestState::Failure),
            "inconclusive" => Some(TestState::Inconclusive),
            "passed" => Some(TestState::Success),
            "ignored" => Some(TestState::Ignored),
            "skipped" => Some(TestState::Skipped),
            "explicit" => Some(TestState::Skipped),
            _ => None,
        }
    }
}

/// Everything the protocol reports about one finished test.
///
/// Constructed transiently per finish event and consumed immediately by
/// [`Message::TestEnd`]; not retained by the translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    /// Fully-qualified test name.
    pub name: String,

    /// Result state.
    pub state: TestState,

    /// Failure/reason/assertion message text, or captured output, or empty.
    pub message: String,

    /// Wall-clock duration in microseconds, as measured by the framework.
    pub duration_us: u64,

    /// Stack trace text, or empty.
    pub stack_trace: String,

    /// Class name the test belongs to, or empty.
    pub class_name: String,
}

/// One unit of the reporting wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// A suite/group opened. Keyed by fully-qualified group name.
    TestGroupStart { name: String },

    /// A previously opened suite/group closed.
    TestGroupEnd { name: String },

    /// A test began executing.
    TestStart { name: String },

    /// A test finished, with its full result.
    TestEnd(TestInfo),

    /// Diagnostic output from a recognized non-error stream.
    Info { message: String },

    /// An anomaly worth surfacing without aborting the run.
    Warning { message: String },

    /// Diagnostic output from the error stream.
    Error { message: String },
}
