//! Decoded test-lifecycle events.
//!
//! The framework identifies events by tag name and re-uses one tag for two
//! shapes, so raw fragments are decoded exactly once, here, into a closed
//! enum. Everything downstream dispatches on the variant instead of
//! re-inspecting the XML.

use crate::events::fragment::Fragment;
use crate::protocol::{TestInfo, TestState};
use crate::types::{Error, GroupId, Result, TestId};

/// One recognized test-lifecycle event, or `Unrecognized`.
#[derive(Debug, Clone, PartialEq)]
pub enum TestEvent {
    /// A test began (`start-test`, or a `test-case` in start shape).
    TestStarted { id: TestId, name: String },

    /// A test finished (`test-case` in finish shape), with its full result
    /// already extracted and validated.
    TestFinished { id: TestId, info: TestInfo },

    /// Captured diagnostic output (`test-output`).
    Output {
        stream: Option<String>,
        text: String,
    },

    /// A suite/group opened (`start-suite`).
    SuiteStarted { id: GroupId, name: String },

    /// A suite/group closed (`test-suite`).
    SuiteFinished { id: GroupId, name: String },

    /// Any other tag. Kept silent for forward compatibility.
    Unrecognized,
}

impl TestEvent {
    /// Decode a parsed fragment. `raw` is the original XML text, quoted in
    /// error context.
    ///
    /// The `test-case` tag is ambiguous: some frameworks reuse it for both
    /// start and finish notifications. A `test-case` carrying neither a
    /// `label` nor a `result` attribute is a start; otherwise it is a
    /// finish. This shape rule must not change: it is how the two
    /// notifications are told apart on the wire.
    pub fn decode(fragment: &Fragment, raw: &str) -> Result<TestEvent> {
        match fragment.name.as_str() {
            "start-test" => {
                let (id, name) = identity(fragment)?;
                Ok(TestEvent::TestStarted { id, name })
            }
            "test-case" => {
                if fragment.attr("label").is_none() && fragment.attr("result").is_none() {
                    let (id, name) = identity(fragment)?;
                    Ok(TestEvent::TestStarted { id, name })
                } else {
                    decode_finished(fragment, raw)
                }
            }
            "test-output" => Ok(TestEvent::Output {
                stream: fragment.attr("stream").map(str::to_owned),
                text: fragment.inner_text(),
            }),
            "start-suite" => {
                let (id, name) = group_identity(fragment)?;
                Ok(TestEvent::SuiteStarted { id, name })
            }
            "test-suite" => {
                let (id, name) = group_identity(fragment)?;
                Ok(TestEvent::SuiteFinished { id, name })
            }
            _ => Ok(TestEvent::Unrecognized),
        }
    }
}

fn identity(fragment: &Fragment) -> Result<(TestId, String)> {
    let id = required_attr(fragment, "id")?;
    let name = required_attr(fragment, "fullname")?;
    let id = TestId::from_string(id.to_string()).map_err(Error::malformed_event)?;
    Ok((id, name.to_string()))
}

fn group_identity(fragment: &Fragment) -> Result<(GroupId, String)> {
    let id = required_attr(fragment, "id")?;
    let name = required_attr(fragment, "fullname")?;
    let id = GroupId::from_string(id.to_string()).map_err(Error::malformed_event)?;
    Ok((id, name.to_string()))
}

fn required_attr<'a>(fragment: &'a Fragment, name: &str) -> Result<&'a str> {
    fragment.attr(name).ok_or_else(|| {
        Error::malformed_event(format!("<{}> missing '{}' attribute", fragment.name, name))
    })
}

fn decode_finished(fragment: &Fragment, raw: &str) -> Result<TestEvent> {
    let (id, name) = identity(fragment)?;

    // label wins over result when both are present.
    let status = fragment
        .attr("label")
        .or_else(|| fragment.attr("result"))
        .unwrap_or("");
    let state = TestState::from_framework_status(status)
        .ok_or_else(|| Error::unknown_status(status, raw))?;

    let info = TestInfo {
        name,
        state,
        message: finish_message(fragment),
        duration_us: duration_microseconds(fragment)?,
        stack_trace: stack_trace(fragment),
        class_name: fragment.attr("classname").unwrap_or("").to_string(),
    };
    Ok(TestEvent::TestFinished { id, info })
}

/// Message text priority: a `message` nested under the first present of
/// `failure`/`reason`/`assertion`. When one of those nodes exists but has no
/// `message` child, the result is empty; captured `output` is only
/// consulted when none of the three is present at all.
fn finish_message(fragment: &Fragment) -> String {
    let parent = fragment
        .child("failure")
        .or_else(|| fragment.child("reason"))
        .or_else(|| fragment.child("assertion"));

    match parent {
        Some(node) => node
            .child("message")
            .map(Fragment::inner_text)
            .unwrap_or_default(),
        None => fragment
            .child("output")
            .map(Fragment::inner_text)
            .unwrap_or_default(),
    }
}

fn stack_trace(fragment: &Fragment) -> String {
    fragment
        .child("failure")
        .or_else(|| fragment.child("assertion"))
        .and_then(|node| node.child("stack-trace"))
        .map(Fragment::inner_text)
        .unwrap_or_default()
}

/// Duration arrives as a culture-invariant decimal-seconds string. Absent
/// means zero. Converted to microseconds, rounded half away from zero.
fn duration_microseconds(fragment: &Fragment) -> Result<u64> {
    let seconds = match fragment.attr("duration") {
        Some(value) => value.trim().parse::<f64>().map_err(|_| {
            Error::malformed_event(format!("unparsable duration '{}'", value))
        })?,
        None => 0.0,
    };
    Ok((seconds * 1_000_000.0).round() as u64)
}
