//! Wire encoding for protocol messages.
//!
//! Messages travel as compact JSON. When a message is embedded inside
//! captured test output (rather than sent as its own frame), the line carries
//! the `##utp` marker so consumers can tell protocol traffic apart from
//! ordinary diagnostics; [`deserialize`] accepts both forms.

use crate::protocol::Message;
use crate::types::Result;

/// Marker prefixing a protocol message embedded in captured output.
pub const MESSAGE_MARKER: &str = "##utp";

/// Serialize a message to its wire representation.
pub fn serialize(message: &Message) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Deserialize a message from its wire representation.
///
/// Accepts bare JSON, or text carrying the [`MESSAGE_MARKER`] (optionally
/// followed by `:`) before the JSON body.
pub fn deserialize(text: &str) -> Result<Message> {
    let body = text.strip_prefix(MESSAGE_MARKER).unwrap_or(text);
    let body = body.strip_prefix(':').unwrap_or(body);
    Ok(serde_json::from_str(body.trim())?)
}
