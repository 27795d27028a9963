//! Event translation — framework lifecycle events → protocol messages.
//!
//! The only stateful piece of the pipeline. Two id sets track which tests and
//! groups have an open start message, which is what lets the translator keep
//! start/end pairing well-formed even when the event stream is not:
//!
//!   start-test                  → TestStart, id tracked
//!   test-case (start shape)     → TestStart, id tracked
//!   test-case (finish shape)    → TestEnd, preceded by a synthesized
//!                                 TestStart if the start was never observed
//!   test-output                 → Info/Error (trimmed), embedded-message
//!                                 passthrough, or Warning for unknown streams
//!   start-suite                 → TestGroupStart, id tracked
//!   test-suite                  → TestGroupEnd only if the open was observed
//!   (anything else)             → nothing
//!
//! No I/O, no suspension, no locking: state is touched only by the host's
//! single notification thread.

use std::collections::HashSet;

use crate::events::fragment;
use crate::events::TestEvent;
use crate::protocol::{wire, Message};
use crate::types::{GroupId, Result, TestId};

/// Stateful translator from XML event fragments to protocol messages.
///
/// State is scoped to one run. Call [`EventConverter::reset`] before reusing
/// a converter for another run.
#[derive(Debug, Default)]
pub struct EventConverter {
    started_tests: HashSet<TestId>,
    started_groups: HashSet<GroupId>,
}

impl EventConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all tracked state between runs.
    pub fn reset(&mut self) {
        self.started_tests.clear();
        self.started_groups.clear();
    }

    /// Translate one event fragment into zero or more protocol messages, in
    /// emission order.
    ///
    /// Returns an error only for input that breaks the event contract: XML
    /// the reader rejects, a recognized event missing its identity
    /// attributes, or a finish status outside the closed vocabulary. On
    /// error no partial output is produced and no state is mutated.
    pub fn convert(&mut self, xml: &str) -> Result<Vec<Message>> {
        let mut out = Vec::new();
        if xml.trim().is_empty() {
            return Ok(out);
        }

        let frag = fragment::parse(xml)?;
        match TestEvent::decode(&frag, xml)? {
            TestEvent::TestStarted { id, name } => {
                out.push(self.test_started(id, name));
            }
            TestEvent::TestFinished { id, info } => {
                if !self.started_tests.contains(&id) {
                    // The start was dropped or the run began mid-stream;
                    // synthesize it so every test yields a balanced pair.
                    out.push(self.test_started(id.clone(), info.name.clone()));
                }
                self.started_tests.remove(&id);
                out.push(Message::TestEnd(info));
            }
            TestEvent::Output { stream, text } => {
                out.push(self.test_output(stream.as_deref(), &text, xml)?);
            }
            TestEvent::SuiteStarted { id, name } => {
                self.started_groups.insert(id);
                out.push(Message::TestGroupStart { name });
            }
            TestEvent::SuiteFinished { id, name } => {
                // A close for a group whose open was never observed (e.g.
                // the run attached mid-suite) is dropped.
                if self.started_groups.remove(&id) {
                    out.push(Message::TestGroupEnd { name });
                }
            }
            TestEvent::Unrecognized => {}
        }
        Ok(out)
    }

    fn test_started(&mut self, id: TestId, name: String) -> Message {
        self.started_tests.insert(id);
        Message::TestStart { name }
    }

    fn test_output(&self, stream: Option<&str>, text: &str, raw: &str) -> Result<Message> {
        match stream {
            Some("Out") | Some("Progress") | Some("Error") => {}
            _ => {
                return Ok(Message::Warning {
                    message: format!("Unexpected test-output event: {}", raw),
                });
            }
        }

        // Output that is itself a protocol message is passed through rather
        // than re-wrapped.
        if text.starts_with(wire::MESSAGE_MARKER) {
            return wire::deserialize(text);
        }

        let message = text.trim_end().to_string();
        Ok(if stream == Some("Error") {
            Message::Error { message }
        } else {
            Message::Info { message }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{TestInfo, TestState};
    use crate::types::Error;
    use pretty_assertions::assert_eq;

    fn start_xml(id: &str, name: &str) -> String {
        format!(r#"<start-test id="{}" fullname="{}"/>"#, id, name)
    }

    fn finish_xml(id: &str, name: &str, result: &str) -> String {
        format!(
            r#"<test-case id="{}" fullname="{}" result="{}"/>"#,
            id, name, result
        )
    }

    // ── 1. start/finish pairing ─────────────────────────────────────────

    #[test]
    fn test_start_then_finish_yields_one_pair() {
        let mut converter = EventConverter::new();

        let started = converter.convert(&start_xml("1010", "Suite.Case")).unwrap();
        assert_eq!(
            started,
            vec![Message::TestStart {
                name: "Suite.Case".to_string()
            }]
        );

        let finished = converter
            .convert(&finish_xml("1010", "Suite.Case", "Passed"))
            .unwrap();
        assert_eq!(finished.len(), 1);
        assert!(matches!(finished[0], Message::TestEnd(_)));

        // The id is no longer tracked: a second finish synthesizes again.
        let again = converter
            .convert(&finish_xml("1010", "Suite.Case", "Passed"))
            .unwrap();
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn test_finish_without_start_synthesizes_the_start() {
        let mut converter = EventConverter::new();
        let messages = converter
            .convert(&finish_xml("7", "Suite.Orphan", "Failed"))
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            Message::TestStart {
                name: "Suite.Orphan".to_string()
            }
        );
        match &messages[1] {
            Message::TestEnd(info) => {
                assert_eq!(info.name, "Suite.Orphan");
                assert_eq!(info.state, TestState::Failure);
            }
            other => panic!("expected TestEnd, got {:?}", other),
        }
    }

    #[test]
    fn test_case_start_shape_counts_as_a_start() {
        let mut converter = EventConverter::new();
        converter
            .convert(r#"<test-case id="7" fullname="S.C"/>"#)
            .unwrap();

        // Finish for the same id must NOT synthesize another start.
        let finished = converter.convert(&finish_xml("7", "S.C", "Passed")).unwrap();
        assert_eq!(finished.len(), 1);
    }

    // ── 2. suite/group tracking ─────────────────────────────────────────

    #[test]
    fn test_suite_open_and_close() {
        let mut converter = EventConverter::new();

        let opened = converter
            .convert(r#"<start-suite id="0-1" fullname="Assembly.dll"/>"#)
            .unwrap();
        assert_eq!(
            opened,
            vec![Message::TestGroupStart {
                name: "Assembly.dll".to_string()
            }]
        );

        let closed = converter
            .convert(r#"<test-suite id="0-1" fullname="Assembly.dll" result="Passed"/>"#)
            .unwrap();
        assert_eq!(
            closed,
            vec![Message::TestGroupEnd {
                name: "Assembly.dll".to_string()
            }]
        );
    }

    #[test]
    fn test_untracked_suite_close_is_dropped() {
        let mut converter = EventConverter::new();
        let messages = converter
            .convert(r#"<test-suite id="0-9" fullname="Never.Opened"/>"#)
            .unwrap();
        assert!(messages.is_empty());

        // And dropping it twice stays silent.
        let again = converter
            .convert(r#"<test-suite id="0-9" fullname="Never.Opened"/>"#)
            .unwrap();
        assert!(again.is_empty());
    }

    // ── 3. test-output streams ──────────────────────────────────────────

    #[test]
    fn test_error_stream_trims_trailing_whitespace_only() {
        let mut converter = EventConverter::new();
        let messages = converter
            .convert("<test-output stream=\"Error\">  boom\n</test-output>")
            .unwrap();
        assert_eq!(
            messages,
            vec![Message::Error {
                message: "  boom".to_string()
            }]
        );
    }

    #[test]
    fn test_out_and_progress_streams_become_info() {
        let mut converter = EventConverter::new();
        for stream in ["Out", "Progress"] {
            let xml = format!("<test-output stream=\"{}\">line\n</test-output>", stream);
            let messages = converter.convert(&xml).unwrap();
            assert_eq!(
                messages,
                vec![Message::Info {
                    message: "line".to_string()
                }],
                "stream {:?}",
                stream
            );
        }
    }

    #[test]
    fn test_unknown_stream_yields_warning_quoting_the_fragment() {
        let mut converter = EventConverter::new();
        let xml = r#"<test-output stream="Telemetry">x</test-output>"#;
        let messages = converter.convert(xml).unwrap();

        assert_eq!(messages.len(), 1);
        match &messages[0] {
            Message::Warning { message } => assert!(message.contains(xml)),
            other => panic!("expected Warning, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_stream_yields_warning() {
        let mut converter = EventConverter::new();
        let messages = converter.convert("<test-output>x</test-output>").unwrap();
        assert!(matches!(messages[0], Message::Warning { .. }));
    }

    #[test]
    fn test_embedded_protocol_message_passes_through() {
        let mut converter = EventConverter::new();
        let inner = Message::Info {
            message: "from inside the run".to_string(),
        };
        let xml = format!(
            "<test-output stream=\"Out\">{}:{}</test-output>",
            wire::MESSAGE_MARKER,
            wire::serialize(&inner).unwrap().replace('"', "&quot;")
        );

        let messages = converter.convert(&xml).unwrap();
        assert_eq!(messages, vec![inner]);
    }

    // ── 4. degenerate input ─────────────────────────────────────────────

    #[test]
    fn test_empty_and_whitespace_input_yield_nothing() {
        let mut converter = EventConverter::new();
        assert!(converter.convert("").unwrap().is_empty());
        assert!(converter.convert("   \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_unrecognized_tag_yields_nothing() {
        let mut converter = EventConverter::new();
        let messages = converter
            .convert(r#"<start-run count="12"/>"#)
            .unwrap();
        assert!(messages.is_empty());
    }

    // ── 5. fatal unknown status ─────────────────────────────────────────

    #[test]
    fn test_unknown_status_raises_and_produces_no_partial_output() {
        let mut converter = EventConverter::new();
        let err = converter
            .convert(&finish_xml("7", "S.C", "xyz"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownStatus { .. }));

        // No state was recorded for the failed conversion: a later valid
        // finish still synthesizes its own start.
        let messages = converter.convert(&finish_xml("7", "S.C", "Passed")).unwrap();
        assert_eq!(messages.len(), 2);
    }

    // ── 6. status collapsing ────────────────────────────────────────────

    #[test]
    fn test_skipped_and_explicit_collapse() {
        let mut converter = EventConverter::new();
        for status in ["skipped", "explicit", "Skipped", "Explicit"] {
            let messages = converter.convert(&finish_xml("7", "S.C", status)).unwrap();
            match messages.last() {
                Some(Message::TestEnd(TestInfo { state, .. })) => {
                    assert_eq!(*state, TestState::Skipped, "status {:?}", status)
                }
                other => panic!("expected TestEnd, got {:?}", other),
            }
        }
    }

    // ── 7. reset between runs ───────────────────────────────────────────

    #[test]
    fn test_reset_forgets_tracked_ids() {
        let mut converter = EventConverter::new();
        converter.convert(&start_xml("1", "S.C")).unwrap();
        converter
            .convert(r#"<start-suite id="0-1" fullname="G"/>"#)
            .unwrap();

        converter.reset();

        // Finish synthesizes a start again; group close is dropped.
        let finished = converter.convert(&finish_xml("1", "S.C", "Passed")).unwrap();
        assert_eq!(finished.len(), 2);
        let closed = converter
            .convert(r#"<test-suite id="0-1" fullname="G"/>"#)
            .unwrap();
        assert!(closed.is_empty());
    }

    // ── 8. properties ───────────────────────────────────────────────────

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Every finish yields exactly one balanced pair: [TestEnd] when
            /// the start was observed, [TestStart, TestEnd] when it was not.
            #[test]
            fn starts_and_ends_always_pair(
                cases in proptest::collection::vec((0u32..16, proptest::bool::ANY), 1..32)
            ) {
                let mut converter = EventConverter::new();
                for (id, with_start) in cases {
                    let id = id.to_string();
                    let name = format!("Suite.Case{}", id);
                    if with_start {
                        let started = converter.convert(&start_xml(&id, &name)).unwrap();
                        prop_assert_eq!(started.len(), 1);
                    }
                    let finished = converter.convert(&finish_xml(&id, &name, "Passed")).unwrap();
                    let expected = if with_start { 1 } else { 2 };
                    prop_assert_eq!(finished.len(), expected);
                    prop_assert!(matches!(finished.last(), Some(Message::TestEnd(_))));
                }
            }

            /// Microsecond durations rendered as decimal seconds survive the
            /// conversion exactly.
            #[test]
            fn duration_round_trips(us in 0u64..1_000_000_000) {
                let mut converter = EventConverter::new();
                let xml = format!(
                    r#"<test-case id="1" fullname="S.C" result="Passed" duration="{}.{:06}"/>"#,
                    us / 1_000_000,
                    us % 1_000_000,
                );
                let messages = converter.convert(&xml).unwrap();
                match messages.last() {
                    Some(Message::TestEnd(info)) => prop_assert_eq!(info.duration_us, us),
                    other => prop_assert!(false, "expected TestEnd, got {:?}", other),
                }
            }
        }
    }
}
