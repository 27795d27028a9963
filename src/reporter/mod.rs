//! Run orchestration — host lifecycle notifications → translated frames.
//!
//! The embedding application owns the test-execution loop and calls the four
//! [`RunObserver`] methods in a fixed order on a single thread:
//! run_started; (test_started, test_finished)* interleaved with suite events;
//! run_finished. Each notification is rendered to its XML fragment, fed to
//! the translator, and every resulting message is serialized and sent on the
//! protocol-message channel. Transport failures propagate; nothing here
//! catches or retries.

use std::thread;

use crate::events::EventConverter;
use crate::protocol::wire;
use crate::transport::{Channel, Transport};
use crate::types::{Result, ShutdownConfig};

/// Payload of the run-complete signal frame.
const RUN_FINISHED_SIGNAL: [u8; 1] = [1];

/// A host object that can render itself to a single XML event node
/// (non-recursive: only the node for this event, not its descendants).
pub trait EventXml {
    fn to_event_xml(&self) -> String;
}

impl EventXml for str {
    fn to_event_xml(&self) -> String {
        self.to_owned()
    }
}

impl EventXml for String {
    fn to_event_xml(&self) -> String {
        self.clone()
    }
}

/// The four run-lifecycle notification call sites, in their fixed order.
pub trait RunObserver {
    fn run_started<S: EventXml + ?Sized>(&mut self, suite: &S) -> Result<()>;
    fn test_started<S: EventXml + ?Sized>(&mut self, test: &S) -> Result<()>;
    fn test_finished<S: EventXml + ?Sized>(&mut self, result: &S) -> Result<()>;
    fn run_finished<S: EventXml + ?Sized>(&mut self, result: &S) -> Result<()>;
}

/// Host hook invoked when the reporter requests application shutdown.
pub trait QuitHandler {
    fn request_quit(&mut self);
}

/// The orchestrator: owns a translator and a transport, implements
/// [`RunObserver`].
pub struct RunReporter<T: Transport> {
    converter: EventConverter,
    transport: T,
    shutdown: ShutdownConfig,
    quit_handler: Option<Box<dyn QuitHandler>>,
}

impl<T: Transport> std::fmt::Debug for RunReporter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunReporter")
            .field("converter", &self.converter)
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RunReporter<T> {
    pub fn new(transport: T, shutdown: ShutdownConfig) -> Self {
        Self {
            converter: EventConverter::new(),
            transport,
            shutdown,
            quit_handler: None,
        }
    }

    /// Register the host's quit hook, used when
    /// [`ShutdownConfig::quit_after_run`] is set.
    pub fn with_quit_handler(mut self, handler: Box<dyn QuitHandler>) -> Self {
        self.quit_handler = Some(handler);
        self
    }

    /// Clear translator state so the reporter can observe another run.
    pub fn reset(&mut self) {
        self.converter.reset();
    }

    /// Recover the transport (e.g. to inspect recorded frames in tests).
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Translate one notification and send every resulting message, in
    /// emission order, on the protocol-message channel.
    pub fn report<S: EventXml + ?Sized>(&mut self, source: &S) -> Result<()> {
        let xml = source.to_event_xml();
        let messages = self.converter.convert(&xml)?;
        tracing::debug!("Translated event into {} message(s)", messages.len());

        for message in &messages {
            let payload = wire::serialize(message)?;
            self.transport
                .send(Channel::PROTOCOL_MESSAGE, payload.as_bytes())?;
        }
        Ok(())
    }

    /// Send the run-complete signal and run the configured shutdown
    /// sequence. Called from [`RunObserver::run_finished`] after its final
    /// messages are forwarded; hosts driving the reporter directly (e.g.
    /// the relay binary) call it once at end of input.
    pub fn complete(&mut self) -> Result<()> {
        self.transport
            .send(Channel::RUN_FINISHED, &RUN_FINISHED_SIGNAL)?;
        tracing::debug!("Run-complete signal sent");

        if self.shutdown.quit_after_run {
            // Give the final frame time to flush on hosts that tear the
            // process down as soon as the run ends.
            thread::sleep(self.shutdown.quit_delay);
            if let Some(handler) = self.quit_handler.as_mut() {
                handler.request_quit();
            }
        }
        Ok(())
    }
}

impl<T: Transport> RunObserver for RunReporter<T> {
    fn run_started<S: EventXml + ?Sized>(&mut self, suite: &S) -> Result<()> {
        self.report(suite)
    }

    fn test_started<S: EventXml + ?Sized>(&mut self, test: &S) -> Result<()> {
        self.report(test)
    }

    fn test_finished<S: EventXml + ?Sized>(&mut self, result: &S) -> Result<()> {
        self.report(result)
    }

    fn run_finished<S: EventXml + ?Sized>(&mut self, result: &S) -> Result<()> {
        self.report(result)?;
        self.complete()
    }
}
