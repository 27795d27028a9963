//! Test-lifecycle event handling: fragment parsing, decoding, translation.

pub mod fragment;
pub mod translation;

mod event;

pub use event::TestEvent;
pub use translation::EventConverter;
