//! Deterministic test harness utilities.
//!
//! Scripted collaborator implementations plus small signal generators,
//! shared between the unit tests and the integration suite. They live in
//! the crate proper (not behind `cfg(test)`) so the `tests/` directory can
//! reach them.

pub mod scripted;

pub use scripted::{
    sine_clip, words, ScriptedAmbientSource, ScriptedEmotionSource, ScriptedRecorder,
    ScriptedTranscriber,
};
