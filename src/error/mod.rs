// Error types for the classroom pulse dashboard
//
// This module defines custom error types for the speech-analysis cycle and
// the shared snapshot state, providing structured error handling with error
// codes suitable for the HTTP wire contract.

mod speech;
mod state;

pub use speech::{log_speech_error, SpeechError, SpeechErrorCodes};
pub use state::{log_state_error, StateError, StateErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the HTTP boundary and in log output.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
