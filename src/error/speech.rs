// Speech-analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Speech error code constants shared with the dashboard front end
///
/// These constants provide a single source of truth for error codes
/// reported in HTTP error payloads and structured logs.
///
/// Error code range: 2001-2006
pub struct SpeechErrorCodes {}

impl SpeechErrorCodes {
    /// Recording contained no intelligible speech
    pub const UNINTELLIGIBLE: i32 = 2001;

    /// Transcription service could not be reached or rejected the request
    pub const SERVICE_UNAVAILABLE: i32 = 2002;

    /// Feature extraction failed on the recorded clip
    pub const FEATURE_EXTRACTION: i32 = 2003;

    /// Microphone capture failed
    pub const CAPTURE_FAILED: i32 = 2004;

    /// A speech-analysis cycle is already running
    pub const ALREADY_ANALYZING: i32 = 2005;

    /// Unclassified failure inside the speech cycle
    pub const UNKNOWN: i32 = 2006;
}

/// Log a speech error with structured context
///
/// This function logs speech-cycle errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_speech_error(err: &SpeechError, context: &str) {
    error!(
        "Speech error in {}: code={}, component=SpeechCycle, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Speech-analysis errors
///
/// These errors cover the on-demand teacher speech cycle: microphone
/// capture, cloud transcription, feature extraction, and the concurrency
/// contention surfaced by the trigger endpoint.
///
/// Error code range: 2001-2006
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// Recording contained no intelligible speech
    Unintelligible,

    /// Transcription service could not be reached or rejected the request
    ServiceUnavailable { reason: String },

    /// Feature extraction failed on the recorded clip
    FeatureExtraction { reason: String },

    /// Microphone capture failed
    CaptureFailed { reason: String },

    /// A speech-analysis cycle is already running
    AlreadyAnalyzing,

    /// Unclassified failure inside the speech cycle
    Unknown { detail: String },
}

impl ErrorCode for SpeechError {
    fn code(&self) -> i32 {
        match self {
            SpeechError::Unintelligible => SpeechErrorCodes::UNINTELLIGIBLE,
            SpeechError::ServiceUnavailable { .. } => SpeechErrorCodes::SERVICE_UNAVAILABLE,
            SpeechError::FeatureExtraction { .. } => SpeechErrorCodes::FEATURE_EXTRACTION,
            SpeechError::CaptureFailed { .. } => SpeechErrorCodes::CAPTURE_FAILED,
            SpeechError::AlreadyAnalyzing => SpeechErrorCodes::ALREADY_ANALYZING,
            SpeechError::Unknown { .. } => SpeechErrorCodes::UNKNOWN,
        }
    }

    fn message(&self) -> String {
        match self {
            SpeechError::Unintelligible => {
                "Could not understand the recording. Speak clearly and check your microphone."
                    .to_string()
            }
            SpeechError::ServiceUnavailable { reason } => {
                format!("Transcription service unavailable: {}", reason)
            }
            SpeechError::FeatureExtraction { reason } => {
                format!("Feature extraction failed: {}", reason)
            }
            SpeechError::CaptureFailed { reason } => {
                format!("Microphone capture failed: {}", reason)
            }
            SpeechError::AlreadyAnalyzing => {
                "Already analyzing speech. Please wait.".to_string()
            }
            SpeechError::Unknown { detail } => {
                format!("Unexpected speech-analysis failure: {}", detail)
            }
        }
    }
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SpeechError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SpeechError {}

impl From<std::io::Error> for SpeechError {
    fn from(err: std::io::Error) -> Self {
        SpeechError::CaptureFailed {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_codes() {
        assert_eq!(
            SpeechError::Unintelligible.code(),
            SpeechErrorCodes::UNINTELLIGIBLE
        );
        assert_eq!(
            SpeechError::ServiceUnavailable {
                reason: "test".to_string()
            }
            .code(),
            SpeechErrorCodes::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            SpeechError::FeatureExtraction {
                reason: "test".to_string()
            }
            .code(),
            SpeechErrorCodes::FEATURE_EXTRACTION
        );
        assert_eq!(
            SpeechError::CaptureFailed {
                reason: "test".to_string()
            }
            .code(),
            SpeechErrorCodes::CAPTURE_FAILED
        );
        assert_eq!(
            SpeechError::AlreadyAnalyzing.code(),
            SpeechErrorCodes::ALREADY_ANALYZING
        );
        assert_eq!(
            SpeechError::Unknown {
                detail: "test".to_string()
            }
            .code(),
            SpeechErrorCodes::UNKNOWN
        );
    }

    #[test]
    fn test_speech_error_messages() {
        let err = SpeechError::AlreadyAnalyzing;
        assert_eq!(err.message(), "Already analyzing speech. Please wait.");

        let err = SpeechError::ServiceUnavailable {
            reason: "connection refused".to_string(),
        };
        assert!(err.message().contains("connection refused"));

        let err = SpeechError::Unintelligible;
        assert!(err.message().contains("microphone"));

        let err = SpeechError::CaptureFailed {
            reason: "no input device".to_string(),
        };
        assert_eq!(err.message(), "Microphone capture failed: no input device");
    }

    #[test]
    fn test_speech_error_display() {
        let err = SpeechError::AlreadyAnalyzing;
        let display = format!("{}", err);
        assert!(display.contains("SpeechError"));
        assert!(display.contains(&err.code().to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("device busy");
        let speech_err: SpeechError = io_err.into();
        match speech_err {
            SpeechError::CaptureFailed { reason } => {
                assert!(reason.contains("device busy"));
            }
            _ => panic!("Expected CaptureFailed"),
        }
    }
}
