// Shared-state error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// State error code constants
///
/// Error code range: 2101
pub struct StateErrorCodes {}

impl StateErrorCodes {
    /// The snapshot mutex was poisoned by a panicking writer
    pub const LOCK_POISONED: i32 = 2101;
}

/// Log a state error with structured context
pub fn log_state_error(err: &StateError, context: &str) {
    error!(
        "State error in {}: code={}, component=DashboardState, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors touching the shared dashboard snapshot
///
/// The snapshot is guarded by a single mutex; the only failure mode is
/// poisoning, which surfaces here instead of panicking in the cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The snapshot mutex was poisoned by a panicking writer
    LockPoisoned { component: String },
}

impl ErrorCode for StateError {
    fn code(&self) -> i32 {
        match self {
            StateError::LockPoisoned { .. } => StateErrorCodes::LOCK_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            StateError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StateError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for StateError {}
