//! Engine module housing the cycle scheduler.
//!
//! `PulseEngine` owns the shared dashboard state and the collaborator
//! handles, runs the continuous student cycle, and arbitrates the
//! on-demand speech cycle through the busy-flag test-and-set.

pub mod core;

pub use core::PulseEngine;
