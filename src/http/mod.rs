//! Dashboard HTTP surface.
//!
//! A lightweight Axum server exposing the pull-based snapshot (`/data`),
//! the speech-analysis trigger (`/analyze-speech`), and a health probe.
//! The handlers only read or test-and-set the shared snapshot; they never
//! block on analysis work.

mod routes;

pub use routes::{build_router, run_http_server, AppState};
