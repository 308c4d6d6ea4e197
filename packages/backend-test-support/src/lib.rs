//! Backend test support utilities
//!
//! Shared by the backend's integration test binaries: unified logging
//! initialization and assertions for the JSON response envelope.

pub mod envelope;
pub mod logging;
