//! Domain layer for Glance: conversation sessions, question classification,
//! prompt construction and reply post-processing.

pub mod config;
pub mod error;
pub mod followup;
pub mod handoff;
pub mod postprocess;
pub mod prompt;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{GlanceError, Result};
