//! Session domain module.
//!
//! # Module Structure
//!
//! - `turn`: Conversation turn types (`Role`, `Turn`)
//! - `mode`: Response-length mode and question classification (`Mode`, `Classification`)
//! - `model`: The per-overlay turn history (`ConversationSession`)

mod mode;
mod model;
mod turn;

// Re-export public API
pub use mode::{Classification, Mode};
pub use model::ConversationSession;
pub use turn::{Role, Turn};
