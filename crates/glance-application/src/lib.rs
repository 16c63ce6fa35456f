//! Conversation orchestration for a Glance panel.

pub mod orchestrator;
pub mod panel;
pub mod render;
pub mod transcript;

pub use orchestrator::{ConversationOrchestrator, PanelContext, Reply};
pub use panel::{MISSING_CREDENTIALS_MESSAGE, Panel};
pub use render::{HtmlEscapeRenderer, Renderer};
pub use transcript::{Transcript, TranscriptEntry};
