//! Panel bootstrap.
//!
//! A panel reads credentials exactly once when it is instantiated. Without
//! them it shows a fixed configuration message and never builds an agent,
//! so no request can be sent.

use std::sync::Arc;

use glance_core::config::AppConfig;
use glance_core::handoff::OverlayRequest;
use glance_core::secret::{CredentialService, Credentials};
use glance_core::session::Role;
use glance_core::{GlanceError, Result};
use glance_interaction::CompletionAgent;

use crate::orchestrator::{ConversationOrchestrator, PanelContext};
use crate::render::Renderer;
use crate::transcript::{Transcript, TranscriptEntry};

/// Fixed text shown when credentials are missing.
pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "\u{274c} Missing API key or Project ID. Please configure it.";

/// A launched panel.
pub enum Panel {
    /// Credentials are missing; the transcript holds only the fixed message.
    Unconfigured { transcript: Transcript },
    Ready(ConversationOrchestrator),
}

impl Panel {
    /// Reads credentials and builds the orchestrator.
    ///
    /// `agent_factory` is only called when complete credentials exist.
    pub async fn launch<F>(
        request: OverlayRequest,
        credentials: &dyn CredentialService,
        config: AppConfig,
        renderer: Arc<dyn Renderer>,
        context: PanelContext,
        agent_factory: F,
    ) -> Result<Self>
    where
        F: FnOnce(Credentials) -> Result<Arc<dyn CompletionAgent>>,
    {
        let loaded = match credentials.load_credentials().await {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::error!(error = %err, "Failed to read credential store");
                None
            }
        };

        let Some(credentials) = loaded else {
            tracing::warn!(generation = context.generation, "Panel launched without credentials");
            let mut transcript = Transcript::new();
            transcript.push(TranscriptEntry::new(
                Role::System,
                renderer.render(MISSING_CREDENTIALS_MESSAGE),
            ));
            return Ok(Panel::Unconfigured { transcript });
        };

        let agent = agent_factory(credentials)?;
        Ok(Panel::Ready(ConversationOrchestrator::new(
            agent, renderer, config, request, context,
        )))
    }

    pub fn orchestrator(&self) -> Option<&ConversationOrchestrator> {
        match self {
            Panel::Ready(orchestrator) => Some(orchestrator),
            Panel::Unconfigured { .. } => None,
        }
    }

    /// Runs the initial question. An unconfigured panel reports
    /// [`GlanceError::MissingCredentials`] without doing anything.
    pub async fn start(&self) -> Result<crate::orchestrator::Reply> {
        match self {
            Panel::Ready(orchestrator) => orchestrator.start().await,
            Panel::Unconfigured { .. } => Err(GlanceError::MissingCredentials),
        }
    }

    pub async fn transcript(&self) -> Transcript {
        match self {
            Panel::Ready(orchestrator) => orchestrator.transcript().await,
            Panel::Unconfigured { transcript } => transcript.clone(),
        }
    }
}
