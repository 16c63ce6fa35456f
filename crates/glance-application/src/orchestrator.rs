//! Conversation orchestrator.
//!
//! Turns one submitted question into a shaped completion request, keeps
//! the model-facing [`ConversationSession`] and the user-facing
//! [`Transcript`] in lockstep, and derives follow-up suggestions.
//!
//! Submissions are serialized: while one pipeline run is in flight any
//! other entry point fails fast with [`GlanceError::Busy`] and leaves the
//! session untouched. The user turn enters the session before the request
//! goes out; a failed call adds no assistant turn after it.
//! Closing the overlay cancels the panel's token; a pending request is
//! dropped and its result discarded as [`GlanceError::Detached`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glance_core::config::AppConfig;
use glance_core::followup::parse_followups;
use glance_core::handoff::OverlayRequest;
use glance_core::postprocess::post_process;
use glance_core::prompt::{
    PromptTemplate, SYSTEM_PROMPT, build_prompt, classify, followup_request,
};
use glance_core::session::{Classification, ConversationSession, Mode, Role, Turn};
use glance_core::{GlanceError, Result};
use glance_interaction::{CompletionAgent, CompletionRequest};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::render::Renderer;
use crate::transcript::{Transcript, TranscriptEntry};

/// Identity of the overlay a panel belongs to.
#[derive(Debug, Clone)]
pub struct PanelContext {
    /// Monotonic overlay generation assigned by the selection controller.
    pub generation: u64,
    /// Cancelled when the overlay is destroyed.
    pub cancel: CancellationToken,
}

impl PanelContext {
    pub fn new(generation: u64, cancel: CancellationToken) -> Self {
        Self { generation, cancel }
    }

    /// A context not tied to any overlay, for hosts without one.
    pub fn standalone() -> Self {
        Self::new(0, CancellationToken::new())
    }
}

/// Result of one successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub classification: Classification,
    pub template: PromptTemplate,
    /// Assistant turn exactly as stored in the session.
    pub turn: Turn,
    /// Post-processed and rendered text as shown in the transcript.
    pub display: String,
    pub followups: Vec<String>,
}

/// Releases the in-flight flag when a pipeline run ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates one panel's conversation.
pub struct ConversationOrchestrator {
    agent: Arc<dyn CompletionAgent>,
    renderer: Arc<dyn Renderer>,
    config: AppConfig,
    request: OverlayRequest,
    context: PanelContext,
    session: Mutex<ConversationSession>,
    transcript: Mutex<Transcript>,
    followups: Mutex<Vec<String>>,
    last_classification: Mutex<Classification>,
    in_flight: AtomicBool,
}

impl ConversationOrchestrator {
    pub fn new(
        agent: Arc<dyn CompletionAgent>,
        renderer: Arc<dyn Renderer>,
        config: AppConfig,
        request: OverlayRequest,
        context: PanelContext,
    ) -> Self {
        let session = ConversationSession::new(request.mode);
        tracing::info!(
            session_id = %session.id(),
            created_at = %session.created_at(),
            generation = context.generation,
            mode = %request.mode,
            "Conversation session created"
        );
        Self {
            agent,
            renderer,
            config,
            request,
            context,
            session: Mutex::new(session),
            transcript: Mutex::new(Transcript::new()),
            followups: Mutex::new(Vec::new()),
            last_classification: Mutex::new(Classification::Definitional),
            in_flight: AtomicBool::new(false),
        }
    }

    // ============================================================================
    // Entry points
    // ============================================================================

    /// Answers the question the overlay was opened with, in the session's mode.
    ///
    /// The initial question is not echoed into the transcript.
    pub async fn start(&self) -> Result<Reply> {
        let _guard = self.begin()?;
        let question = self.request.question.clone();
        self.run(&question, self.request.mode).await
    }

    /// Submits text typed by the user. Blank input is ignored.
    pub async fn submit_manual(&self, text: &str) -> Result<Option<Reply>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let _guard = self.begin()?;
        self.echo_user(text).await;
        self.run(text, self.request.mode).await.map(Some)
    }

    /// Re-enters the pipeline with a chosen follow-up. Follow-ups always
    /// expand, so the mode is `long` whatever the session mode is.
    pub async fn on_followup_chosen(&self, text: &str) -> Result<Reply> {
        let _guard = self.begin()?;
        self.followups.lock().await.clear();
        self.echo_user(text).await;
        self.run(text, Mode::Long).await
    }

    /// Appends the system turn (once) and a user turn carrying
    /// `prompt_text`, then sends the full history. The assistant reply is
    /// appended on success; on failure the user turn stays and nothing
    /// else is added. The token ceiling follows the session mode.
    pub async fn submit(&self, prompt_text: &str) -> Result<Turn> {
        let _guard = self.begin()?;
        self.submit_inner(prompt_text, self.request.mode).await
    }

    /// Asks the model for up to three follow-up questions about the last
    /// reply. Failures are logged and yield an empty list.
    pub async fn derive_followups(&self) -> Result<Vec<String>> {
        let _guard = self.begin()?;
        let classification = *self.last_classification.lock().await;
        Ok(self.derive_inner(classification).await)
    }

    /// Cancels the panel: pending requests are dropped, later calls fail
    /// with [`GlanceError::Detached`].
    pub fn close(&self) {
        self.context.cancel.cancel();
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn mode(&self) -> Mode {
        self.request.mode
    }

    pub fn generation(&self) -> u64 {
        self.context.generation
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.context.cancel.is_cancelled()
    }

    pub async fn transcript(&self) -> Transcript {
        self.transcript.lock().await.clone()
    }

    pub async fn followups(&self) -> Vec<String> {
        self.followups.lock().await.clone()
    }

    pub async fn session(&self) -> ConversationSession {
        self.session.lock().await.clone()
    }

    // ============================================================================
    // Pipeline
    // ============================================================================

    fn begin(&self) -> Result<InFlight<'_>> {
        if self.is_closed() {
            return Err(self.detached());
        }
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::debug!(generation = self.context.generation, "Submission rejected: busy");
                GlanceError::Busy
            })?;
        Ok(InFlight(&self.in_flight))
    }

    async fn run(&self, text: &str, mode: Mode) -> Result<Reply> {
        let classification = classify(text);
        let template = PromptTemplate::select(mode, classification);
        tracing::info!(
            generation = self.context.generation,
            %classification,
            %template,
            %mode,
            "Submitting question"
        );

        self.followups.lock().await.clear();
        *self.last_classification.lock().await = classification;

        let turn = match self.shape_and_submit(text, mode, classification).await {
            Ok(turn) => turn,
            Err(err) => {
                if !err.is_detached() {
                    tracing::error!(generation = self.context.generation, error = %err, "Completion failed");
                    self.append(Role::System, &err.to_string()).await;
                }
                return Err(err);
            }
        };

        let processed = post_process(&turn.content, classification);
        let display = self.append(Role::Assistant, &processed).await;

        let followups = if mode.derives_followups() {
            self.derive_inner(classification).await
        } else {
            Vec::new()
        };

        Ok(Reply {
            classification,
            template,
            turn,
            display,
            followups,
        })
    }

    async fn shape_and_submit(
        &self,
        text: &str,
        mode: Mode,
        classification: Classification,
    ) -> Result<Turn> {
        let prompt = build_prompt(text, mode, classification)?;
        self.submit_inner(&prompt, mode).await
    }

    async fn submit_inner(&self, prompt_text: &str, mode: Mode) -> Result<Turn> {
        let messages = self
            .session
            .lock()
            .await
            .begin_exchange(SYSTEM_PROMPT, prompt_text);

        let request = CompletionRequest {
            model: self.config.completion.model.clone(),
            messages,
            max_tokens: self.config.limits.max_tokens(mode),
            temperature: self.config.completion.temperature,
        };
        let content = self.call(request).await?;

        let turn = Turn::assistant(content);
        self.session.lock().await.push_assistant(turn.content.clone());
        Ok(turn)
    }

    async fn derive_inner(&self, classification: Classification) -> Vec<String> {
        let suggestions = match self.request_followups(classification).await {
            Ok(suggestions) => suggestions,
            Err(err) => {
                tracing::warn!(
                    generation = self.context.generation,
                    error = %err,
                    "Follow-up derivation failed"
                );
                Vec::new()
            }
        };
        *self.followups.lock().await = suggestions.clone();
        suggestions
    }

    async fn request_followups(&self, classification: Classification) -> Result<Vec<String>> {
        let messages = {
            let session = self.session.lock().await;
            if session.last_assistant().is_none() {
                return Ok(Vec::new());
            }
            session.request_with_scratch(followup_request(classification)?)
        };

        let request = CompletionRequest {
            model: self.config.completion.followup_model().to_string(),
            messages,
            max_tokens: self.config.limits.followup_max_tokens,
            temperature: self.config.completion.temperature,
        };
        let reply = self.call(request).await?;
        Ok(parse_followups(&reply))
    }

    /// Sends a request unless the overlay closes first.
    async fn call(&self, request: CompletionRequest) -> Result<String> {
        let result = tokio::select! {
            biased;
            _ = self.context.cancel.cancelled() => return Err(self.detached()),
            result = self.agent.complete(request) => result,
        };
        if self.is_closed() {
            tracing::debug!(generation = self.context.generation, "Discarding response for closed overlay");
            return Err(self.detached());
        }
        result
    }

    async fn echo_user(&self, text: &str) {
        self.append(Role::User, text).await;
    }

    async fn append(&self, role: Role, text: &str) -> String {
        let body = self.renderer.render(text);
        self.transcript
            .lock()
            .await
            .push(TranscriptEntry::new(role, body.clone()));
        body
    }

    fn detached(&self) -> GlanceError {
        GlanceError::Detached {
            generation: self.context.generation,
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod orchestrator_test;
