//! Terminal host for Glance panels.
//!
//! Plays the page: text handed to [`Host::open`] goes through the same
//! selection controller a browser page uses, and the panel it mounts is
//! launched from the overlay's load URL.

use std::sync::Arc;

use colored::Colorize;
use glance_application::{Panel, PanelContext, Reply, TranscriptEntry};
use glance_core::config::AppConfig;
use glance_core::handoff::OverlayRequest;
use glance_core::session::{Mode, Role};
use glance_core::{GlanceError, Result};
use glance_infrastructure::secret_service::SecretServiceImpl;
use glance_interaction::{CompletionAgent, OpenAIChatAgent};
use glance_selection::{EventTarget, SelectionController};
use url::Url;

use crate::render::TerminalRenderer;
use crate::surface::TerminalSurface;

pub struct Host {
    controller: SelectionController<TerminalSurface>,
    secrets: SecretServiceImpl,
    config: AppConfig,
    panel: Option<(u64, Panel)>,
    seen: usize,
}

impl Host {
    pub fn new(config: AppConfig, secrets: SecretServiceImpl, panel_url: Url) -> Self {
        Self {
            controller: SelectionController::new(TerminalSurface::default(), panel_url),
            secrets,
            config,
            panel: None,
            seen: 0,
        }
    }

    pub fn has_panel(&self) -> bool {
        self.panel.is_some()
    }

    /// Selects `text`, picks the menu action for `mode` and runs the new
    /// panel's initial question. Any open panel is replaced.
    pub async fn open(&mut self, text: &str, mode: Mode) -> Result<()> {
        self.controller.surface_mut().select(text);
        self.controller.on_mouseup(EventTarget::Page);
        let Some(overlay) = self.controller.on_menu_action(mode) else {
            println!("{}", "Nothing selected.".bright_black());
            return Ok(());
        };
        let generation = overlay.generation();
        let context = PanelContext::new(generation, overlay.cancellation_token());
        let request = OverlayRequest::from_url(overlay.url())?;

        self.controller.surface_mut().clear_selection();
        self.controller.on_mouseup(EventTarget::Page);

        let completion = self.config.completion.clone();
        let panel = Panel::launch(
            request,
            &self.secrets,
            self.config.clone(),
            Arc::new(TerminalRenderer),
            context,
            move |credentials| {
                let agent = OpenAIChatAgent::from_config(&completion, credentials)?;
                Ok(Arc::new(agent) as Arc<dyn CompletionAgent>)
            },
        )
        .await?;

        self.seen = 0;
        let panel = &self.panel.insert((generation, panel)).1;
        let result = panel.start().await.map(Some);
        self.finish(result).await;
        Ok(())
    }

    /// Sends text typed at the prompt to the open panel.
    pub async fn ask(&mut self, text: &str) {
        let Some(orchestrator) = self.panel.as_ref().and_then(|(_, panel)| panel.orchestrator())
        else {
            self.no_panel();
            return;
        };
        let result = orchestrator.submit_manual(text).await;
        self.finish(result).await;
    }

    /// Re-asks the `number`th (1-based) suggested follow-up.
    pub async fn choose_followup(&mut self, number: usize) {
        let Some(orchestrator) = self.panel.as_ref().and_then(|(_, panel)| panel.orchestrator())
        else {
            self.no_panel();
            return;
        };
        let followups = orchestrator.followups().await;
        let Some(text) = number.checked_sub(1).and_then(|index| followups.get(index)) else {
            println!("{}", format!("No follow-up #{number}.").yellow());
            return;
        };
        let result = orchestrator.on_followup_chosen(text).await.map(Some);
        self.finish(result).await;
    }

    /// Closes the open panel, if any.
    pub fn close(&mut self) {
        if let Some((generation, _)) = self.panel.take() {
            self.controller.close_overlay(generation);
            println!("{}", "Panel closed.".bright_black());
        }
    }

    async fn finish(&mut self, result: Result<Option<Reply>>) {
        self.print_updates().await;
        match result {
            Ok(_) => {}
            Err(GlanceError::Busy) => {
                println!("{}", "A request is still running.".yellow());
            }
            // Already shown in the transcript
            Err(err) => tracing::debug!(error = %err, "Panel request ended with error"),
        }
    }

    async fn print_updates(&mut self) {
        let Some((_, panel)) = self.panel.as_ref() else {
            return;
        };
        let transcript = panel.transcript().await;
        for entry in transcript.since(self.seen) {
            print_entry(entry);
        }
        self.seen = transcript.len();

        if let Some(orchestrator) = panel.orchestrator() {
            let followups = orchestrator.followups().await;
            if !followups.is_empty() {
                println!("{}", "Follow-ups:".bright_yellow());
                for (index, followup) in followups.iter().enumerate() {
                    println!("  {}", format!("{}. {followup}", index + 1).yellow());
                }
            }
        }
    }

    fn no_panel(&self) {
        println!(
            "{}",
            "No open panel. Use /open <text> or /brief <text>.".bright_black()
        );
    }
}

fn print_entry(entry: &TranscriptEntry) {
    match entry.role {
        Role::User => println!("{}", format!("> {}", entry.body).green()),
        Role::Assistant => {
            for line in entry.body.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
        Role::System => println!("{}", entry.body.red()),
    }
}
