use glance_application::Renderer;

/// Renders model text for a terminal.
///
/// Control characters other than newlines and tabs are dropped so a reply
/// cannot smuggle escape sequences into the user's terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect()
    }
}
