use glance_selection::{MenuAction, OverlayMount, Point, Rect, SelectionInfo, Surface};

/// Page stand-in for the terminal: text passed on the command line or at
/// the prompt becomes the "selection", mounting an overlay starts a panel.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    selection: Option<SelectionInfo>,
}

impl TerminalSurface {
    pub fn select(&mut self, text: &str) {
        self.selection = Some(SelectionInfo {
            text: text.to_string(),
            rect: Rect::default(),
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}

impl Surface for TerminalSurface {
    fn current_selection(&self) -> Option<SelectionInfo> {
        self.selection.clone()
    }

    fn scroll_offset(&self) -> Point {
        Point::default()
    }

    fn show_menu(&mut self, _position: Point, actions: &[MenuAction]) {
        tracing::trace!(actions = actions.len(), "Menu shown");
    }

    fn remove_menu(&mut self) {
        tracing::trace!("Menu removed");
    }

    fn mount_overlay(&mut self, mount: &OverlayMount) {
        tracing::debug!(generation = mount.generation, url = %mount.url, "Panel mounted");
    }

    fn unmount_overlay(&mut self, generation: u64) {
        tracing::debug!(generation, "Panel unmounted");
    }
}
