//! Selection/overlay controller.
//!
//! Converts pointer events into at most one action menu and at most one
//! overlay. The page is a projection of [`ControllerState`]; every DOM
//! change goes through the [`Surface`].

use std::mem;

use glance_core::handoff::OverlayRequest;
use glance_core::session::Mode;
use url::Url;

use crate::geometry::{Point, anchor_point, menu_position, overlay_frame};
use crate::overlay::{OverlayHandle, SelectionSnapshot};
use crate::surface::{EventTarget, MENU_ACTIONS, OverlayMount, SelectionInfo, Surface};

/// A visible action menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub position: Point,
    /// Selection as it was when the menu appeared. Used when the live
    /// selection is gone by the time an action fires.
    pub captured: SelectionSnapshot,
}

#[derive(Debug, Clone, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    MenuShown {
        menu: Menu,
    },
    /// A new selection made while the overlay is open shows a menu next to it.
    OverlayOpen {
        overlay: OverlayHandle,
        menu: Option<Menu>,
    },
}

impl ControllerState {
    fn from_parts(overlay: Option<OverlayHandle>, menu: Option<Menu>) -> Self {
        match (overlay, menu) {
            (Some(overlay), menu) => ControllerState::OverlayOpen { overlay, menu },
            (None, Some(menu)) => ControllerState::MenuShown { menu },
            (None, None) => ControllerState::Idle,
        }
    }

    fn into_parts(self) -> (Option<OverlayHandle>, Option<Menu>) {
        match self {
            ControllerState::Idle => (None, None),
            ControllerState::MenuShown { menu } => (None, Some(menu)),
            ControllerState::OverlayOpen { overlay, menu } => (Some(overlay), menu),
        }
    }

    pub fn overlay(&self) -> Option<&OverlayHandle> {
        match self {
            ControllerState::OverlayOpen { overlay, .. } => Some(overlay),
            _ => None,
        }
    }

    pub fn menu(&self) -> Option<&Menu> {
        match self {
            ControllerState::MenuShown { menu } => Some(menu),
            ControllerState::OverlayOpen { menu, .. } => menu.as_ref(),
            ControllerState::Idle => None,
        }
    }
}

pub struct SelectionController<S: Surface> {
    surface: S,
    panel_url: Url,
    state: ControllerState,
    ignore_next_mouseup: bool,
    last_generation: u64,
}

impl<S: Surface> SelectionController<S> {
    /// `panel_url` is the overlay's load target without a query.
    pub fn new(surface: S, panel_url: Url) -> Self {
        Self {
            surface,
            panel_url,
            state: ControllerState::Idle,
            ignore_next_mouseup: false,
            last_generation: 0,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn overlay(&self) -> Option<&OverlayHandle> {
        self.state.overlay()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn ignores_next_mouseup(&self) -> bool {
        self.ignore_next_mouseup
    }

    /// Mouseup anywhere on the page.
    ///
    /// Shows (or moves) the menu for a non-empty selection and removes it
    /// otherwise. Mouseups inside the menu are ignored, and so is the
    /// first mouseup after a menu action.
    pub fn on_mouseup(&mut self, target: EventTarget) {
        if target == EventTarget::Menu {
            return;
        }
        if mem::take(&mut self.ignore_next_mouseup) {
            tracing::trace!("Ignoring mouseup that followed a menu action");
            return;
        }

        let (overlay, menu) = mem::take(&mut self.state).into_parts();
        if menu.is_some() {
            self.surface.remove_menu();
        }

        let menu = self.live_selection().map(|selection| {
            let scroll = self.surface.scroll_offset();
            let position = menu_position(&selection.rect, scroll);
            self.surface.show_menu(position, &MENU_ACTIONS);
            tracing::debug!(x = position.x, y = position.y, "Menu shown");
            Menu {
                position,
                captured: SelectionSnapshot {
                    anchor: anchor_point(&selection.rect, scroll),
                    text: selection.text,
                },
            }
        });

        self.state = ControllerState::from_parts(overlay, menu);
    }

    /// Document-level click, delivered in the capture phase before any
    /// handler inside the overlay or the menu.
    ///
    /// Destroys the overlay unless the click landed on the overlay or the
    /// menu. Removes the menu on a click elsewhere once the selection is
    /// gone; the click that ends a drag-selection keeps it.
    pub fn on_click(&mut self, target: EventTarget) {
        if target != EventTarget::Page {
            return;
        }

        let (overlay, menu) = mem::take(&mut self.state).into_parts();
        if let Some(overlay) = overlay {
            tracing::debug!(generation = overlay.generation(), "Outside click closes overlay");
            self.teardown(&overlay);
        }

        let menu = match menu {
            Some(menu) if self.live_selection().is_none() => {
                self.surface.remove_menu();
                None
            }
            menu => menu,
        };

        self.state = ControllerState::from_parts(None, menu);
    }

    /// A menu action was clicked.
    ///
    /// Replaces any live overlay with a new one for the current selection
    /// and returns it. Without a visible menu nothing happens.
    pub fn on_menu_action(&mut self, mode: Mode) -> Option<&OverlayHandle> {
        let (previous, menu) = mem::take(&mut self.state).into_parts();
        let Some(menu) = menu else {
            self.state = ControllerState::from_parts(previous, None);
            return None;
        };

        self.ignore_next_mouseup = true;

        let snapshot = match self.live_selection() {
            Some(selection) => SelectionSnapshot {
                anchor: anchor_point(&selection.rect, self.surface.scroll_offset()),
                text: selection.text,
            },
            None => menu.captured,
        };

        if let Some(previous) = previous {
            tracing::debug!(generation = previous.generation(), "Replacing overlay");
            self.teardown(&previous);
        }

        self.last_generation += 1;
        let request = OverlayRequest::new(snapshot.text.clone(), mode);
        let mount = OverlayMount {
            generation: self.last_generation,
            frame: overlay_frame(snapshot.anchor),
            url: request.to_url(&self.panel_url),
        };
        self.surface.mount_overlay(&mount);
        self.surface.remove_menu();

        tracing::info!(
            generation = mount.generation,
            %mode,
            chars = snapshot.text.chars().count(),
            "Overlay opened"
        );

        let overlay = OverlayHandle::new(mount.generation, snapshot, request, mount.frame, mount.url);
        self.state = ControllerState::OverlayOpen {
            overlay,
            menu: None,
        };
        self.state.overlay()
    }

    /// Closes the overlay of `generation` from the panel itself. A stale
    /// generation is ignored. Returns whether an overlay was closed.
    pub fn close_overlay(&mut self, generation: u64) -> bool {
        let (overlay, menu) = mem::take(&mut self.state).into_parts();
        let (overlay, closed) = match overlay {
            Some(overlay) if overlay.generation() == generation => {
                self.teardown(&overlay);
                (None, true)
            }
            other => (other, false),
        };
        self.state = ControllerState::from_parts(overlay, menu);
        closed
    }

    fn teardown(&mut self, overlay: &OverlayHandle) {
        overlay.destroy();
        self.surface.unmount_overlay(overlay.generation());
    }

    fn live_selection(&self) -> Option<SelectionInfo> {
        self.surface
            .current_selection()
            .map(|selection| SelectionInfo {
                text: selection.text.trim().to_string(),
                rect: selection.rect,
            })
            .filter(|selection| !selection.text.is_empty())
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
