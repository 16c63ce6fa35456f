//! The controller's view of the host page.
//!
//! [`Surface`] is the only way the controller reads the live selection or
//! touches the page. Everything it draws is a projection of
//! [`ControllerState`](crate::ControllerState).

use glance_core::session::Mode;
use url::Url;

use crate::geometry::{Point, Rect};

/// Where a pointer event landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// Inside the action menu.
    Menu,
    /// Inside the live overlay.
    Overlay,
    /// Anywhere else on the page.
    Page,
}

/// The live browser selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub text: String,
    /// Bounding rectangle in viewport coordinates.
    pub rect: Rect,
}

/// One entry of the action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuAction {
    pub label: &'static str,
    pub mode: Mode,
}

pub const MENU_ACTIONS: [MenuAction; 2] = [
    MenuAction {
        label: "Explain briefly",
        mode: Mode::Short,
    },
    MenuAction {
        label: "Explain in depth",
        mode: Mode::Long,
    },
];

/// Everything the page needs to mount one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMount {
    pub generation: u64,
    pub frame: Rect,
    /// Panel load target carrying `q` and `mode`.
    pub url: Url,
}

/// Host page operations used by the controller.
///
/// `show_menu` must install a guard on the menu's own press events so
/// that pressing an action does not clear the page selection.
pub trait Surface {
    fn current_selection(&self) -> Option<SelectionInfo>;

    fn scroll_offset(&self) -> Point;

    fn show_menu(&mut self, position: Point, actions: &[MenuAction]);

    fn remove_menu(&mut self);

    fn mount_overlay(&mut self, mount: &OverlayMount);

    fn unmount_overlay(&mut self, generation: u64);
}
