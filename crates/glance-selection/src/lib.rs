//! Selection/overlay controller for the Glance page integration.
//!
//! Watches the user's text selection, offers an action menu next to it
//! and keeps exactly one conversation overlay alive.

pub mod controller;
pub mod geometry;
pub mod overlay;
pub mod surface;

pub use controller::{ControllerState, Menu, SelectionController};
pub use geometry::{Point, Rect};
pub use overlay::{OverlayHandle, SelectionSnapshot};
pub use surface::{EventTarget, MENU_ACTIONS, MenuAction, OverlayMount, SelectionInfo, Surface};
