use glance_core::handoff::OverlayRequest;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::geometry::{Point, Rect};

/// Immutable capture of the selection taken when a menu action fires.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub text: String,
    /// Bottom-left of the selection in page coordinates.
    pub anchor: Point,
}

/// The single live overlay.
///
/// Dropping out of the controller's state does not end the panel by
/// itself; [`OverlayHandle::destroy`] cancels the token the panel's
/// orchestrator listens on.
#[derive(Debug, Clone)]
pub struct OverlayHandle {
    generation: u64,
    snapshot: SelectionSnapshot,
    request: OverlayRequest,
    frame: Rect,
    url: Url,
    cancel: CancellationToken,
}

impl OverlayHandle {
    pub(crate) fn new(
        generation: u64,
        snapshot: SelectionSnapshot,
        request: OverlayRequest,
        frame: Rect,
        url: Url,
    ) -> Self {
        Self {
            generation,
            snapshot,
            request,
            frame,
            url,
            cancel: CancellationToken::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> &SelectionSnapshot {
        &self.snapshot
    }

    pub fn request(&self) -> &OverlayRequest {
        &self.request
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Token cancelled when this overlay is destroyed.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn destroy(&self) {
        self.cancel.cancel();
    }
}
