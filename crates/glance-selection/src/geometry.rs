//! Page-coordinate geometry for the menu and the overlay.

use serde::{Deserialize, Serialize};

/// Vertical distance between the menu and the top of the selection.
pub const MENU_OFFSET_Y: f64 = 30.0;

/// Gap between the selection's bottom edge and the overlay.
pub const OVERLAY_GAP_Y: f64 = 10.0;

pub const OVERLAY_WIDTH: f64 = 400.0;
pub const OVERLAY_HEIGHT: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rectangle in viewport coordinates, as reported for a selection range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.top + self.height)
    }
}

/// Where the menu goes for a selection, in page coordinates.
pub fn menu_position(selection: &Rect, scroll: Point) -> Point {
    selection
        .top_left()
        .offset(scroll.x, scroll.y - MENU_OFFSET_Y)
}

/// The selection's bottom-left corner in page coordinates.
pub fn anchor_point(selection: &Rect, scroll: Point) -> Point {
    selection.bottom_left().offset(scroll.x, scroll.y)
}

/// The overlay's frame for a captured anchor point.
pub fn overlay_frame(anchor: Point) -> Rect {
    Rect::new(anchor.x, anchor.y + OVERLAY_GAP_Y, OVERLAY_WIDTH, OVERLAY_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_sits_above_selection() {
        let rect = Rect::new(120.0, 200.0, 80.0, 18.0);
        let position = menu_position(&rect, Point::new(0.0, 1000.0));
        assert_eq!(position, Point::new(120.0, 1170.0));
    }

    #[test]
    fn test_overlay_hangs_below_anchor() {
        let rect = Rect::new(120.0, 200.0, 80.0, 18.0);
        let anchor = anchor_point(&rect, Point::new(5.0, 50.0));
        assert_eq!(anchor, Point::new(125.0, 268.0));

        let frame = overlay_frame(anchor);
        assert_eq!(frame, Rect::new(125.0, 278.0, 400.0, 500.0));
    }
}
