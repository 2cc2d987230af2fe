//! Geometry types read from the host layout engine
//!
//! All values are CSS pixels. `Rect` is used both for bounding client
//! rectangles (viewport coordinates) and for offset boxes (coordinates
//! relative to the offset parent).

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Same size, moved by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }
}

/// The scrolled window viewport in page coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_x: f64, scroll_y: f64, width: f64, height: f64) -> Self {
        Self { scroll_x, scroll_y, width, height }
    }

    /// True when `page_rect` overlaps the viewport on both axes.
    ///
    /// Edges that merely touch do not count as overlap.
    pub fn overlaps(&self, page_rect: &Rect) -> bool {
        page_rect.top < self.scroll_y + self.height
            && page_rect.left < self.scroll_x + self.width
            && page_rect.bottom() > self.scroll_y
            && page_rect.right() > self.scroll_x
    }
}

/// Format a pixel length the way the DOM accepts it in inline styles
pub fn px(value: f64) -> String {
    format!("{}px", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(50.0), "50px");
        assert_eq!(px(50.5), "50.5px");
        assert_eq!(px(-12.0), "-12px");
    }

    #[test]
    fn test_overlap_inside_viewport() {
        let viewport = Viewport::new(0.0, 100.0, 800.0, 600.0);
        assert!(viewport.overlaps(&Rect::new(10.0, 50.0, 300.0, 400.0)));
    }

    #[test]
    fn test_overlap_scrolled_past() {
        let viewport = Viewport::new(0.0, 1000.0, 800.0, 600.0);
        // Table ends exactly where the viewport starts
        assert!(!viewport.overlaps(&Rect::new(0.0, 600.0, 300.0, 400.0)));
    }

    #[test]
    fn test_overlap_below_fold() {
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        assert!(!viewport.overlaps(&Rect::new(0.0, 600.0, 300.0, 100.0)));
        assert!(viewport.overlaps(&Rect::new(0.0, 599.0, 300.0, 100.0)));
    }

    #[test]
    fn test_overlap_horizontal_axis() {
        let viewport = Viewport::new(500.0, 0.0, 400.0, 600.0);
        assert!(!viewport.overlaps(&Rect::new(0.0, 0.0, 500.0, 100.0)));
        assert!(viewport.overlaps(&Rect::new(0.0, 0.0, 501.0, 100.0)));
    }

    #[test]
    fn test_translate_keeps_size() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0).translate(10.0, -20.0);
        assert_eq!(rect, Rect::new(11.0, -18.0, 3.0, 4.0));
    }
}
