//! Show/hide decision for the mirror header

use super::geometry::{Rect, Viewport};

/// Whether the mirror should render
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

impl Visibility {
    /// Decide visibility from the current geometry.
    ///
    /// - `page_rect`: table position accumulated through its offset parents
    /// - `bounding_top`: table top edge relative to the viewport
    /// - `threshold`: configured `top` option
    pub fn decide(page_rect: &Rect, bounding_top: f64, viewport: &Viewport, threshold: f64) -> Self {
        if viewport.overlaps(page_rect) && bounding_top < threshold {
            Visibility::Shown
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, Visibility::Shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_at(page_top: f64) -> Rect {
        Rect::new(0.0, page_top, 400.0, 1000.0)
    }

    #[test]
    fn test_shown_when_top_above_threshold() {
        // Table starts at page y=200, scrolled by 190 => bounding top 10
        let viewport = Viewport::new(0.0, 190.0, 1024.0, 768.0);
        let vis = Visibility::decide(&table_at(200.0), 10.0, &viewport, 20.0);
        assert_eq!(vis, Visibility::Shown);
    }

    #[test]
    fn test_hidden_when_top_below_threshold() {
        let viewport = Viewport::new(0.0, 170.0, 1024.0, 768.0);
        let vis = Visibility::decide(&table_at(200.0), 30.0, &viewport, 20.0);
        assert_eq!(vis, Visibility::Hidden);
    }

    #[test]
    fn test_threshold_is_strict() {
        let viewport = Viewport::new(0.0, 180.0, 1024.0, 768.0);
        let vis = Visibility::decide(&table_at(200.0), 20.0, &viewport, 20.0);
        assert_eq!(vis, Visibility::Hidden);
    }

    #[test]
    fn test_hidden_when_table_scrolled_out() {
        // Whole table is above the viewport
        let viewport = Viewport::new(0.0, 5000.0, 1024.0, 768.0);
        let vis = Visibility::decide(&table_at(200.0), -4800.0, &viewport, 20.0);
        assert_eq!(vis, Visibility::Hidden);
    }
}
