//! Geometry synchronization and js-fixed positioning

use super::HeaderMirror;
use crate::dom::Dom;
use crate::errors::Result;
use crate::models::px;

/// Inline styles that survive a rebuild of the mirror
const CARRIED_STYLES: [&str; 3] = ["display", "left", "top"];

impl<D: Dom> HeaderMirror<D> {
    /// Copy the rendered width of every source header cell onto its mirror cell.
    ///
    /// In js-fixed mode the mirror table also takes the source client width.
    /// If the source header changed shape since the mirror was built, the
    /// mirror is rebuilt first. Returns `Ok(false)` when skipped.
    pub fn sync_geometry(&mut self) -> Result<bool> {
        let Some((table, mirror)) = self.live_pair() else {
            return Ok(false);
        };
        let (table, mut mirror) = (table.clone(), mirror.clone());

        let source_head = self.dom.table_head(&table);
        if self.head_shape(source_head.as_ref()) != self.head_shape(self.dom.table_head(&mirror).as_ref()) {
            self.rebuild()?;
            match self.mirror.clone() {
                Some(rebuilt) => mirror = rebuilt,
                None => return Ok(false),
            }
        }

        if self.options.is_js_fixed() {
            self.dom.set_style(&mirror, "width", &px(self.dom.client_width(&table)));
        }

        let (Some(source_head), Some(mirror_head)) = (source_head, self.dom.table_head(&mirror)) else {
            return Ok(true);
        };
        let source_rows = self.dom.rows(&source_head);
        let mirror_rows = self.dom.rows(&mirror_head);
        for (source_row, mirror_row) in source_rows.iter().zip(&mirror_rows) {
            let source_cells = self.dom.cells(source_row);
            let mirror_cells = self.dom.cells(mirror_row);
            for (source_cell, mirror_cell) in source_cells.iter().zip(&mirror_cells) {
                let width = self.dom.bounding_rect(source_cell).width;
                self.dom.set_style(mirror_cell, "width", &px(width));
            }
        }
        Ok(true)
    }

    fn head_shape(&self, head: Option<&D::Element>) -> Vec<usize> {
        head.map(|head| self.dom.section_shape(head)).unwrap_or_default()
    }

    /// Replace the mirror with a fresh clone of the live header.
    ///
    /// The new mirror is placed before the old one is removed; if that fails
    /// the old mirror stays in place and the error is returned.
    fn rebuild(&mut self) -> Result<()> {
        let (Some(table), Some(old)) = (self.table.clone(), self.mirror.clone()) else {
            return Ok(());
        };
        let fresh = self.create_mirror(&table)?;
        self.place(&table, &fresh)?;

        for property in CARRIED_STYLES {
            let value = self.dom.style(&old, property);
            if !value.is_empty() {
                self.dom.set_style(&fresh, property, &value);
            }
        }
        self.dom.remove(&old);
        self.mirror = Some(fresh);
        log::debug!("header structure changed, fixed header rebuilt");
        Ok(())
    }

    /// js-fixed only: align the mirror's left edge with the source table.
    ///
    /// The mirror hangs off `<body>`, so the offset is measured from the body's
    /// left edge. Skipped while the table is outside the viewport.
    pub fn fix_position(&self) -> bool {
        if !self.options.is_js_fixed() || !self.is_in_viewport() {
            return false;
        }
        let Some((table, mirror)) = self.live_pair() else {
            return false;
        };
        let Some(body) = self.dom.body() else {
            return false;
        };
        let offset = self.dom.bounding_rect(table).left - self.dom.bounding_rect(&body).left;
        self.dom.set_style(mirror, "left", &px(offset));
        true
    }

    /// js-fixed only: whether a scroll should schedule a top-offset frame
    pub fn wants_frame(&self) -> bool {
        self.options.is_js_fixed() && self.live_pair().is_some() && self.is_in_viewport()
    }

    /// Pin the mirror's top to the current scroll position plus the threshold.
    ///
    /// Runs from the animation frame; returns false when the mirror is gone
    /// or the source table is hidden.
    pub fn track_scroll(&self) -> bool {
        let Some((_, mirror)) = self.live_pair() else {
            return false;
        };
        let top = self.dom.viewport().scroll_y + self.options.top;
        self.dom.set_style(mirror, "top", &px(top));
        true
    }
}
