//! Show/hide policy

use super::HeaderMirror;
use crate::dom::Dom;
use crate::errors::Result;
use crate::models::options::{HIDDEN_DISPLAY, SHOWN_DISPLAY};
use crate::models::Visibility;

impl<D: Dom> HeaderMirror<D> {
    /// Whether any part of the source table lies inside the scrolled viewport
    pub fn is_in_viewport(&self) -> bool {
        self.table
            .as_ref()
            .map(|table| self.dom.viewport().overlaps(&self.dom.page_rect(table)))
            .unwrap_or(false)
    }

    /// What the mirror should look like right now; `None` when skipped
    pub fn evaluate_visibility(&self) -> Option<Visibility> {
        let (table, _) = self.live_pair()?;
        Some(Visibility::decide(
            &self.dom.page_rect(table),
            self.dom.bounding_rect(table).top,
            &self.dom.viewport(),
            self.options.top,
        ))
    }

    /// Show or hide the mirror for the current scroll position.
    ///
    /// Showing resyncs cell widths first since they may have changed while
    /// the mirror was hidden.
    pub fn update_visibility(&mut self) -> Result<Option<Visibility>> {
        let Some(visibility) = self.evaluate_visibility() else {
            return Ok(None);
        };
        let display = match visibility {
            Visibility::Shown => {
                self.sync_geometry()?;
                SHOWN_DISPLAY
            }
            Visibility::Hidden => HIDDEN_DISPLAY,
        };
        if let Some(mirror) = &self.mirror {
            self.dom.set_style(mirror, "display", display);
        }
        Ok(Some(visibility))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use crate::models::{Options, Rect};

    /// Table `data` at page y=200 with a 50/100/150 header, pinned at top 20
    fn example() -> (MemoryDom, HeaderMirror<MemoryDom>) {
        let dom = MemoryDom::new();
        let table = dom.create_table("data", Rect::new(0.0, 200.0, 300.0, 600.0), &[vec![50.0, 100.0, 150.0]], 30);
        let mut mirror = HeaderMirror::new(dom.clone(), Options::default().with_top(20.0));
        mirror.bind(table);
        mirror.build().unwrap();
        mirror.sync_geometry().unwrap();
        (dom, mirror)
    }

    #[test]
    fn test_shown_above_threshold() {
        let (dom, mut mirror) = example();
        dom.scroll_to(0.0, 190.0); // bounding top 10
        assert_eq!(mirror.update_visibility(), Ok(Some(Visibility::Shown)));
        assert_eq!(dom.style(mirror.mirror().unwrap(), "display"), "table");
        assert!(mirror.is_shown());
    }

    #[test]
    fn test_hidden_below_threshold() {
        let (dom, mut mirror) = example();
        dom.scroll_to(0.0, 190.0);
        mirror.update_visibility().unwrap();
        dom.scroll_to(0.0, 170.0); // bounding top 30
        assert_eq!(mirror.update_visibility(), Ok(Some(Visibility::Hidden)));
        assert_eq!(dom.style(mirror.mirror().unwrap(), "display"), "none");
        assert!(!mirror.is_shown());
    }

    #[test]
    fn test_hidden_once_table_scrolled_away() {
        let (dom, mut mirror) = example();
        dom.scroll_to(0.0, 900.0); // table spans 200..800
        assert_eq!(mirror.update_visibility(), Ok(Some(Visibility::Hidden)));
    }

    #[test]
    fn test_show_refreshes_widths() {
        let (dom, mut mirror) = example();
        let table = *mirror.table().unwrap();
        let row = dom.rows(&dom.table_head(&table).unwrap())[0];
        let first = dom.cells(&row)[0];
        dom.set_layout(first, Rect::new(0.0, 200.0, 64.0, 20.0));

        dom.scroll_to(0.0, 190.0);
        mirror.update_visibility().unwrap();
        let mirror_head = dom.table_head(mirror.mirror().unwrap()).unwrap();
        let mirror_first = dom.cells(&dom.rows(&mirror_head)[0])[0];
        assert_eq!(dom.style(&mirror_first, "width"), "64px");
    }

    #[test]
    fn test_hidden_source_is_left_alone() {
        let (dom, mut mirror) = example();
        let clone = *mirror.mirror().unwrap();
        let writes = dom.style_writes(clone, "display");
        dom.set_style(mirror.table().unwrap(), "display", "none");

        dom.scroll_to(0.0, 190.0);
        assert_eq!(mirror.update_visibility(), Ok(None));
        assert_eq!(dom.style_writes(clone, "display"), writes);
        assert_eq!(dom.style(&clone, "display"), "none");
    }

    #[test]
    fn test_viewport_uses_offset_chain() {
        let dom = MemoryDom::new();
        let wrapper = dom.create_element("div");
        dom.append(dom.document_body(), wrapper);
        dom.set_layout(wrapper, Rect::new(0.0, 2000.0, 800.0, 1000.0));
        let table = dom.create_table("deep", Rect::new(0.0, 2100.0, 300.0, 400.0), &[vec![300.0]], 5);
        dom.append(wrapper, table);
        dom.set_offset_parent(table, Some(wrapper));

        let mut mirror = HeaderMirror::new(dom.clone(), Options::default());
        mirror.bind(table);
        mirror.build().unwrap();

        // offsetTop alone (100) would wrongly place the table in the first screen
        assert!(!mirror.is_in_viewport());
        dom.scroll_to(0.0, 2110.0);
        assert!(mirror.is_in_viewport());
        assert_eq!(mirror.update_visibility(), Ok(Some(Visibility::Shown)));
    }
}
