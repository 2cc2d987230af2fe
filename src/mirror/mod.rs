//! Header mirror core
//!
//! [`HeaderMirror`] owns the cloned header table and all the logic that keeps
//! it aligned with its source table:
//!
//! - `builder`: clone the table shell and its `<thead>`, place it in the document
//! - `sync`: copy rendered cell widths, track the js-fixed left/top offsets
//! - `visibility`: show the mirror once the source header scrolls past the threshold
//!
//! It knows nothing about events; the controller decides when to call it.
//! Every operation silently skips when the mirror is not built or the source
//! table is hidden (`display: none`).

mod builder;
mod sync;
mod visibility;

use crate::dom::Dom;
use crate::models::options::{HIDDEN_DISPLAY, SHOWN_DISPLAY};
use crate::models::Options;

pub struct HeaderMirror<D: Dom> {
    dom: D,
    options: Options,
    table: Option<D::Element>,
    mirror: Option<D::Element>,
}

impl<D: Dom> HeaderMirror<D> {
    /// Unbound mirror; call [`HeaderMirror::bind`] then `build`
    pub fn new(dom: D, options: Options) -> Self {
        Self {
            dom,
            options,
            table: None,
            mirror: None,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn table(&self) -> Option<&D::Element> {
        self.table.as_ref()
    }

    pub fn mirror(&self) -> Option<&D::Element> {
        self.mirror.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.mirror.is_some()
    }

    /// Set the source table. Refused once a mirror exists.
    pub fn bind(&mut self, table: D::Element) -> bool {
        if self.mirror.is_some() {
            return false;
        }
        self.table = Some(table);
        true
    }

    /// Whether the source table carries an inline `display: none`
    pub fn is_source_hidden(&self) -> bool {
        self.table
            .as_ref()
            .map(|table| self.dom.style(table, "display") == HIDDEN_DISPLAY)
            .unwrap_or(false)
    }

    pub fn is_shown(&self) -> bool {
        self.mirror
            .as_ref()
            .map(|mirror| self.dom.style(mirror, "display") == SHOWN_DISPLAY)
            .unwrap_or(false)
    }

    /// Source and mirror, when both exist and the source is not hidden
    fn live_pair(&self) -> Option<(&D::Element, &D::Element)> {
        let table = self.table.as_ref()?;
        let mirror = self.mirror.as_ref()?;
        if self.is_source_hidden() {
            return None;
        }
        Some((table, mirror))
    }

    /// Remove the mirror from the document and unbind the table.
    ///
    /// Returns false when there was nothing to remove.
    pub fn destroy(&mut self) -> bool {
        let Some(mirror) = self.mirror.take() else {
            return false;
        };
        self.dom.remove(&mirror);
        self.table = None;
        log::debug!("fixed header destroyed");
        true
    }
}
