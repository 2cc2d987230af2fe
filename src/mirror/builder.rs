//! Mirror construction

use super::HeaderMirror;
use crate::dom::Dom;
use crate::errors::{FixedHeaderError, Result};
use crate::models::options::{HIDDEN_DISPLAY, MIRROR_CLASS, MIRROR_ID_SUFFIX};
use crate::models::{px, Mode};

/// Class list of the mirror: the source classes plus the fixed-header markers
fn mirror_class_name(source: &str, mode: Mode) -> String {
    let mut classes = String::from(source.trim());
    if !classes.is_empty() {
        classes.push(' ');
    }
    classes.push_str(MIRROR_CLASS);
    classes.push(' ');
    classes.push_str(&mode.class_name());
    classes
}

impl<D: Dom> HeaderMirror<D> {
    /// Clone the bound table's header and insert the mirror into the document.
    ///
    /// Returns `Ok(false)` when a mirror already exists. A table without a
    /// `<thead>` still gets an (empty) mirror.
    pub fn build(&mut self) -> Result<bool> {
        if self.mirror.is_some() {
            return Ok(false);
        }
        let table = self.table.clone().ok_or(FixedHeaderError::Unbound)?;
        let mirror = self.create_mirror(&table)?;
        self.place(&table, &mirror)?;
        self.mirror = Some(mirror);
        log::debug!(
            "fixed header built for #{} ({})",
            self.dom.id(&table),
            self.options.mode.as_str()
        );
        Ok(true)
    }

    pub(super) fn create_mirror(&self, table: &D::Element) -> Result<D::Element> {
        let dom = &self.dom;
        let mirror = dom.shallow_clone(table)?;

        let id = dom.id(table);
        if !id.is_empty() {
            dom.set_id(&mirror, &format!("{}{}", id, MIRROR_ID_SUFFIX));
        }

        dom.set_style(&mirror, "display", HIDDEN_DISPLAY);
        dom.set_style(&mirror, "top", &px(self.options.top));
        dom.set_style(&mirror, "z-index", &self.options.z_index.to_string());
        if self.options.is_js_fixed() {
            dom.set_style(&mirror, "position", "absolute");
        }
        dom.set_class_name(&mirror, &mirror_class_name(&dom.class_name(table), self.options.mode));

        match dom.table_head(table) {
            Some(head) => {
                let head = dom.deep_clone(&head)?;
                dom.append_child(&mirror, &head)?;
            }
            None => log::warn!("{}; the fixed header stays empty", FixedHeaderError::MissingHeader),
        }
        Ok(mirror)
    }

    pub(super) fn place(&self, table: &D::Element, mirror: &D::Element) -> Result<()> {
        match self.options.mode {
            Mode::CssFixed => self.dom.insert_before(table, mirror),
            Mode::JsFixed => {
                let body = self
                    .dom
                    .body()
                    .ok_or_else(|| FixedHeaderError::Dom("document has no body".into()))?;
                self.dom.prepend_child(&body, mirror)
            }
        }
    }
}
