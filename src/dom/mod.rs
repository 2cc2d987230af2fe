//! Host document abstraction
//!
//! The mirror logic only needs a small slice of the DOM: tree mutation,
//! inline styles, table sections and layout queries. [`Dom`] captures that
//! slice, and [`Host`] adds the window-level services (event listeners and
//! animation frames) the controller wires up.
//!
//! Two hosts exist: [`web::WebHost`] backed by `web-sys`, and
//! `memory::MemoryDom` (feature `testing`), an in-memory document with
//! scripted layout used to drive the controller outside a browser.

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod web;

use crate::errors::Result;
use crate::models::{Rect, Viewport};

#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryDom;
pub use web::WebHost;

/// Window events the controller listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEvent {
    Resize,
    Scroll,
}

impl HostEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostEvent::Resize => "resize",
            HostEvent::Scroll => "scroll",
        }
    }
}

/// Element tree, styles and layout of the host document
pub trait Dom {
    /// Handle to an element. Cloning the handle never clones the element.
    type Element: Clone + PartialEq;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Copy of the element and its attributes, without children
    fn shallow_clone(&self, element: &Self::Element) -> Result<Self::Element>;
    /// Copy of the element and its whole subtree
    fn deep_clone(&self, element: &Self::Element) -> Result<Self::Element>;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<()>;
    /// Insert `node` as the first child of `parent`
    fn prepend_child(&self, parent: &Self::Element, node: &Self::Element) -> Result<()>;
    /// Insert `node` as the sibling immediately before `reference`
    fn insert_before(&self, reference: &Self::Element, node: &Self::Element) -> Result<()>;
    /// Detach from the parent; no-op when already detached
    fn remove(&self, element: &Self::Element);
    fn is_connected(&self, element: &Self::Element) -> bool;

    /// Empty string when the element has no id
    fn id(&self, element: &Self::Element) -> String;
    fn set_id(&self, element: &Self::Element, id: &str);
    fn class_name(&self, element: &Self::Element) -> String;
    fn set_class_name(&self, element: &Self::Element, class_name: &str);

    /// Inline style property (CSS name, e.g. `z-index`); empty when unset
    fn style(&self, element: &Self::Element, property: &str) -> String;
    fn set_style(&self, element: &Self::Element, property: &str, value: &str);

    /// The `<thead>` of a table element
    fn table_head(&self, table: &Self::Element) -> Option<Self::Element>;
    /// Rows of a table section
    fn rows(&self, section: &Self::Element) -> Vec<Self::Element>;
    /// Cells of a table row
    fn cells(&self, row: &Self::Element) -> Vec<Self::Element>;

    /// Bounding client rect (viewport coordinates)
    fn bounding_rect(&self, element: &Self::Element) -> Rect;
    fn client_width(&self, element: &Self::Element) -> f64;
    /// offsetLeft/Top/Width/Height, relative to the offset parent
    fn offset_box(&self, element: &Self::Element) -> Rect;
    fn offset_parent(&self, element: &Self::Element) -> Option<Self::Element>;

    fn viewport(&self) -> Viewport;

    /// Position of `element` in page coordinates, summed over its offset parents
    fn page_rect(&self, element: &Self::Element) -> Rect {
        let mut rect = self.offset_box(element);
        let mut current = self.offset_parent(element);
        while let Some(ancestor) = current {
            let offset = self.offset_box(&ancestor);
            rect = rect.translate(offset.left, offset.top);
            current = self.offset_parent(&ancestor);
        }
        rect
    }

    /// Row-by-row cell counts of a table section
    fn section_shape(&self, section: &Self::Element) -> Vec<usize> {
        self.rows(section)
            .iter()
            .map(|row| self.cells(row).len())
            .collect()
    }
}

/// Window services: event listeners and animation frames
pub trait Host: Dom {
    /// Registration returned by [`Host::listen`], consumed by [`Host::unlisten`]
    type Listener;
    /// Pending frame returned by [`Host::request_frame`]
    type Frame;

    fn listen(&self, event: HostEvent, handler: Box<dyn FnMut()>) -> Result<Self::Listener>;
    fn unlisten(&self, listener: Self::Listener);

    /// Run `callback` once before the next repaint.
    ///
    /// Returns `None` when the host has no animation-frame primitive.
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Option<Self::Frame>;
    fn cancel_frame(&self, frame: Self::Frame);
}
