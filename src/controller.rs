//! Fixed header controller
//!
//! [`FixedHeader`] wires a [`HeaderMirror`] to the host window: resize
//! resyncs widths and the js-fixed left offset, scroll re-evaluates visibility
//! and (js-fixed) schedules one animation frame to move the mirror's top.
//!
//! Mirror state lives in an `Rc<RefCell<_>>` owned by the controller. Event
//! and frame callbacks only hold a `Weak` to it, so once the controller is
//! destroyed or dropped any late callback does nothing. Every listener the
//! controller registers is kept and removed again on destroy.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::dom::{Host, HostEvent};
use crate::errors::{FixedHeaderError, Result};
use crate::mirror::HeaderMirror;
use crate::models::Options;
use crate::utils::SingleFlight;

/// How the source table is given to the controller
#[derive(Clone, Debug, PartialEq)]
pub enum TableRef<E> {
    Element(E),
    Id(String),
}

struct Shared<H: Host> {
    mirror: HeaderMirror<H>,
    frame: SingleFlight<H::Frame>,
}

type SharedRef<H> = Rc<RefCell<Shared<H>>>;

pub struct FixedHeader<H: Host + Clone + 'static> {
    host: H,
    shared: SharedRef<H>,
    listeners: Vec<H::Listener>,
    /// Set by `destroy`; a destroyed controller never attaches again
    destroyed: bool,
}

impl<H: Host + Clone + 'static> FixedHeader<H> {
    /// Controller with no table; see [`FixedHeader::attach`]
    pub fn new(host: H, options: Options) -> Self {
        let shared = Rc::new(RefCell::new(Shared {
            mirror: HeaderMirror::new(host.clone(), options),
            frame: SingleFlight::new(),
        }));
        Self {
            host,
            shared,
            listeners: Vec::new(),
            destroyed: false,
        }
    }

    /// Resolve `table` and attach to it.
    ///
    /// An id that matches nothing leaves the controller unbound.
    pub fn with_table(host: H, table: TableRef<H::Element>, options: Options) -> Self {
        let mut header = Self::new(host, options);
        match header.resolve(table) {
            Ok(element) => {
                header.attach(element);
            }
            Err(e) => log::warn!("fixed header not attached: {}", e),
        }
        header
    }

    fn resolve(&self, table: TableRef<H::Element>) -> Result<H::Element> {
        match table {
            TableRef::Element(element) => Ok(element),
            TableRef::Id(id) => self
                .host
                .element_by_id(&id)
                .ok_or(FixedHeaderError::TableNotFound(id)),
        }
    }

    /// Bind `table`, build its mirror and start listening to the window.
    ///
    /// Returns false when a mirror already exists, the controller was
    /// destroyed, or the build failed.
    pub fn attach(&mut self, table: H::Element) -> bool {
        if self.destroyed {
            log::warn!("fixed header already destroyed, attach ignored");
            return false;
        }
        {
            let mut shared = self.shared.borrow_mut();
            if !shared.mirror.bind(table) {
                return false;
            }
            if let Err(e) = shared.mirror.build() {
                log::warn!("fixed header build failed: {}", e);
                return false;
            }
        }
        Self::on_resize(&self.shared);
        Self::on_scroll(&self.host, &self.shared);
        self.bind_events();
        true
    }

    fn bind_events(&mut self) {
        let weak = Rc::downgrade(&self.shared);
        let on_resize = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Self::on_resize(&shared);
            }
        });

        let weak = Rc::downgrade(&self.shared);
        let host = self.host.clone();
        let on_scroll = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Self::on_scroll(&host, &shared);
            }
        });

        for (event, handler) in [
            (HostEvent::Resize, on_resize as Box<dyn FnMut()>),
            (HostEvent::Scroll, on_scroll as Box<dyn FnMut()>),
        ] {
            match self.host.listen(event, handler) {
                Ok(listener) => self.listeners.push(listener),
                Err(e) => log::warn!("could not listen to {}: {}", event.as_str(), e),
            }
        }
    }

    fn on_resize(shared: &SharedRef<H>) {
        let mut shared = shared.borrow_mut();
        if let Err(e) = shared.mirror.sync_geometry() {
            log::warn!("fixed header resync failed: {}", e);
        }
        shared.mirror.fix_position();
    }

    fn on_scroll(host: &H, shared: &SharedRef<H>) {
        if let Err(e) = shared.borrow_mut().mirror.update_visibility() {
            log::warn!("fixed header visibility update failed: {}", e);
        }
        Self::schedule_frame(host, shared);
    }

    /// js-fixed: request one frame to move the mirror's top, unless one is pending
    fn schedule_frame(host: &H, shared: &SharedRef<H>) {
        {
            let mut state = shared.borrow_mut();
            if !state.mirror.wants_frame() || !state.frame.try_begin() {
                return;
            }
        }

        let weak: Weak<RefCell<Shared<H>>> = Rc::downgrade(shared);
        let callback = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                let mut state = shared.borrow_mut();
                state.frame.complete();
                state.mirror.track_scroll();
            }
        });

        match host.request_frame(callback) {
            Some(frame) => shared.borrow_mut().frame.set_handle(frame),
            None => {
                // No animation-frame primitive: top tracking is simply off
                shared.borrow_mut().frame.complete();
                log::debug!("requestAnimationFrame unavailable, top offset not tracked");
            }
        }
    }

    /// Recompute widths, offsets and visibility now
    pub fn refresh(&self) {
        if self.destroyed {
            return;
        }
        Self::on_resize(&self.shared);
        Self::on_scroll(&self.host, &self.shared);
    }

    /// Remove the mirror, stop listening and cancel a pending frame.
    ///
    /// The controller stays inert afterwards. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        for listener in self.listeners.drain(..) {
            self.host.unlisten(listener);
        }
        let mut shared = self.shared.borrow_mut();
        if let Some(frame) = shared.frame.cancel() {
            self.host.cancel_frame(frame);
        }
        shared.mirror.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_bound(&self) -> bool {
        self.shared.borrow().mirror.table().is_some()
    }

    pub fn is_built(&self) -> bool {
        self.shared.borrow().mirror.is_built()
    }

    pub fn is_shown(&self) -> bool {
        self.shared.borrow().mirror.is_shown()
    }

    pub fn table(&self) -> Option<H::Element> {
        self.shared.borrow().mirror.table().cloned()
    }

    pub fn mirror(&self) -> Option<H::Element> {
        self.shared.borrow().mirror.mirror().cloned()
    }

    pub fn options(&self) -> Options {
        self.shared.borrow().mirror.options().clone()
    }
}

impl<H: Host + Clone + 'static> Drop for FixedHeader<H> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, MemoryDom};
    use crate::models::{Mode, Rect};

    fn page() -> MemoryDom {
        let dom = MemoryDom::new();
        dom.create_table("data", Rect::new(0.0, 200.0, 300.0, 600.0), &[vec![50.0, 100.0, 150.0]], 30);
        dom
    }

    fn by_id(id: &str) -> TableRef<crate::dom::memory::NodeId> {
        TableRef::Id(id.to_string())
    }

    #[test]
    fn test_attach_by_id_registers_two_listeners() {
        let dom = page();
        let header = FixedHeader::with_table(dom.clone(), by_id("data"), Options::default());
        assert!(header.is_built());
        assert_eq!(dom.listener_count(), 2);
        assert_eq!(dom.element_by_id("data-fix"), header.mirror());
    }

    #[test]
    fn test_unknown_id_stays_unbound() {
        let dom = page();
        let header = FixedHeader::with_table(dom.clone(), by_id("missing"), Options::default());
        assert!(!header.is_bound());
        assert!(header.mirror().is_none());
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn test_attach_later() {
        let dom = page();
        let mut header = FixedHeader::new(dom.clone(), Options::default());
        assert!(!header.is_built());

        let table = dom.element_by_id("data").unwrap();
        assert!(header.attach(table));
        assert!(!header.attach(table));
        assert_eq!(dom.elements_with_class("js-fixed-header").len(), 1);
        assert_eq!(dom.listener_count(), 2);
    }

    #[test]
    fn test_scroll_event_toggles_mirror() {
        let dom = page();
        let header = FixedHeader::with_table(dom.clone(), by_id("data"), Options::default().with_top(20.0));
        assert!(!header.is_shown());

        dom.scroll_to(0.0, 190.0);
        dom.dispatch(HostEvent::Scroll);
        assert!(header.is_shown());

        dom.scroll_to(0.0, 170.0);
        dom.dispatch(HostEvent::Scroll);
        assert!(!header.is_shown());
    }

    #[test]
    fn test_resize_event_resyncs_widths() {
        let dom = page();
        let header = FixedHeader::with_table(dom.clone(), by_id("data"), Options::default());
        let table = header.table().unwrap();
        let cell = dom.cells(&dom.rows(&dom.table_head(&table).unwrap())[0])[2];
        dom.set_layout(cell, Rect::new(150.0, 200.0, 170.0, 20.0));

        dom.dispatch(HostEvent::Resize);
        let mirror_head = dom.table_head(&header.mirror().unwrap()).unwrap();
        let mirror_cell = dom.cells(&dom.rows(&mirror_head)[0])[2];
        assert_eq!(dom.style(&mirror_cell, "width"), "170px");
    }

    #[test]
    fn test_destroy_detaches_everything() {
        let dom = page();
        let mut header = FixedHeader::with_table(
            dom.clone(),
            by_id("data"),
            Options::default().with_mode(Mode::JsFixed),
        );
        assert_eq!(dom.pending_frames(), 1);

        header.destroy();
        assert_eq!(dom.listener_count(), 0);
        assert_eq!(dom.pending_frames(), 0);
        assert!(dom.element_by_id("data-fix").is_none());
        assert!(dom.elements_with_class("js-fixed-header").is_empty());

        header.destroy();
        dom.dispatch(HostEvent::Scroll);
        assert!(header.mirror().is_none());
    }

    #[test]
    fn test_attach_after_destroy_is_refused() {
        let dom = page();
        let mut header = FixedHeader::with_table(dom.clone(), by_id("data"), Options::default());
        let table = header.table().unwrap();
        header.destroy();
        assert!(header.is_destroyed());

        assert!(!header.attach(table));
        header.refresh();
        assert!(header.mirror().is_none());
        assert!(dom.elements_with_class("js-fixed-header").is_empty());
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn test_destroy_unbound_then_attach_is_refused() {
        let dom = page();
        let mut header = FixedHeader::new(dom.clone(), Options::default());
        header.destroy();
        assert!(!header.attach(dom.element_by_id("data").unwrap()));
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn test_drop_tears_down() {
        let dom = page();
        {
            let _header = FixedHeader::with_table(dom.clone(), by_id("data"), Options::default());
            assert_eq!(dom.listener_count(), 2);
        }
        assert_eq!(dom.listener_count(), 0);
        assert!(dom.element_by_id("data-fix").is_none());
    }

    #[test]
    fn test_css_fixed_never_requests_frames() {
        let dom = page();
        let _header = FixedHeader::with_table(dom.clone(), by_id("data"), Options::default());
        for y in [100.0, 190.0, 250.0] {
            dom.scroll_to(0.0, y);
            dom.dispatch(HostEvent::Scroll);
        }
        assert_eq!(dom.pending_frames(), 0);
    }

    #[test]
    fn test_refresh_applies_current_geometry() {
        let dom = page();
        let header = FixedHeader::with_table(dom.clone(), by_id("data"), Options::default());
        dom.scroll_to(0.0, 250.0);
        assert!(!header.is_shown());
        header.refresh();
        assert!(header.is_shown());
    }
}
