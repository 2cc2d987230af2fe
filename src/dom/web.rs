//! Browser host backed by `web-sys`

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, HtmlElement, HtmlTableElement, HtmlTableRowElement, HtmlTableSectionElement,
    Window,
};

use super::{Dom, Host, HostEvent};
use crate::errors::{FixedHeaderError, Result};
use crate::models::{Rect, Viewport};

/// Prefixed names tried when `requestAnimationFrame` is missing
const PREFIXED_ANIMATION_FRAME: [&str; 3] = [
    "webkitRequestAnimationFrame",
    "mozRequestAnimationFrame",
    "msRequestAnimationFrame",
];

fn dom_error(context: &str, err: JsValue) -> FixedHeaderError {
    FixedHeaderError::Dom(format!("{}: {:?}", context, err))
}

fn collection_elements(collection: web_sys::HtmlCollection) -> Vec<HtmlElement> {
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// A window listener; the closure must outlive the registration
pub struct WebListener {
    event: HostEvent,
    closure: Closure<dyn FnMut()>,
}

/// `requestAnimationFrame` request id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebFrame(i32);

/// `window` and `document` of the current page
#[derive(Clone)]
pub struct WebHost {
    window: Window,
    document: Document,
    /// Closure of the most recent frame request, kept alive until replaced or cancelled
    frame_closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl WebHost {
    /// `None` outside a browser main thread
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            frame_closure: Rc::new(RefCell::new(None)),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn animation_frame_fn(&self) -> Option<Function> {
        std::iter::once("requestAnimationFrame")
            .chain(PREFIXED_ANIMATION_FRAME)
            .filter_map(|name| Reflect::get(&self.window, &JsValue::from_str(name)).ok())
            .find_map(|value| value.dyn_into::<Function>().ok())
    }

    fn scroll_offsets(&self) -> (f64, f64) {
        let root = self.document.document_element();
        let x = self
            .window
            .page_x_offset()
            .ok()
            .or_else(|| root.as_ref().map(|el| el.scroll_left() as f64))
            .unwrap_or(0.0);
        let y = self
            .window
            .page_y_offset()
            .ok()
            .or_else(|| root.as_ref().map(|el| el.scroll_top() as f64))
            .unwrap_or(0.0);
        (x, y)
    }
}

impl Dom for WebHost {
    type Element = HtmlElement;

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }

    fn parent(&self, element: &HtmlElement) -> Option<HtmlElement> {
        element
            .parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
    }

    fn shallow_clone(&self, element: &HtmlElement) -> Result<HtmlElement> {
        element
            .clone_node()
            .map_err(|e| dom_error("cloneNode(false)", e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| FixedHeaderError::Dom("clone is not an HTML element".into()))
    }

    fn deep_clone(&self, element: &HtmlElement) -> Result<HtmlElement> {
        element
            .clone_node_with_deep(true)
            .map_err(|e| dom_error("cloneNode(true)", e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| FixedHeaderError::Dom("clone is not an HTML element".into()))
    }

    fn append_child(&self, parent: &HtmlElement, child: &HtmlElement) -> Result<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| dom_error("appendChild", e))
    }

    fn prepend_child(&self, parent: &HtmlElement, node: &HtmlElement) -> Result<()> {
        parent
            .insert_before(node, parent.first_child().as_ref())
            .map(|_| ())
            .map_err(|e| dom_error("insertBefore", e))
    }

    fn insert_before(&self, reference: &HtmlElement, node: &HtmlElement) -> Result<()> {
        let parent = reference
            .parent_node()
            .ok_or_else(|| FixedHeaderError::Dom("reference node has no parent".into()))?;
        parent
            .insert_before(node, Some(reference.as_ref()))
            .map(|_| ())
            .map_err(|e| dom_error("insertBefore", e))
    }

    fn remove(&self, element: &HtmlElement) {
        element.remove();
    }

    fn is_connected(&self, element: &HtmlElement) -> bool {
        element.is_connected()
    }

    fn id(&self, element: &HtmlElement) -> String {
        element.id()
    }

    fn set_id(&self, element: &HtmlElement, id: &str) {
        element.set_id(id);
    }

    fn class_name(&self, element: &HtmlElement) -> String {
        element.class_name()
    }

    fn set_class_name(&self, element: &HtmlElement, class_name: &str) {
        element.set_class_name(class_name);
    }

    fn style(&self, element: &HtmlElement, property: &str) -> String {
        element
            .style()
            .get_property_value(property)
            .unwrap_or_default()
    }

    fn set_style(&self, element: &HtmlElement, property: &str, value: &str) {
        if let Err(e) = element.style().set_property(property, value) {
            log::warn!("set {}: {} failed: {:?}", property, value, e);
        }
    }

    fn table_head(&self, table: &HtmlElement) -> Option<HtmlElement> {
        table
            .dyn_ref::<HtmlTableElement>()?
            .t_head()
            .map(HtmlElement::from)
    }

    fn rows(&self, section: &HtmlElement) -> Vec<HtmlElement> {
        section
            .dyn_ref::<HtmlTableSectionElement>()
            .map(|section| collection_elements(section.rows()))
            .unwrap_or_default()
    }

    fn cells(&self, row: &HtmlElement) -> Vec<HtmlElement> {
        row.dyn_ref::<HtmlTableRowElement>()
            .map(|row| collection_elements(row.cells()))
            .unwrap_or_default()
    }

    fn bounding_rect(&self, element: &HtmlElement) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn client_width(&self, element: &HtmlElement) -> f64 {
        element.client_width() as f64
    }

    fn offset_box(&self, element: &HtmlElement) -> Rect {
        Rect::new(
            element.offset_left() as f64,
            element.offset_top() as f64,
            element.offset_width() as f64,
            element.offset_height() as f64,
        )
    }

    fn offset_parent(&self, element: &HtmlElement) -> Option<HtmlElement> {
        element
            .offset_parent()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
    }

    fn viewport(&self) -> Viewport {
        let (scroll_x, scroll_y) = self.scroll_offsets();
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(scroll_x, scroll_y, width, height)
    }
}

impl Host for WebHost {
    type Listener = WebListener;
    type Frame = WebFrame;

    fn listen(&self, event: HostEvent, handler: Box<dyn FnMut()>) -> Result<WebListener> {
        let closure = Closure::wrap(handler);
        self.window
            .add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())
            .map_err(|e| dom_error("addEventListener", e))?;
        Ok(WebListener { event, closure })
    }

    fn unlisten(&self, listener: WebListener) {
        if let Err(e) = self.window.remove_event_listener_with_callback(
            listener.event.as_str(),
            listener.closure.as_ref().unchecked_ref(),
        ) {
            log::warn!("removeEventListener({}) failed: {:?}", listener.event.as_str(), e);
        }
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Option<WebFrame> {
        let request = self.animation_frame_fn()?;
        let closure = Closure::<dyn FnMut()>::once(move || callback());
        let id = request
            .call1(&self.window, closure.as_ref())
            .ok()
            .and_then(|id| id.as_f64())?;
        // Replacing the previous closure is safe: at most one frame is pending
        // and the previous one has already run.
        *self.frame_closure.borrow_mut() = Some(closure);
        Some(WebFrame(id as i32))
    }

    fn cancel_frame(&self, frame: WebFrame) {
        if let Err(e) = self.window.cancel_animation_frame(frame.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
        self.frame_closure.borrow_mut().take();
    }
}
