//! In-memory host document
//!
//! `MemoryDom` keeps an element tree with inline styles and a scripted
//! layout: every element has a page rectangle set by the caller, and bounding
//! rects are derived from it and the current scroll position. Window events
//! and animation frames are queued and only fire when the caller dispatches
//! them, which makes frame timing fully deterministic.
//!
//! Handles are cheap to clone and share the same document.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::{Dom, Host, HostEvent};
use crate::errors::{FixedHeaderError, Result};
use crate::models::{Rect, Viewport};

/// Height given to header and body rows by [`MemoryDom::create_table`]
pub const ROW_HEIGHT: f64 = 20.0;

/// Element handle into a [`MemoryDom`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug, Default)]
struct Node {
    tag: String,
    id: String,
    class_name: String,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Page coordinates
    layout: Rect,
    client_width: Option<f64>,
    offset_parent: Option<NodeId>,
}

#[derive(Debug)]
struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    viewport: Viewport,
    style_writes: HashMap<(NodeId, String), usize>,
}

impl Document {
    fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            viewport: Viewport::new(0.0, 0.0, 1024.0, 768.0),
            style_writes: HashMap::new(),
        };
        doc.root = doc.alloc(Node { tag: "html".into(), ..Node::default() });
        doc.body = doc.alloc(Node { tag: "body".into(), ..Node::default() });
        doc.attach(doc.root, doc.body, None);
        doc
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != id);
        }
    }

    /// Insert `child` into `parent` at `index` (appends when `None`)
    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.detach(child);
        let children = &mut self.node_mut(parent).children;
        let index = index.unwrap_or(children.len()).min(children.len());
        children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    fn clone_subtree(&mut self, id: NodeId, deep: bool) -> NodeId {
        let source = self.node(id).clone();
        let copy = self.alloc(Node {
            tag: source.tag,
            id: source.id,
            class_name: source.class_name,
            style: source.style,
            ..Node::default()
        });
        if deep {
            for child in source.children {
                let child_copy = self.clone_subtree(child, true);
                self.attach(copy, child_copy, None);
            }
        }
        copy
    }

    fn children_tagged(&self, id: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|child| tags.contains(&self.node(*child).tag.as_str()))
            .collect()
    }

    fn descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(id).children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }
}

struct Listener {
    key: usize,
    event: HostEvent,
    /// Taken out while the handler runs
    handler: Option<Box<dyn FnMut()>>,
}

struct Events {
    next_key: usize,
    listeners: Vec<Listener>,
    frames: Vec<(usize, Box<dyn FnOnce()>)>,
    frames_supported: bool,
}

impl Default for Events {
    fn default() -> Self {
        Self {
            next_key: 0,
            listeners: Vec::new(),
            frames: Vec::new(),
            frames_supported: true,
        }
    }
}

/// Listener registration in a [`MemoryDom`]
#[derive(Debug, PartialEq, Eq)]
pub struct MemoryListener(usize);

/// Pending animation frame in a [`MemoryDom`]
#[derive(Debug, PartialEq, Eq)]
pub struct MemoryFrame(usize);

/// In-memory document, window and layout
#[derive(Clone)]
pub struct MemoryDom {
    doc: Rc<RefCell<Document>>,
    events: Rc<RefCell<Events>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty `<html><body></body></html>` with a 1024x768 viewport at scroll 0
    pub fn new() -> Self {
        Self {
            doc: Rc::new(RefCell::new(Document::new())),
            events: Rc::new(RefCell::new(Events::default())),
        }
    }

    pub fn document_body(&self) -> NodeId {
        self.doc.borrow().body
    }

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.doc.borrow_mut().alloc(Node {
            tag: tag.to_string(),
            ..Node::default()
        })
    }

    pub fn append(&self, parent: NodeId, child: NodeId) {
        self.doc.borrow_mut().attach(parent, child, None);
    }

    pub fn tag(&self, element: NodeId) -> String {
        self.doc.borrow().node(element).tag.clone()
    }

    pub fn children(&self, element: NodeId) -> Vec<NodeId> {
        self.doc.borrow().node(element).children.clone()
    }

    /// Set the element's position and size in page coordinates
    pub fn set_layout(&self, element: NodeId, rect: Rect) {
        self.doc.borrow_mut().node_mut(element).layout = rect;
    }

    /// Override clientWidth; defaults to the layout width
    pub fn set_client_width(&self, element: NodeId, width: f64) {
        self.doc.borrow_mut().node_mut(element).client_width = Some(width);
    }

    pub fn set_offset_parent(&self, element: NodeId, parent: Option<NodeId>) {
        self.doc.borrow_mut().node_mut(element).offset_parent = parent;
    }

    pub fn scroll_to(&self, x: f64, y: f64) {
        let mut doc = self.doc.borrow_mut();
        doc.viewport.scroll_x = x;
        doc.viewport.scroll_y = y;
    }

    pub fn set_window_size(&self, width: f64, height: f64) {
        let mut doc = self.doc.borrow_mut();
        doc.viewport.width = width;
        doc.viewport.height = height;
    }

    /// Connected elements carrying `class` (whitespace-separated match)
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let doc = self.doc.borrow();
        let mut all = Vec::new();
        doc.descendants(doc.root, &mut all);
        all.into_iter()
            .filter(|id| doc.node(*id).class_name.split_whitespace().any(|c| c == class))
            .collect()
    }

    /// How many times `property` was written on `element` through [`Dom::set_style`]
    pub fn style_writes(&self, element: NodeId, property: &str) -> usize {
        self.doc
            .borrow()
            .style_writes
            .get(&(element, property.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Build `<table id><thead>rows</thead><tbody>..</tbody></table>` under `<body>`.
    ///
    /// `header` holds one entry per header row, each listing cell widths laid
    /// out left to right from the table's left edge.
    pub fn create_table(&self, id: &str, page: Rect, header: &[Vec<f64>], body_rows: usize) -> NodeId {
        let table = self.create_element("table");
        self.set_id(&table, id);
        self.set_layout(table, page);
        self.append(self.document_body(), table);

        let thead = self.create_element("thead");
        self.append(table, thead);
        let mut top = page.top;
        for widths in header {
            let row = self.create_element("tr");
            self.append(thead, row);
            self.set_layout(row, Rect::new(page.left, top, widths.iter().sum(), ROW_HEIGHT));
            let mut left = page.left;
            for width in widths {
                let cell = self.create_element("th");
                self.append(row, cell);
                self.set_layout(cell, Rect::new(left, top, *width, ROW_HEIGHT));
                left += width;
            }
            top += ROW_HEIGHT;
        }

        let tbody = self.create_element("tbody");
        self.append(table, tbody);
        for _ in 0..body_rows {
            let row = self.create_element("tr");
            self.append(tbody, row);
            self.set_layout(row, Rect::new(page.left, top, page.width, ROW_HEIGHT));
            self.append(row, self.create_element("td"));
            top += ROW_HEIGHT;
        }
        table
    }

    /// Fire every listener registered for `event`, in registration order
    pub fn dispatch(&self, event: HostEvent) {
        let keys: Vec<usize> = self
            .events
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.event == event)
            .map(|listener| listener.key)
            .collect();

        for key in keys {
            let handler = self
                .events
                .borrow_mut()
                .listeners
                .iter_mut()
                .find(|listener| listener.key == key)
                .and_then(|listener| listener.handler.take());
            let Some(mut handler) = handler else { continue };
            handler();
            // The handler may have unregistered itself
            if let Some(listener) = self
                .events
                .borrow_mut()
                .listeners
                .iter_mut()
                .find(|listener| listener.key == key)
            {
                listener.handler = Some(handler);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.events.borrow().listeners.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.events.borrow().frames.len()
    }

    /// Run the frame callbacks queued so far; returns how many ran.
    ///
    /// Frames requested by those callbacks wait for the next call.
    pub fn run_frames(&self) -> usize {
        let frames = std::mem::take(&mut self.events.borrow_mut().frames);
        let count = frames.len();
        for (_, callback) in frames {
            callback();
        }
        count
    }

    /// Simulate a window without requestAnimationFrame
    pub fn set_frames_supported(&self, supported: bool) {
        self.events.borrow_mut().frames_supported = supported;
    }
}

impl Dom for MemoryDom {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        let doc = self.doc.borrow();
        let mut all = Vec::new();
        doc.descendants(doc.root, &mut all);
        all.into_iter().find(|node| doc.node(*node).id == id)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.document_body())
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.doc.borrow().node(*element).parent
    }

    fn shallow_clone(&self, element: &NodeId) -> Result<NodeId> {
        Ok(self.doc.borrow_mut().clone_subtree(*element, false))
    }

    fn deep_clone(&self, element: &NodeId) -> Result<NodeId> {
        Ok(self.doc.borrow_mut().clone_subtree(*element, true))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.doc.borrow_mut().attach(*parent, *child, None);
        Ok(())
    }

    fn prepend_child(&self, parent: &NodeId, node: &NodeId) -> Result<()> {
        self.doc.borrow_mut().attach(*parent, *node, Some(0));
        Ok(())
    }

    fn insert_before(&self, reference: &NodeId, node: &NodeId) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        let parent = doc
            .node(*reference)
            .parent
            .ok_or_else(|| FixedHeaderError::Dom("reference node has no parent".into()))?;
        doc.detach(*node);
        let index = doc
            .node(parent)
            .children
            .iter()
            .position(|child| child == reference);
        doc.attach(parent, *node, index);
        Ok(())
    }

    fn remove(&self, element: &NodeId) {
        self.doc.borrow_mut().detach(*element);
    }

    fn is_connected(&self, element: &NodeId) -> bool {
        let doc = self.doc.borrow();
        let mut current = Some(*element);
        while let Some(node) = current {
            if node == doc.root {
                return true;
            }
            current = doc.node(node).parent;
        }
        false
    }

    fn id(&self, element: &NodeId) -> String {
        self.doc.borrow().node(*element).id.clone()
    }

    fn set_id(&self, element: &NodeId, id: &str) {
        self.doc.borrow_mut().node_mut(*element).id = id.to_string();
    }

    fn class_name(&self, element: &NodeId) -> String {
        self.doc.borrow().node(*element).class_name.clone()
    }

    fn set_class_name(&self, element: &NodeId, class_name: &str) {
        self.doc.borrow_mut().node_mut(*element).class_name = class_name.to_string();
    }

    fn style(&self, element: &NodeId, property: &str) -> String {
        self.doc
            .borrow()
            .node(*element)
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) {
        let mut doc = self.doc.borrow_mut();
        doc.node_mut(*element)
            .style
            .insert(property.to_string(), value.to_string());
        *doc.style_writes.entry((*element, property.to_string())).or_insert(0) += 1;
    }

    fn table_head(&self, table: &NodeId) -> Option<NodeId> {
        let doc = self.doc.borrow();
        if doc.node(*table).tag != "table" {
            return None;
        }
        doc.children_tagged(*table, &["thead"]).into_iter().next()
    }

    fn rows(&self, section: &NodeId) -> Vec<NodeId> {
        self.doc.borrow().children_tagged(*section, &["tr"])
    }

    fn cells(&self, row: &NodeId) -> Vec<NodeId> {
        self.doc.borrow().children_tagged(*row, &["th", "td"])
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        let doc = self.doc.borrow();
        doc.node(*element)
            .layout
            .translate(-doc.viewport.scroll_x, -doc.viewport.scroll_y)
    }

    fn client_width(&self, element: &NodeId) -> f64 {
        let doc = self.doc.borrow();
        let node = doc.node(*element);
        node.client_width.unwrap_or(node.layout.width)
    }

    fn offset_box(&self, element: &NodeId) -> Rect {
        let doc = self.doc.borrow();
        let node = doc.node(*element);
        match node.offset_parent {
            Some(parent) => {
                let origin = doc.node(parent).layout;
                node.layout.translate(-origin.left, -origin.top)
            }
            None => node.layout,
        }
    }

    fn offset_parent(&self, element: &NodeId) -> Option<NodeId> {
        self.doc.borrow().node(*element).offset_parent
    }

    fn viewport(&self) -> Viewport {
        self.doc.borrow().viewport
    }
}

impl Host for MemoryDom {
    type Listener = MemoryListener;
    type Frame = MemoryFrame;

    fn listen(&self, event: HostEvent, handler: Box<dyn FnMut()>) -> Result<MemoryListener> {
        let mut events = self.events.borrow_mut();
        let key = events.next_key;
        events.next_key += 1;
        events.listeners.push(Listener {
            key,
            event,
            handler: Some(handler),
        });
        Ok(MemoryListener(key))
    }

    fn unlisten(&self, listener: MemoryListener) {
        self.events
            .borrow_mut()
            .listeners
            .retain(|registered| registered.key != listener.0);
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Option<MemoryFrame> {
        let mut events = self.events.borrow_mut();
        if !events.frames_supported {
            return None;
        }
        let key = events.next_key;
        events.next_key += 1;
        events.frames.push((key, callback));
        Some(MemoryFrame(key))
    }

    fn cancel_frame(&self, frame: MemoryFrame) {
        self.events.borrow_mut().frames.retain(|(key, _)| *key != frame.0);
    }
}
