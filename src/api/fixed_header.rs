//! `JSFixedHeader` class exported to JavaScript
//!
//! ```js
//! const header = new JSFixedHeader("data", { top: 20, mode: "js-fixed" });
//! // ...
//! header.destroy();
//! ```

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::helpers::{options_from_js, serialize, table_ref_from_js};
use crate::controller::FixedHeader;
use crate::dom::WebHost;

#[wasm_bindgen(js_name = JSFixedHeader)]
pub struct JsFixedHeader {
    inner: FixedHeader<WebHost>,
}

#[wasm_bindgen(js_class = JSFixedHeader)]
impl JsFixedHeader {
    /// Create a fixed header for `table` (element or id).
    ///
    /// Without a table the instance stays unbound until `attach` is called.
    /// Throws only when there is no `window`/`document`.
    #[wasm_bindgen(constructor)]
    pub fn new(table: JsValue, options: JsValue) -> Result<JsFixedHeader, JsValue> {
        let host = WebHost::new().ok_or_else(|| {
            log::error!("JSFixedHeader needs a browser window and document");
            JsValue::from_str("JSFixedHeader needs a browser window and document")
        })?;
        let options = options_from_js(options);
        let inner = match table_ref_from_js(table) {
            Some(table) => FixedHeader::with_table(host, table, options),
            None => FixedHeader::new(host, options),
        };
        Ok(JsFixedHeader { inner })
    }

    /// Bind a table to an unbound instance. Returns false if already attached.
    pub fn attach(&mut self, table: HtmlElement) -> bool {
        self.inner.attach(table)
    }

    /// Resync widths, offsets and visibility without waiting for a window event
    pub fn refresh(&self) {
        self.inner.refresh();
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }

    #[wasm_bindgen(getter, js_name = isShown)]
    pub fn is_shown(&self) -> bool {
        self.inner.is_shown()
    }

    #[wasm_bindgen(getter, js_name = isBound)]
    pub fn is_bound(&self) -> bool {
        self.inner.is_bound()
    }

    #[wasm_bindgen(getter)]
    pub fn table(&self) -> Option<HtmlElement> {
        self.inner.table()
    }

    #[wasm_bindgen(getter)]
    pub fn mirror(&self) -> Option<HtmlElement> {
        self.inner.mirror()
    }

    /// Effective options after defaults were applied
    pub fn options(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.options(), "Failed to serialize fixed header options")
    }
}
