//! Shared helpers for the WASM API
//!
//! Conversion of JavaScript arguments into the Rust types the controller
//! works with. Failures are logged through `log` (routed to the browser
//! console by `console_log`) and reported as `JsValue` strings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::controller::TableRef;
use crate::models::Options;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

// ============================================================================
// Argument Conversion
// ============================================================================

/// Options object from JavaScript, read key by key.
///
/// `undefined`/`null` give the defaults; a key with an unusable value keeps
/// its default while the other keys still apply.
pub fn options_from_js(value: JsValue) -> Options {
    if value.is_undefined() || value.is_null() {
        return Options::default();
    }
    deserialize(value, "Invalid fixed header options").unwrap_or_else(|_| {
        log::warn!("falling back to default fixed header options");
        Options::default()
    })
}

/// Table argument: an element, an element id, or nothing
pub fn table_ref_from_js(value: JsValue) -> Option<TableRef<HtmlElement>> {
    if let Some(id) = value.as_string() {
        return Some(TableRef::Id(id));
    }
    if value.is_undefined() || value.is_null() {
        return None;
    }
    match value.dyn_into::<HtmlElement>() {
        Ok(element) => Some(TableRef::Element(element)),
        Err(other) => {
            log::warn!("fixed header table must be an element or an id, got {:?}", other);
            None
        }
    }
}
