//! Stylesheet the css-fixed mode relies on

use wasm_bindgen::prelude::*;

use crate::dom::WebHost;
use crate::models::options::MIRROR_CLASS;
use crate::models::Mode;

/// Id of the `<style>` element added by `injectFixedHeaderStylesheet`
pub const STYLE_ELEMENT_ID: &str = "js-fixed-header-style";

/// CSS rules for both positioning modes
pub fn stylesheet_text() -> String {
    format!(
        ".{base}{{box-sizing:border-box;margin-top:0;}}\
         .{css}{{position:fixed;}}\
         .{js}{{position:absolute;}}",
        base = MIRROR_CLASS,
        css = Mode::CssFixed.class_name(),
        js = Mode::JsFixed.class_name(),
    )
}

#[wasm_bindgen(js_name = fixedHeaderStylesheet)]
pub fn fixed_header_stylesheet() -> String {
    stylesheet_text()
}

/// Add the stylesheet to `<head>` once. Returns false when it was already there.
#[wasm_bindgen(js_name = injectFixedHeaderStylesheet)]
pub fn inject_fixed_header_stylesheet() -> Result<bool, JsValue> {
    let host = WebHost::new().ok_or_else(|| JsValue::from_str("No browser document"))?;
    let document = host.document();
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(false);
    }
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head>"))?;
    let style = document.create_element("style")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(stylesheet_text().as_str()));
    head.append_child(&style)?;
    log::debug!("fixed header stylesheet injected");
    Ok(true)
}
