//! Fixed Header WASM Module
//!
//! Keeps a cloned copy of a table's `<thead>` pinned to the top of the
//! viewport while the table scrolls, with cell widths matched to the source.
//!
//! The core ([`mirror`], [`controller`]) is written against the [`dom::Host`]
//! trait; [`api`] exposes it to JavaScript on top of `web-sys`.

pub mod api;
pub mod controller;
pub mod dom;
pub mod errors;
pub mod mirror;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use controller::{FixedHeader, TableRef};
pub use errors::FixedHeaderError;
pub use mirror::HeaderMirror;
pub use models::{Mode, Options, Rect, Viewport, Visibility, ZIndex};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            web_sys::console::warn_1(&"[WASM] logger already initialized".into());
        }
    }

    log::info!("Fixed header WASM module initialized");
}
