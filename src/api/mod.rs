//! Fixed header WASM API
//!
//! JavaScript-facing surface of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: argument conversion and serde helpers shared by the exports
//! - `fixed_header`: the `JSFixedHeader` class
//! - `stylesheet`: CSS needed by the css-fixed mode

pub mod helpers;
pub mod fixed_header;
pub mod stylesheet;

pub use fixed_header::JsFixedHeader;
pub use stylesheet::{fixed_header_stylesheet, inject_fixed_header_stylesheet};
