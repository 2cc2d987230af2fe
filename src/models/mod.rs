//! Data models for the fixed header
//!
//! Plain values only: configuration, geometry and the visibility decision.
//! Nothing in here touches the DOM.

pub mod geometry;
pub mod options;
pub mod visibility;

pub use geometry::{px, Rect, Viewport};
pub use options::{Mode, Options, ZIndex};
pub use visibility::Visibility;
