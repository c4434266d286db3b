//! Sortable WASM API
//!
//! The JavaScript-facing surface: the exported `Sortable` class, the callback
//! slots read from `options.callbacks`, and the listener handles bound at the
//! delegation root.
//!
//! # Module Structure
//!
//! - `helpers`: options parsing, target resolution, serialization
//! - `callbacks`: `JsCallbacks`, the JavaScript implementation of the hooks
//! - `listener`: RAII `DragListener` handles
//! - `widget`: the exported class

pub mod callbacks;
pub mod helpers;
pub mod listener;
pub mod widget;

pub use callbacks::JsCallbacks;
pub use widget::SortableWidget;
