//! Sortable WASM Module
//!
//! Drag-and-drop reordering of sibling DOM elements. A page marks a set of
//! list items, table rows or grid cells as sortable; native drag gestures
//! then move them among their siblings and report the new order through
//! callbacks. Nothing is persisted: callers save the order themselves.
//!
//! The drag-reorder core ([`sortable::Sortable`]) is generic over the host
//! [`dom::Dom`], so it runs against the browser through `web-sys` and
//! headless against [`dom::MemoryDom`].

pub mod utils;
pub mod api;
pub mod attributes;
pub mod callbacks;
pub mod capability;
pub mod config;
pub mod dom;
pub mod error;
pub mod gesture;
pub mod membership;
pub mod placeholder;
pub mod sortable;
pub mod tagger;

// Re-export commonly used types
pub use attributes::DataRecord;
pub use callbacks::{DropInfo, SortableCallbacks};
pub use config::{DropOptions, PickupOptions, SortableOptions};
pub use error::SortableError;
pub use gesture::{Direction, PlaceholderPosition};
pub use sortable::{DragTick, DropOutcome, Pickup, Sortable};
pub use tagger::InstanceMarker;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Fails only when the host page already installed a logger
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::debug!("[sortable] WASM module initialized");
}
