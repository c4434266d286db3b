//! Host DOM abstraction
//!
//! The drag-reorder core talks to the page only through the [`Dom`] trait.
//! [`web::WebDom`] drives the browser DOM through `web-sys`; [`memory::MemoryDom`]
//! is an arena-backed DOM used headless and by the test-suite.
//!
//! Sibling navigation is element-only: text and comment nodes between
//! managed elements are skipped.

pub mod memory;
pub mod web;

pub use memory::{MemoryDom, MemoryDragEvent};
pub use web::WebDom;

use crate::error::SortableError;

/// Operations the sortable core needs from its host document
pub trait Dom {
    /// Handle to an element; equality is node identity
    type Node: Clone + PartialEq + std::fmt::Debug;
    /// Native drag event delivered by the host
    type Event;

    // Navigation

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    fn child_element_count(&self, node: &Self::Node) -> usize;
    /// Inclusive: a node contains itself
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;
    /// Lower-case tag name
    fn tag_name(&self, node: &Self::Node) -> String;
    fn body(&self) -> Option<Self::Node>;
    /// First match in document order
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    // Decoration

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), SortableError>;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    /// Live rendered `(width, height)` in CSS pixels
    fn rendered_size(&self, node: &Self::Node) -> (f64, f64);

    // Mutation

    fn create_element(&self, tag: &str) -> Result<Self::Node, SortableError>;
    fn append_text(&self, parent: &Self::Node, text: &str) -> Result<(), SortableError>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), SortableError>;
    /// Insert `node` under `parent` before `reference`, or last when `reference` is `None`
    fn insert_before(
        &self,
        parent: &Self::Node,
        node: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), SortableError>;
    /// Remove from the parent; no-op when already detached
    fn detach(&self, node: &Self::Node);
    fn clone_deep(&self, node: &Self::Node) -> Result<Self::Node, SortableError>;

    // Events

    /// Element the event was dispatched to (text targets resolve to their parent)
    fn event_target(&self, event: &Self::Event) -> Option<Self::Node>;
    fn event_client_y(&self, event: &Self::Event) -> f64;
    fn prevent_default(&self, event: &Self::Event);
    /// Hand the drag image to the platform and mark the transfer as a move
    fn begin_native_drag(&self, event: &Self::Event, drag_image: &Self::Node);

    // Scheduling

    /// Detach `node` on the next rendering frame
    fn detach_next_frame(&self, node: &Self::Node);
}
