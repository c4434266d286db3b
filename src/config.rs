//! Sortable configuration
//!
//! Options arrive from JavaScript as a plain object and are deserialized with
//! `serde-wasm-bindgen`. Every field has a default, so `{}` is a valid
//! configuration and missing keys are filled in from [`SortableOptions::default`].

use serde::Deserialize;

/// Options controlling where a drag may begin
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickupOptions {
    /// Explicit containment selector; `None` uses the nearest common ancestor
    pub parent: Option<String>,
    /// Ancestor class that blocks pickup
    pub disabled_class: String,
    /// Classes added to the dragged element for the gesture
    pub add_class: Option<String>,
    /// Classes removed from the dragged element for the gesture
    pub remove_class: Option<String>,
}

impl Default for PickupOptions {
    fn default() -> Self {
        Self {
            parent: None,
            disabled_class: "sortable-disabled".to_string(),
            add_class: Some("sortable-dragging".to_string()),
            remove_class: None,
        }
    }
}

/// Options describing the drop scope.
///
/// These are read but not enforced by the drop transition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropOptions {
    pub parent: Option<String>,
    pub add_class: Option<String>,
    pub remove_class: Option<String>,
}

/// Full configuration of one sortable instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SortableOptions {
    pub pickup: PickupOptions,
    pub drop: DropOptions,
    /// Ordered data-field names copied off elements (`itemId` reads `data-item-id`)
    pub data_attributes: Vec<String>,
    pub placeholder_class: String,
    pub drop_indicator_class: String,
    /// Whether the placeholder also gets `drop_indicator_class`
    pub drop_indicator: bool,
    pub drag_image_class: String,
    /// Dispatch `drag` on every positioning tick, not only on changes
    pub allow_duplicate_callbacks: bool,
    /// Gates diagnostic logging
    pub debug: bool,
}

impl Default for SortableOptions {
    fn default() -> Self {
        Self {
            pickup: PickupOptions::default(),
            drop: DropOptions::default(),
            data_attributes: Vec::new(),
            placeholder_class: "sortable-placeholder".to_string(),
            drop_indicator_class: "sortable-drop-indicator".to_string(),
            drop_indicator: false,
            drag_image_class: "sortable-drag-image".to_string(),
            allow_duplicate_callbacks: false,
            debug: false,
        }
    }
}

/// Split a class option into individual class names
pub fn class_names(value: Option<&str>) -> impl Iterator<Item = &str> {
    value.unwrap_or_default().split_whitespace()
}
