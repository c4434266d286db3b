//! Shared helpers for the WASM API
//!
//! Conversions between JavaScript values and the crate's types: reading the
//! options object, resolving the construction target to elements, and
//! serializing records for callbacks.

use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCollection, NodeList};

use crate::config::SortableOptions;
use crate::error::SortableError;
use crate::sortable_error;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Read the options object; `undefined`/`null` mean all defaults
pub fn read_options(value: &JsValue) -> Result<SortableOptions, SortableError> {
    if value.is_undefined() || value.is_null() {
        return Ok(SortableOptions::default());
    }
    serde_wasm_bindgen::from_value(value.clone())
        .map_err(|e| SortableError::InvalidOptions(e.to_string()))
}

/// Serialize a value to JavaScript, maps as plain objects.
///
/// Failures are logged and yield `undefined`.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).unwrap_or_else(|e| {
        sortable_error!("{}: {}", error_context, e);
        JsValue::UNDEFINED
    })
}

/// Element or `null`
pub fn element_or_null(element: Option<&Element>) -> JsValue {
    element.map_or(JsValue::NULL, |element| element.clone().into())
}

/// Best-effort message from a thrown JavaScript value
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

// ============================================================================
// Target Resolution
// ============================================================================

/// Resolve a selector, element, `NodeList`, `HTMLCollection` or array of
/// elements to the managed element set
pub fn resolve_elements(document: &Document, target: &JsValue) -> Result<Vec<Element>, SortableError> {
    let elements = if let Some(selector) = target.as_string() {
        let list = document
            .query_selector_all(&selector)
            .map_err(|_| SortableError::InvalidTarget(format!("invalid selector `{selector}`")))?;
        from_node_list(&list)
    } else if let Some(element) = target.dyn_ref::<Element>() {
        vec![element.clone()]
    } else if let Some(list) = target.dyn_ref::<NodeList>() {
        from_node_list(list)
    } else if let Some(collection) = target.dyn_ref::<HtmlCollection>() {
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    } else if Array::is_array(target) {
        Array::from(target)
            .iter()
            .map(|value| {
                value
                    .dyn_into::<Element>()
                    .map_err(|_| SortableError::InvalidTarget("array entry is not an element".to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        return Err(SortableError::InvalidTarget(
            "expected a selector, an element or a list of elements".to_string(),
        ));
    };

    if elements.is_empty() {
        return Err(SortableError::NoElements);
    }
    Ok(elements)
}

fn from_node_list(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
