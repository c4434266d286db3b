//! Instance markers
//!
//! Every element an instance owns, real or synthetic, carries the instance's
//! marker class. Two instances on one page never share a marker, so they can
//! use the same CSS selectors without seeing each other's elements.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::Dom;
use crate::error::SortableError;

const MARKER_PREFIX: &str = "sortable-";
const MARKER_LEN: usize = 8;
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Per-instance marker class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceMarker(String);

impl InstanceMarker {
    /// A fresh random marker. Not cryptographically unique.
    pub fn random() -> Self {
        let mut bytes = [0u8; MARKER_LEN];
        if getrandom::getrandom(&mut bytes).is_err() {
            // Still distinct per instance within this page
            let count = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
            bytes = count.to_le_bytes();
        }
        let suffix: String = bytes
            .iter()
            .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
            .collect();
        Self(format!("{MARKER_PREFIX}{suffix}"))
    }

    /// Use a fixed marker (tests, server-rendered markup)
    pub fn from_class(class: impl Into<String>) -> Self {
        Self(class.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_on<D: Dom>(&self, dom: &D, node: &D::Node) -> bool {
        dom.has_class(node, &self.0)
    }

    /// Mark a managed element and enable native dragging on it
    pub fn tag_managed<D: Dom>(&self, dom: &D, node: &D::Node) -> Result<(), SortableError> {
        dom.add_class(node, &self.0);
        dom.set_attribute(node, "draggable", "true")
    }

    /// Mark a synthetic node (placeholder, drag image)
    pub fn tag_synthetic<D: Dom>(&self, dom: &D, node: &D::Node) {
        dom.add_class(node, &self.0);
    }
}

impl fmt::Display for InstanceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
