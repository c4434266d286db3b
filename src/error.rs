//! Error types for sortable instances
//!
//! Nothing here is fatal to the hosting page: construction errors leave the
//! instance inert, and per-gesture errors abort only that gesture.

use thiserror::Error;

/// Top-level error type for construction and gesture handling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortableError {
    /// The construction target resolved to zero elements
    #[error("no sortable elements found")]
    NoElements,

    /// The construction target was not a selector, element or element list
    #[error("invalid sortable target: {0}")]
    InvalidTarget(String),

    /// The options object could not be read
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Neither an explicit parent nor a common ancestor could be found
    #[error("could not resolve a delegation root for the sortable elements")]
    NoDelegationRoot,

    /// The element kind cannot be reordered (table sections, body, ...)
    #[error("<{0}> elements cannot be sorted")]
    UnsortableTag(String),

    /// A host DOM mutation failed
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// A user callback threw
    #[error("callback `{name}` failed: {message}")]
    Callback { name: &'static str, message: String },
}
