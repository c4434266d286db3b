//! Utility modules for the sortable widget

pub mod logging;
