//! Per-gesture state
//!
//! A [`Gesture`] exists from pickup to drag-end and is owned by the instance
//! as `Option<Gesture<_>>`, so at most one can be live at a time.

use serde::Serialize;

use crate::attributes::DataRecord;
use crate::placeholder::Placeholder;

/// Vertical pointer direction inferred between positioning ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` only when the pointer moved above the previous coordinate
    pub fn infer(previous_y: Option<f64>, y: f64) -> Self {
        match previous_y {
            Some(previous) if y < previous => Direction::Up,
            _ => Direction::Down,
        }
    }
}

/// Where the placeholder sits relative to the element below the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderPosition {
    /// The element below immediately precedes the placeholder
    Top,
    Bottom,
}

impl PlaceholderPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceholderPosition::Top => "top",
            PlaceholderPosition::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gesture<N> {
    pub(crate) item: N,
    /// Captured at pickup and never refreshed
    pub(crate) data: DataRecord,
    pub(crate) placeholder: Placeholder<N>,
    pub(crate) last_y: Option<f64>,
    pub(crate) last_below: Option<N>,
    pub(crate) last_direction: Option<Direction>,
    /// `pickup.removeClass` classes the item actually had, restored at drag-end
    pub(crate) removed_classes: Vec<String>,
}

impl<N: Clone + PartialEq> Gesture<N> {
    pub(crate) fn new(
        item: N,
        data: DataRecord,
        placeholder: Placeholder<N>,
        removed_classes: Vec<String>,
    ) -> Self {
        Self {
            item,
            data,
            placeholder,
            last_y: None,
            last_below: None,
            last_direction: None,
            removed_classes,
        }
    }

    pub fn item(&self) -> &N {
        &self.item
    }

    pub fn data(&self) -> &DataRecord {
        &self.data
    }

    pub fn placeholder(&self) -> &N {
        self.placeholder.node()
    }

    pub fn last_below(&self) -> Option<&N> {
        self.last_below.as_ref()
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }
}
