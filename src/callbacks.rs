//! User callback hooks
//!
//! Each hook is optional: every method has a no-op default, and
//! `before_drop` defaults to letting the drop through.

use crate::attributes::DataRecord;
use crate::dom::Dom;
use crate::gesture::PlaceholderPosition;

/// Arguments shared by `before_drop` and `drop`
#[derive(Debug, Clone, Copy)]
pub struct DropInfo<'a, N> {
    pub item: &'a N,
    /// Element that precedes the item in the (prospective) final order
    pub previous: Option<&'a N>,
    /// The item's record, as captured at pickup
    pub data: &'a DataRecord,
    pub previous_data: Option<&'a DataRecord>,
    /// Element that follows the item in the (prospective) final order
    pub next: Option<&'a N>,
}

pub trait SortableCallbacks<D: Dom> {
    /// A gesture started; `previous`/`next` are the pre-drag neighbours
    fn pickup(
        &mut self,
        _item: &D::Node,
        _data: &DataRecord,
        _previous: Option<&D::Node>,
        _next: Option<&D::Node>,
    ) {
    }

    /// The placeholder was positioned next to `below`
    fn drag(
        &mut self,
        _event: &D::Event,
        _item: &D::Node,
        _below: &D::Node,
        _position: PlaceholderPosition,
    ) {
    }

    /// Return `false` to veto the drop
    fn before_drop(&mut self, _drop: &DropInfo<'_, D::Node>) -> bool {
        true
    }

    fn drop(&mut self, _drop: &DropInfo<'_, D::Node>) {}
}

impl<D: Dom> SortableCallbacks<D> for () {}
