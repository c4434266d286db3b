//! Drag-reorder state machine
//!
//! An instance is idle until a native drag starts on one of its elements, and
//! dragging until the matching drag-end. Every event handler below maps to
//! one native event dispatched at the delegation root:
//!
//! | Event       | Handler                   |
//! |-------------|---------------------------|
//! | `dragstart` | [`Sortable::drag_start`]  |
//! | `dragenter` | [`Sortable::drag_enter`]  |
//! | `dragover`  | [`Sortable::drag_over`]   |
//! | `drop`      | [`Sortable::drop`]        |
//! | `dragend`   | [`Sortable::drag_end`]    |
//!
//! Drop is not a state of its own: it moves the element synchronously and the
//! gesture is torn down only by drag-end, which the platform always delivers.

use crate::attributes::{extract, DataRecord};
use crate::callbacks::{DropInfo, SortableCallbacks};
use crate::capability::{is_draggable, is_sortable_tag};
use crate::config::{class_names, SortableOptions};
use crate::dom::Dom;
use crate::error::SortableError;
use crate::gesture::{Direction, Gesture, PlaceholderPosition};
use crate::membership::{resolve_root, Membership};
use crate::placeholder::Placeholder;
use crate::tagger::InstanceMarker;
use crate::sortable_debug;

/// Result of a `dragstart`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    /// Not ours, disabled, or a gesture is already running
    Ignored,
    Started,
}

/// Result of a `dragover`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTick {
    /// No gesture, or nothing eligible under the pointer
    Idle,
    Positioned {
        direction: Direction,
        position: PlaceholderPosition,
        /// Whether the placeholder actually moved in the DOM
        moved: bool,
        /// Whether the `drag` callback ran
        dispatched: bool,
    },
}

/// Result of a `drop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Drop without a matching pickup
    NoGesture,
    /// The placeholder was never positioned
    NoTarget,
    /// `before_drop` returned `false`
    Vetoed,
    Dropped,
}

/// One sortable instance bound to a set of managed elements
pub struct Sortable<D: Dom, C> {
    dom: D,
    options: SortableOptions,
    membership: Membership<D::Node>,
    root: D::Node,
    items: Vec<D::Node>,
    callbacks: C,
    gesture: Option<Gesture<D::Node>>,
}

impl<D: Dom, C: SortableCallbacks<D>> Sortable<D, C> {
    /// Tag `items` with a fresh marker and resolve the delegation root
    pub fn new(
        dom: D,
        items: Vec<D::Node>,
        options: SortableOptions,
        callbacks: C,
    ) -> Result<Self, SortableError> {
        Self::with_marker(dom, items, options, callbacks, InstanceMarker::random())
    }

    pub fn with_marker(
        dom: D,
        items: Vec<D::Node>,
        options: SortableOptions,
        callbacks: C,
        marker: InstanceMarker,
    ) -> Result<Self, SortableError> {
        if items.is_empty() {
            return Err(SortableError::NoElements);
        }
        for item in &items {
            marker.tag_managed(&dom, item)?;
        }

        let explicit_parent = options.pickup.parent.as_deref();
        let root = resolve_root(&dom, &items, &marker, explicit_parent)
            .ok_or(SortableError::NoDelegationRoot)?;
        let boundary = explicit_parent.map(|_| root.clone());

        sortable_debug!(
            options,
            "{} manages {} elements under <{}>",
            marker,
            items.len(),
            dom.tag_name(&root)
        );
        if options.drop.parent.is_some() {
            sortable_debug!(options, "drop.parent is recorded but not enforced");
        }

        Ok(Self {
            dom,
            options,
            membership: Membership::new(marker, boundary),
            root,
            items,
            callbacks,
            gesture: None,
        })
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn options(&self) -> &SortableOptions {
        &self.options
    }

    pub fn marker(&self) -> &InstanceMarker {
        self.membership.marker()
    }

    /// Node the five drag listeners belong on
    pub fn root(&self) -> &D::Node {
        &self.root
    }

    pub fn items(&self) -> &[D::Node] {
        &self.items
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    pub fn gesture(&self) -> Option<&Gesture<D::Node>> {
        self.gesture.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// `dragstart`: validate the target and begin a gesture.
    ///
    /// Unsortable tag kinds cancel the native drag and return an error; the
    /// instance stays usable.
    pub fn drag_start(&mut self, event: &D::Event) -> Result<Pickup, SortableError> {
        if self.gesture.is_some() {
            return Ok(Pickup::Ignored);
        }
        let Some(item) = self.dom.event_target(event) else {
            return Ok(Pickup::Ignored);
        };
        let disabled_class = &self.options.pickup.disabled_class;
        if !is_draggable(&self.dom, &self.membership, &item, disabled_class) {
            sortable_debug!(self.options, "pickup refused for <{}>", self.dom.tag_name(&item));
            return Ok(Pickup::Ignored);
        }

        let tag = self.dom.tag_name(&item);
        if !is_sortable_tag(&tag) {
            self.dom.prevent_default(event);
            return Err(SortableError::UnsortableTag(tag));
        }

        let placeholder = Placeholder::create(&self.dom, &item, &self.options, self.marker())?;
        let data = extract(&self.dom, &item, &self.options.data_attributes);

        // Snapshot the element before it is decorated; the gesture works without one
        if let Err(error) = self.attach_drag_image(event, &item) {
            crate::sortable_warn!("drag image unavailable: {}", error);
        }

        for class in class_names(self.options.pickup.add_class.as_deref()) {
            self.dom.add_class(&item, class);
        }
        let mut removed = Vec::new();
        for class in class_names(self.options.pickup.remove_class.as_deref()) {
            if self.dom.has_class(&item, class) {
                self.dom.remove_class(&item, class);
                removed.push(class.to_string());
            }
        }

        let previous = self.dom.previous_sibling(&item);
        let next = self.dom.next_sibling(&item);
        sortable_debug!(self.options, "picked up <{}> {:?}", tag, data);

        let gesture = self
            .gesture
            .insert(Gesture::new(item, data, placeholder, removed));
        self.callbacks
            .pickup(&gesture.item, &gesture.data, previous.as_ref(), next.as_ref());
        Ok(Pickup::Started)
    }

    /// Clone `item` off-screen under the body for the platform to snapshot,
    /// then drop the clone on the next frame
    fn attach_drag_image(&self, event: &D::Event, item: &D::Node) -> Result<(), SortableError> {
        let body = self
            .dom
            .body()
            .ok_or_else(|| SortableError::Dom("document has no body".to_string()))?;
        let image = self.dom.clone_deep(item)?;
        let (width, height) = self.dom.rendered_size(item);

        self.dom.set_style(&image, "width", &format!("{width}px"));
        self.dom.set_style(&image, "height", &format!("{height}px"));
        self.dom.set_style(&image, "position", "absolute");
        self.dom.set_style(&image, "top", "-9999px");
        self.dom.set_style(&image, "left", "-9999px");
        self.dom.set_style(&image, "pointer-events", "none");
        self.dom.add_class(&image, &self.options.drag_image_class);
        self.marker().tag_synthetic(&self.dom, &image);

        self.dom.append_child(&body, &image)?;
        self.dom.begin_native_drag(event, &image);
        self.dom.detach_next_frame(&image);
        Ok(())
    }

    /// `dragenter`: keeps the drag-over stream alive over nested nodes.
    ///
    /// Returns whether the entered element is a valid place to hover.
    pub fn drag_enter(&mut self, event: &D::Event) -> bool {
        if self.gesture.is_none() {
            return false;
        }
        let Some(target) = self.dom.event_target(event) else {
            return false;
        };
        let Some(below) = self.membership.marked_ancestor(&self.dom, &target, &self.root) else {
            return false;
        };
        let valid = is_draggable(
            &self.dom,
            &self.membership,
            &below,
            &self.options.pickup.disabled_class,
        );
        if valid {
            self.dom.prevent_default(event);
        }
        valid
    }

    /// `dragover`: move the placeholder next to the element under the pointer
    pub fn drag_over(&mut self, event: &D::Event) -> Result<DragTick, SortableError> {
        self.dom.prevent_default(event);

        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(DragTick::Idle);
        };
        let Some(target) = self.dom.event_target(event) else {
            return Ok(DragTick::Idle);
        };
        let Some(below) = self.membership.marked_ancestor(&self.dom, &target, &self.root) else {
            return Ok(DragTick::Idle);
        };
        if below == gesture.item || gesture.placeholder.is(&below) {
            return Ok(DragTick::Idle);
        }

        let y = self.dom.event_client_y(event);
        let direction = Direction::infer(gesture.last_y, y);
        let moved = match direction {
            Direction::Down => gesture.placeholder.move_after(&self.dom, &below)?,
            Direction::Up => gesture.placeholder.move_before(&self.dom, &below)?,
        };
        gesture.last_y = Some(y);

        let follows_below =
            self.dom.previous_sibling(gesture.placeholder.node()).as_ref() == Some(&below);
        let position = if follows_below {
            PlaceholderPosition::Top
        } else {
            PlaceholderPosition::Bottom
        };

        let changed = gesture.last_below.as_ref() != Some(&below)
            || gesture.last_direction != Some(direction);
        let dispatched = self.options.allow_duplicate_callbacks || changed;
        if dispatched {
            sortable_debug!(self.options, "drag {:?} over {:?} ({})", direction, below, position.as_str());
            self.callbacks.drag(event, &gesture.item, &below, position);
        }
        gesture.last_below = Some(below);
        gesture.last_direction = Some(direction);

        Ok(DragTick::Positioned {
            direction,
            position,
            moved,
            dispatched,
        })
    }

    /// `drop`: move the dragged element to the placeholder, unless vetoed
    pub fn drop(&mut self, event: &D::Event) -> Result<DropOutcome, SortableError> {
        self.dom.prevent_default(event);

        let Some(gesture) = self.gesture.as_ref() else {
            return Ok(DropOutcome::NoGesture);
        };
        let placeholder = gesture.placeholder.node();
        let Some(parent) = self.dom.parent(placeholder) else {
            sortable_debug!(self.options, "drop before the placeholder was positioned");
            return Ok(DropOutcome::NoTarget);
        };

        let previous = neighbour(&self.dom, placeholder, &gesture.item, Side::Previous);
        let next = neighbour(&self.dom, placeholder, &gesture.item, Side::Next);
        let previous_data: Option<DataRecord> = previous
            .as_ref()
            .map(|node| extract(&self.dom, node, &self.options.data_attributes));

        let info = DropInfo {
            item: &gesture.item,
            previous: previous.as_ref(),
            data: &gesture.data,
            previous_data: previous_data.as_ref(),
            next: next.as_ref(),
        };

        if !self.callbacks.before_drop(&info) {
            sortable_debug!(self.options, "drop vetoed by beforeDrop");
            return Ok(DropOutcome::Vetoed);
        }

        self.dom.insert_before(&parent, &gesture.item, Some(placeholder))?;
        self.callbacks.drop(&info);
        sortable_debug!(self.options, "dropped after {:?}", previous);
        Ok(DropOutcome::Dropped)
    }

    /// `dragend`: undo pickup decorations, remove the placeholder, go idle.
    ///
    /// Returns `false` when there was no gesture to end.
    pub fn drag_end(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };

        for class in class_names(self.options.pickup.add_class.as_deref()) {
            self.dom.remove_class(&gesture.item, class);
        }
        for class in &gesture.removed_classes {
            self.dom.add_class(&gesture.item, class);
        }
        gesture.placeholder.destroy(&self.dom);

        sortable_debug!(self.options, "gesture ended");
        true
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Previous,
    Next,
}

/// Sibling of the placeholder on `side`, skipping the dragged item so the
/// result is the neighbour in the final order
fn neighbour<D: Dom>(dom: &D, placeholder: &D::Node, item: &D::Node, side: Side) -> Option<D::Node> {
    let step = |node: &D::Node| match side {
        Side::Previous => dom.previous_sibling(node),
        Side::Next => dom.next_sibling(node),
    };
    let candidate = step(placeholder)?;
    if candidate == *item {
        step(&candidate)
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, MemoryDragEvent};
    use indextree::NodeId;

    #[derive(Debug, Default)]
    struct Counter {
        pickups: usize,
        drags: usize,
        drops: usize,
    }

    impl SortableCallbacks<MemoryDom> for Counter {
        fn pickup(&mut self, _: &NodeId, _: &DataRecord, _: Option<&NodeId>, _: Option<&NodeId>) {
            self.pickups += 1;
        }

        fn drag(&mut self, _: &MemoryDragEvent, _: &NodeId, _: &NodeId, _: PlaceholderPosition) {
            self.drags += 1;
        }

        fn drop(&mut self, _: &DropInfo<'_, NodeId>) {
            self.drops += 1;
        }
    }

    fn sortable(count: usize) -> (Sortable<MemoryDom, Counter>, NodeId, Vec<NodeId>) {
        let dom = MemoryDom::new();
        let ul = dom.append_element(dom.body_node(), "ul");
        let items: Vec<NodeId> = (0..count).map(|_| dom.append_element(ul, "li")).collect();
        let sortable = Sortable::with_marker(
            dom,
            items.clone(),
            SortableOptions::default(),
            Counter::default(),
            InstanceMarker::from_class("sortable-test"),
        )
        .unwrap();
        (sortable, ul, items)
    }

    fn event(target: NodeId, y: f64) -> MemoryDragEvent {
        MemoryDragEvent::new(target, y)
    }

    #[test]
    fn test_construction_tags_and_resolves_root() {
        let (sortable, ul, items) = sortable(3);
        assert_eq!(*sortable.root(), ul);
        for item in &items {
            assert!(sortable.dom().has_class(item, "sortable-test"));
        }
        assert!(!sortable.is_dragging());
    }

    #[test]
    fn test_empty_item_list_is_rejected() {
        let result = Sortable::new(MemoryDom::new(), Vec::new(), SortableOptions::default(), ());
        assert!(matches!(result, Err(SortableError::NoElements)));
    }

    #[test]
    fn test_second_pickup_ignored_while_dragging() {
        let (mut sortable, _, items) = sortable(3);

        assert_eq!(sortable.drag_start(&event(items[0], 0.0)).unwrap(), Pickup::Started);
        assert_eq!(sortable.drag_start(&event(items[1], 0.0)).unwrap(), Pickup::Ignored);
        assert_eq!(sortable.callbacks().pickups, 1);
        assert_eq!(sortable.gesture().map(|g| *g.item()), Some(items[0]));
    }

    #[test]
    fn test_drag_over_without_gesture_is_idle_but_prevents_default() {
        let (mut sortable, _, items) = sortable(2);
        let over = event(items[1], 10.0);

        assert_eq!(sortable.drag_over(&over).unwrap(), DragTick::Idle);
        assert!(over.default_prevented());
    }

    #[test]
    fn test_hovering_dragged_item_or_placeholder_is_ignored() {
        let (mut sortable, _, items) = sortable(3);
        sortable.drag_start(&event(items[0], 0.0)).unwrap();

        assert_eq!(sortable.drag_over(&event(items[0], 5.0)).unwrap(), DragTick::Idle);

        sortable.drag_over(&event(items[1], 10.0)).unwrap();
        let placeholder = *sortable.gesture().unwrap().placeholder();
        assert_eq!(sortable.drag_over(&event(placeholder, 20.0)).unwrap(), DragTick::Idle);
        assert_eq!(sortable.callbacks().drags, 1);
    }

    #[test]
    fn test_drop_before_positioning_has_no_target() {
        let (mut sortable, ul, items) = sortable(3);
        sortable.drag_start(&event(items[0], 0.0)).unwrap();

        assert_eq!(sortable.drop(&event(ul, 0.0)).unwrap(), DropOutcome::NoTarget);
        assert_eq!(sortable.callbacks().drops, 0);
        assert!(sortable.drag_end());
        assert_eq!(sortable.dom().children(ul), items);
    }

    #[test]
    fn test_drop_neighbours_skip_the_dragged_item() {
        let (mut sortable, ul, items) = sortable(3);
        sortable.drag_start(&event(items[1], 50.0)).unwrap();
        // Hovering A moving down puts the placeholder between A and B
        sortable.drag_over(&event(items[0], 60.0)).unwrap();

        let placeholder = *sortable.gesture().unwrap().placeholder();
        assert_eq!(
            sortable.dom().children(ul),
            vec![items[0], placeholder, items[1], items[2]]
        );
        assert_eq!(
            neighbour(sortable.dom(), &placeholder, &items[1], Side::Next),
            Some(items[2])
        );

        assert_eq!(sortable.drop(&event(ul, 60.0)).unwrap(), DropOutcome::Dropped);
        sortable.drag_end();
        assert_eq!(sortable.dom().children(ul), items);
    }

    #[test]
    fn test_drag_end_without_gesture_is_noop() {
        let (mut sortable, _, _) = sortable(2);
        assert!(!sortable.drag_end());
    }
}
