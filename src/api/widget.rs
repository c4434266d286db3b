//! The `Sortable` class exported to JavaScript
//!
//! ```js
//! const sortable = new Sortable('#todo li', {
//!   dataAttributes: ['itemId'],
//!   callbacks: {
//!     drop: (item, previous, data, previousData, next) => save(data.itemId, previousData?.itemId),
//!   },
//! });
//! ```
//!
//! Construction never throws. On a bad target, bad options or no resolvable
//! delegation root the error is logged and the instance is inert.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, EventTarget};

use super::callbacks::JsCallbacks;
use super::helpers::{read_options, resolve_elements};
use super::listener::DragListener;
use crate::dom::WebDom;
use crate::error::SortableError;
use crate::sortable::Sortable;
use crate::{sortable_error, sortable_warn};

type WebSortable = Sortable<WebDom, JsCallbacks>;
type SharedSortable = Rc<RefCell<WebSortable>>;

/// Instance state readable while the core is borrowed by a handler
#[derive(Debug, Clone, Default)]
struct Lifecycle {
    dragging: Rc<Cell<bool>>,
    destroyed: Rc<Cell<bool>>,
}

#[wasm_bindgen(js_name = Sortable)]
#[derive(Default)]
pub struct SortableWidget {
    marker: Option<String>,
    dom: Option<WebDom>,
    core: Option<SharedSortable>,
    lifecycle: Lifecycle,
    listeners: Vec<DragListener>,
}

#[wasm_bindgen(js_class = Sortable)]
impl SortableWidget {
    /// Make the target elements sortable
    #[wasm_bindgen(constructor)]
    pub fn new(target: JsValue, options: JsValue) -> SortableWidget {
        match Self::build(&target, &options) {
            Ok(widget) => widget,
            Err(error) => {
                sortable_error!("sortable disabled: {}", error);
                Self::default()
            }
        }
    }

    /// Whether drag listeners are bound
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Whether a gesture is in progress
    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.lifecycle.dragging.get()
    }

    /// The instance marker class
    #[wasm_bindgen(getter, js_name = instanceTag)]
    pub fn instance_tag(&self) -> Option<String> {
        self.marker.clone()
    }

    /// Unbind listeners, cancel pending drag-image frames and end any live
    /// gesture. Managed elements keep their marker.
    ///
    /// Called from inside a callback, the gesture ends as soon as the
    /// callback's handler returns.
    pub fn destroy(&mut self) {
        self.lifecycle.destroyed.set(true);
        self.listeners.clear();
        if let Some(dom) = self.dom.take() {
            dom.cancel_pending_frames();
        }
        if let Some(core) = self.core.take() {
            if let Ok(mut core) = core.try_borrow_mut() {
                core.drag_end();
                self.lifecycle.dragging.set(false);
            }
        }
    }
}

impl std::fmt::Debug for SortableWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortableWidget")
            .field("marker", &self.marker)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl SortableWidget {
    fn build(target: &JsValue, options: &JsValue) -> Result<Self, SortableError> {
        let dom = WebDom::global()
            .ok_or_else(|| SortableError::InvalidTarget("no document available".to_string()))?;
        let parsed = read_options(options)?;
        let items = resolve_elements(dom.document(), target)?;
        let lifecycle = Lifecycle::default();
        let callbacks = JsCallbacks::from_options(options, Rc::clone(&lifecycle.dragging));

        let core = Sortable::new(dom.clone(), items, parsed, callbacks)?;
        let marker = core.marker().to_string();
        let root: EventTarget = core.root().clone().into();
        let core = Rc::new(RefCell::new(core));
        let listeners = bind_listeners(&root, &core, &lifecycle)?;

        Ok(Self {
            marker: Some(marker),
            dom: Some(dom),
            core: Some(core),
            lifecycle,
            listeners,
        })
    }
}

fn bind_listeners(
    root: &EventTarget,
    core: &SharedSortable,
    lifecycle: &Lifecycle,
) -> Result<Vec<DragListener>, SortableError> {
    Ok(vec![
        DragListener::bind(
            root,
            "dragstart",
            dispatch(core, lifecycle, "dragstart", |sortable, event| {
                report("dragstart", sortable.drag_start(event));
            }),
        )?,
        DragListener::bind(
            root,
            "dragenter",
            dispatch(core, lifecycle, "dragenter", |sortable, event| {
                sortable.drag_enter(event);
            }),
        )?,
        DragListener::bind(
            root,
            "dragover",
            dispatch(core, lifecycle, "dragover", |sortable, event| {
                report("dragover", sortable.drag_over(event));
            }),
        )?,
        DragListener::bind(
            root,
            "drop",
            dispatch(core, lifecycle, "drop", |sortable, event| {
                report("drop", sortable.drop(event));
            }),
        )?,
        DragListener::bind(
            root,
            "dragend",
            dispatch(core, lifecycle, "dragend", |sortable, _| {
                sortable.drag_end();
            }),
        )?,
    ])
}

/// Route an event to the instance, skipping events that arrive while the
/// instance is already handling one (e.g. dispatched from a callback).
///
/// A `destroy()` issued from a callback is finished here, once the handler
/// has released the gesture.
fn dispatch(
    core: &SharedSortable,
    lifecycle: &Lifecycle,
    kind: &'static str,
    mut handler: impl FnMut(&mut WebSortable, &DragEvent) + 'static,
) -> impl FnMut(DragEvent) + 'static {
    let core = Rc::clone(core);
    let lifecycle = lifecycle.clone();
    move |event: DragEvent| match core.try_borrow_mut() {
        Ok(mut sortable) => {
            handler(&mut *sortable, &event);
            if lifecycle.destroyed.get() {
                sortable.drag_end();
            }
            lifecycle.dragging.set(sortable.is_dragging());
        }
        Err(_) => sortable_warn!("ignoring re-entrant {} event", kind),
    }
}

fn report<T>(kind: &str, result: Result<T, SortableError>) {
    if let Err(error) = result {
        sortable_warn!("{} aborted: {}", kind, error);
    }
}
