//! RAII drag event listeners
//!
//! A [`DragListener`] owns its closure and unbinds it from the target when
//! dropped, so an instance's listeners live exactly as long as the handles do.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, EventTarget};

use crate::dom::web::dom_error;
use crate::error::SortableError;

pub struct DragListener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(DragEvent)>,
}

impl DragListener {
    pub fn bind(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(DragEvent) + 'static,
    ) -> Result<Self, SortableError> {
        let closure = Closure::<dyn FnMut(DragEvent)>::new(handler);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(dom_error)?;

        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Drop for DragListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

impl std::fmt::Debug for DragListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragListener").field("kind", &self.kind).finish()
    }
}
