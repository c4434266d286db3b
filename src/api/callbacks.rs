//! JavaScript callback slots
//!
//! `options.callbacks` is read once at construction into one optional
//! function per hook. A hook that throws is logged and treated as having
//! returned `undefined`.

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element};

use super::helpers::{describe_js_error, element_or_null, serialize};
use crate::attributes::DataRecord;
use crate::callbacks::{DropInfo, SortableCallbacks};
use crate::dom::WebDom;
use crate::error::SortableError;
use crate::gesture::PlaceholderPosition;
use crate::sortable_error;

#[derive(Debug, Clone, Default)]
pub struct JsCallbacks {
    pickup: Option<Function>,
    drag: Option<Function>,
    before_drop: Option<Function>,
    drop: Option<Function>,
    /// Raised when `pickup` fires, so hooks can see the gesture as live
    gesture_live: Rc<Cell<bool>>,
}

impl JsCallbacks {
    /// Read `options.callbacks.{pickup,drag,beforeDrop,drop}`; non-functions are ignored
    pub fn from_options(options: &JsValue, gesture_live: Rc<Cell<bool>>) -> Self {
        if !options.is_object() {
            return Self {
                gesture_live,
                ..Self::default()
            };
        }
        let callbacks = Reflect::get(options, &JsValue::from_str("callbacks"))
            .ok()
            .filter(JsValue::is_object);
        let slot = |name: &str| -> Option<Function> {
            let callbacks = callbacks.as_ref()?;
            Reflect::get(callbacks, &JsValue::from_str(name))
                .ok()?
                .dyn_into::<Function>()
                .ok()
        };

        Self {
            pickup: slot("pickup"),
            drag: slot("drag"),
            before_drop: slot("beforeDrop"),
            drop: slot("drop"),
            gesture_live,
        }
    }

    fn invoke(name: &'static str, slot: &Option<Function>, args: Array) -> Option<JsValue> {
        let function = slot.as_ref()?;
        match function.apply(&JsValue::NULL, &args) {
            Ok(value) => Some(value),
            Err(thrown) => {
                let error = SortableError::Callback {
                    name,
                    message: describe_js_error(&thrown),
                };
                sortable_error!("{}", error);
                None
            }
        }
    }

    fn drop_args(drop: &DropInfo<'_, Element>) -> Array {
        let previous_data = drop
            .previous_data
            .map_or(JsValue::UNDEFINED, |data| serialize(data, "previous item data"));
        Array::of5(
            &drop.item.clone().into(),
            &element_or_null(drop.previous),
            &serialize(drop.data, "item data"),
            &previous_data,
            &element_or_null(drop.next),
        )
    }
}

impl SortableCallbacks<WebDom> for JsCallbacks {
    fn pickup(
        &mut self,
        item: &Element,
        data: &DataRecord,
        previous: Option<&Element>,
        next: Option<&Element>,
    ) {
        let args = Array::of4(
            &item.clone().into(),
            &serialize(data, "item data"),
            &element_or_null(previous),
            &element_or_null(next),
        );
        self.gesture_live.set(true);
        Self::invoke("pickup", &self.pickup, args);
    }

    fn drag(
        &mut self,
        event: &DragEvent,
        item: &Element,
        below: &Element,
        position: PlaceholderPosition,
    ) {
        let args = Array::of4(
            event.as_ref(),
            &item.clone().into(),
            &below.clone().into(),
            &JsValue::from_str(position.as_str()),
        );
        Self::invoke("drag", &self.drag, args);
    }

    fn before_drop(&mut self, drop: &DropInfo<'_, Element>) -> bool {
        if self.before_drop.is_none() {
            return true;
        }
        let result = Self::invoke("beforeDrop", &self.before_drop, Self::drop_args(drop));
        // Only an explicit `false` vetoes
        result.and_then(|value| value.as_bool()) != Some(false)
    }

    fn drop(&mut self, drop: &DropInfo<'_, Element>) {
        if self.drop.is_some() {
            Self::invoke("drop", &self.drop, Self::drop_args(drop));
        }
    }
}
