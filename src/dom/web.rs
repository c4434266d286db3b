//! Browser DOM host backed by `web-sys`

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, DragEvent, Element, HtmlElement, Node};

use super::Dom;
use crate::error::SortableError;

/// Browser document plus the bookkeeping for frame-deferred detaches
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
    pending_frames: Rc<RefCell<Vec<(i32, Element)>>>,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            pending_frames: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The global `document`, if running in a window
    pub fn global() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Cancel scheduled frames and detach their nodes right away
    pub fn cancel_pending_frames(&self) {
        let pending: Vec<(i32, Element)> = self.pending_frames.borrow_mut().drain(..).collect();
        let window = web_sys::window();
        for (handle, node) in pending {
            if let Some(window) = &window {
                let _ = window.cancel_animation_frame(handle);
            }
            node.remove();
        }
    }
}

pub(crate) fn dom_error(value: JsValue) -> SortableError {
    SortableError::Dom(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

impl Dom for WebDom {
    type Node = Element;
    type Event = DragEvent;

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn previous_sibling(&self, node: &Element) -> Option<Element> {
        node.previous_element_sibling()
    }

    fn next_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn child_element_count(&self, node: &Element) -> usize {
        node.child_element_count() as usize
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), SortableError> {
        node.set_attribute(name, value).map_err(dom_error)
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property(property, value);
        }
    }

    fn rendered_size(&self, node: &Element) -> (f64, f64) {
        let rect = node.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    fn create_element(&self, tag: &str) -> Result<Element, SortableError> {
        self.document.create_element(tag).map_err(dom_error)
    }

    fn append_text(&self, parent: &Element, text: &str) -> Result<(), SortableError> {
        let text = self.document.create_text_node(text);
        parent.append_child(&text).map(|_| ()).map_err(dom_error)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), SortableError> {
        parent.append_child(child).map(|_| ()).map_err(dom_error)
    }

    fn insert_before(
        &self,
        parent: &Element,
        node: &Element,
        reference: Option<&Element>,
    ) -> Result<(), SortableError> {
        let reference: Option<&Node> = reference.map(|r| r.as_ref());
        parent
            .insert_before(node, reference)
            .map(|_| ())
            .map_err(dom_error)
    }

    fn detach(&self, node: &Element) {
        node.remove();
    }

    fn clone_deep(&self, node: &Element) -> Result<Element, SortableError> {
        node.clone_node_with_deep(true)
            .map_err(dom_error)?
            .dyn_into::<Element>()
            .map_err(|_| SortableError::Dom("clone is not an element".to_string()))
    }

    fn event_target(&self, event: &DragEvent) -> Option<Element> {
        let target = event.target()?;
        match target.dyn_into::<Element>() {
            Ok(element) => Some(element),
            Err(target) => target.dyn_ref::<Node>().and_then(|node| node.parent_element()),
        }
    }

    fn event_client_y(&self, event: &DragEvent) -> f64 {
        f64::from(event.client_y())
    }

    fn prevent_default(&self, event: &DragEvent) {
        event.prevent_default();
    }

    fn begin_native_drag(&self, event: &DragEvent, drag_image: &Element) {
        let Some(transfer) = event.data_transfer() else {
            return;
        };
        transfer.set_effect_allowed("move");
        // Firefox only starts the drag when some data is set
        let _ = transfer.set_data("text/plain", "");
        transfer.set_drag_image(drag_image, event.offset_x(), event.offset_y());
    }

    fn detach_next_frame(&self, node: &Element) {
        let Some(window) = web_sys::window() else {
            node.remove();
            return;
        };

        let handle = Rc::new(Cell::new(0));
        let frame_handle = Rc::clone(&handle);
        let frame_node = node.clone();
        let pending = Rc::clone(&self.pending_frames);
        let callback = Closure::once_into_js(move || {
            frame_node.remove();
            pending
                .borrow_mut()
                .retain(|(scheduled, _)| *scheduled != frame_handle.get());
        });

        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => {
                handle.set(id);
                self.pending_frames.borrow_mut().push((id, node.clone()));
            }
            Err(_) => node.remove(),
        }
    }
}
