//! The drop placeholder
//!
//! One synthetic sibling marks where the dragged element will land. Moves are
//! idempotent: asking for the position it already has touches nothing, so
//! repeated positioning ticks never restyle or relayout the list.

use crate::config::SortableOptions;
use crate::dom::Dom;
use crate::error::SortableError;
use crate::tagger::InstanceMarker;

/// Keeps an empty table-row placeholder from collapsing to zero height
const ROW_FILLER: &str = "\u{00a0}";

#[derive(Debug, Clone)]
pub struct Placeholder<N> {
    node: N,
}

impl<N: Clone + PartialEq> Placeholder<N> {
    /// Build a detached placeholder shaped like `template`
    pub fn create<D: Dom<Node = N>>(
        dom: &D,
        template: &N,
        options: &SortableOptions,
        marker: &InstanceMarker,
    ) -> Result<Self, SortableError> {
        let tag = dom.tag_name(template);
        let node = dom.create_element(&tag)?;

        if tag == "tr" {
            let columns = dom.child_element_count(template).max(1);
            let cell = dom.create_element("td")?;
            dom.set_attribute(&cell, "colspan", &columns.to_string())?;
            dom.append_text(&cell, ROW_FILLER)?;
            dom.append_child(&node, &cell)?;
        }

        dom.add_class(&node, &options.placeholder_class);
        marker.tag_synthetic(dom, &node);
        if options.drop_indicator {
            dom.add_class(&node, &options.drop_indicator_class);
        }

        Ok(Self { node })
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn is(&self, node: &N) -> bool {
        self.node == *node
    }

    pub fn is_attached<D: Dom<Node = N>>(&self, dom: &D) -> bool {
        dom.parent(&self.node).is_some()
    }

    /// Place the placeholder immediately before `reference`
    pub fn move_before<D: Dom<Node = N>>(&self, dom: &D, reference: &N) -> Result<bool, SortableError> {
        if dom.previous_sibling(reference).as_ref() == Some(&self.node) {
            return Ok(false);
        }
        let parent = dom
            .parent(reference)
            .ok_or_else(|| SortableError::Dom("reference has no parent".to_string()))?;
        dom.insert_before(&parent, &self.node, Some(reference))?;
        Ok(true)
    }

    /// Place the placeholder immediately after `reference`
    pub fn move_after<D: Dom<Node = N>>(&self, dom: &D, reference: &N) -> Result<bool, SortableError> {
        let next = dom.next_sibling(reference);
        if next.as_ref() == Some(&self.node) {
            return Ok(false);
        }
        let parent = dom
            .parent(reference)
            .ok_or_else(|| SortableError::Dom("reference has no parent".to_string()))?;
        dom.insert_before(&parent, &self.node, next.as_ref())?;
        Ok(true)
    }

    /// Remove from the document; safe when never inserted
    pub fn destroy<D: Dom<Node = N>>(&self, dom: &D) {
        if self.is_attached(dom) {
            dom.detach(&self.node);
        }
    }
}
