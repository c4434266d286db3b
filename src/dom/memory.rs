//! Headless arena DOM
//!
//! `MemoryDom` keeps element and text nodes in an `indextree` arena behind a
//! shared `Rc<RefCell<..>>`, so clones of the handle see the same document.
//! It supports the subset of the platform the sortable core relies on:
//! `querySelector` through the `selectors` crate, and animation frames that
//! run only when the caller asks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indextree::{Arena, NodeId};

use super::Dom;
use crate::error::SortableError;

mod selector;

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    size: (f64, f64),
}

impl NodeData {
    fn element(&self) -> Option<&ElementData> {
        match self {
            NodeData::Element(data) => Some(data),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            NodeData::Element(data) => Some(data),
            NodeData::Text(_) => None,
        }
    }
}

/// In-memory document with an `<html>` root and a `<body>`
#[derive(Debug, Clone)]
pub struct MemoryDom {
    arena: Rc<RefCell<Arena<NodeData>>>,
    document: NodeId,
    body: NodeId,
    pending_frames: Rc<RefCell<Vec<NodeId>>>,
}

/// Synthetic drag event for [`MemoryDom`]
#[derive(Debug)]
pub struct MemoryDragEvent {
    target: NodeId,
    client_y: f64,
    default_prevented: Cell<bool>,
    drag_image: Cell<Option<NodeId>>,
}

impl MemoryDragEvent {
    pub fn new(target: NodeId, client_y: f64) -> Self {
        Self {
            target,
            client_y,
            default_prevented: Cell::new(false),
            drag_image: Cell::new(None),
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Drag image handed to the platform by `begin_native_drag`
    pub fn drag_image(&self) -> Option<NodeId> {
        self.drag_image.get()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeData::Element(ElementData {
            tag: "html".to_string(),
            ..ElementData::default()
        }));
        let body = arena.new_node(NodeData::Element(ElementData {
            tag: "body".to_string(),
            ..ElementData::default()
        }));
        document.append(body, &mut arena);

        Self {
            arena: Rc::new(RefCell::new(arena)),
            document,
            body,
            pending_frames: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The document's `<body>`
    pub fn body_node(&self) -> NodeId {
        self.body
    }

    /// Create a detached element
    pub fn element(&self, tag: &str) -> NodeId {
        self.arena.borrow_mut().new_node(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        }))
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.element(tag);
        parent.append(node, &mut self.arena.borrow_mut());
        node
    }

    /// Element children of `parent`, in order
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let arena = self.arena.borrow();
        let children = parent
            .children(&arena)
            .filter(|id| is_element(&arena, *id))
            .collect();
        children
    }

    /// Whether the node is connected to the document
    pub fn is_attached(&self, node: NodeId) -> bool {
        let arena = self.arena.borrow();
        let attached = node.ancestors(&arena).any(|id| id == self.document);
        attached
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.with_element(node, |data| data.classes.clone())
            .unwrap_or_default()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_element(node, |data| {
            data.styles
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, value)| value.clone())
        })
        .flatten()
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        let arena = self.arena.borrow();
        let text = node
            .descendants(&arena)
            .filter_map(|id| match arena.get(id).map(|n| n.get()) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        text
    }

    pub fn set_size(&self, node: NodeId, width: f64, height: f64) {
        self.with_element_mut(node, |data| data.size = (width, height));
    }

    pub fn pending_frame_count(&self) -> usize {
        self.pending_frames.borrow().len()
    }

    /// Run the deferred work scheduled for the next frame
    pub fn run_animation_frame(&self) {
        let due: Vec<NodeId> = self.pending_frames.borrow_mut().drain(..).collect();
        for node in due {
            self.detach(&node);
        }
    }

    fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        let arena = self.arena.borrow();
        arena.get(node).and_then(|n| n.get().element()).map(f)
    }

    fn with_element_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut ElementData) -> R) -> Option<R> {
        let mut arena = self.arena.borrow_mut();
        arena
            .get_mut(node)
            .and_then(|n| n.get_mut().element_mut())
            .map(f)
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

fn is_element(arena: &Arena<NodeData>, id: NodeId) -> bool {
    matches!(arena.get(id).map(|n| n.get()), Some(NodeData::Element(_)))
}

fn clone_subtree(arena: &mut Arena<NodeData>, source: NodeId) -> NodeId {
    let data = arena[source].get().clone();
    let copy = arena.new_node(data);
    let children: Vec<NodeId> = source.children(arena).collect();
    for child in children {
        let child_copy = clone_subtree(arena, child);
        copy.append(child_copy, arena);
    }
    copy
}

impl Dom for MemoryDom {
    type Node = NodeId;
    type Event = MemoryDragEvent;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.arena.borrow().get(*node)?.parent()
    }

    fn previous_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let arena = self.arena.borrow();
        let found = node
            .preceding_siblings(&arena)
            .skip(1)
            .find(|id| is_element(&arena, *id));
        found
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let arena = self.arena.borrow();
        let found = node
            .following_siblings(&arena)
            .skip(1)
            .find(|id| is_element(&arena, *id));
        found
    }

    fn child_element_count(&self, node: &NodeId) -> usize {
        self.children(*node).len()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let arena = self.arena.borrow();
        let found = node.ancestors(&arena).any(|id| id == *ancestor);
        found
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.with_element(*node, |data| data.tag.clone())
            .unwrap_or_else(|| "#text".to_string())
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn query_selector(&self, text: &str) -> Option<NodeId> {
        let selectors = selector::parse(text)?;
        let arena = self.arena.borrow();
        let found = self
            .document
            .descendants(&arena)
            .find(|id| selector::matches(&selectors, &arena, *id));
        found
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.with_element(*node, |data| data.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        self.with_element_mut(*node, |data| {
            if !data.classes.iter().any(|c| c == class) {
                data.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.with_element_mut(*node, |data| data.classes.retain(|c| c != class));
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_element(*node, |data| {
            data.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
        .flatten()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), SortableError> {
        self.with_element_mut(*node, |data| {
            match data.attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => data.attributes.push((name.to_string(), value.to_string())),
            }
        })
        .ok_or_else(|| SortableError::Dom(format!("cannot set `{name}` on a text node")))
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.with_element_mut(*node, |data| {
            match data.styles.iter_mut().find(|(key, _)| key == property) {
                Some((_, existing)) => *existing = value.to_string(),
                None => data.styles.push((property.to_string(), value.to_string())),
            }
        });
    }

    fn rendered_size(&self, node: &NodeId) -> (f64, f64) {
        self.with_element(*node, |data| data.size).unwrap_or((0.0, 0.0))
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, SortableError> {
        Ok(self.element(tag))
    }

    fn append_text(&self, parent: &NodeId, text: &str) -> Result<(), SortableError> {
        let mut arena = self.arena.borrow_mut();
        let text = arena.new_node(NodeData::Text(text.to_string()));
        parent
            .checked_append(text, &mut arena)
            .map_err(|e| SortableError::Dom(format!("{e:?}")))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), SortableError> {
        let mut arena = self.arena.borrow_mut();
        child.detach(&mut arena);
        parent
            .checked_append(*child, &mut arena)
            .map_err(|e| SortableError::Dom(format!("{e:?}")))
    }

    fn insert_before(
        &self,
        parent: &NodeId,
        node: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<(), SortableError> {
        let Some(reference) = reference else {
            return self.append_child(parent, node);
        };
        if reference == node {
            return Ok(());
        }

        let mut arena = self.arena.borrow_mut();
        if arena.get(*reference).and_then(|n| n.parent()) != Some(*parent) {
            return Err(SortableError::Dom(
                "reference node is not a child of the parent".to_string(),
            ));
        }
        node.detach(&mut arena);
        reference
            .checked_insert_before(*node, &mut arena)
            .map_err(|e| SortableError::Dom(format!("{e:?}")))
    }

    fn detach(&self, node: &NodeId) {
        node.detach(&mut self.arena.borrow_mut());
    }

    fn clone_deep(&self, node: &NodeId) -> Result<NodeId, SortableError> {
        let mut arena = self.arena.borrow_mut();
        if arena.get(*node).is_none() {
            return Err(SortableError::Dom("cannot clone a removed node".to_string()));
        }
        Ok(clone_subtree(&mut arena, *node))
    }

    fn event_target(&self, event: &MemoryDragEvent) -> Option<NodeId> {
        if is_element(&self.arena.borrow(), event.target) {
            Some(event.target)
        } else {
            self.parent(&event.target)
        }
    }

    fn event_client_y(&self, event: &MemoryDragEvent) -> f64 {
        event.client_y
    }

    fn prevent_default(&self, event: &MemoryDragEvent) {
        event.default_prevented.set(true);
    }

    fn begin_native_drag(&self, event: &MemoryDragEvent, drag_image: &NodeId) {
        event.drag_image.set(Some(*drag_image));
    }

    fn detach_next_frame(&self, node: &NodeId) {
        self.pending_frames.borrow_mut().push(*node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(dom: &MemoryDom) -> (NodeId, Vec<NodeId>) {
        let ul = dom.append_element(dom.body_node(), "ul");
        let items = (0..3).map(|_| dom.append_element(ul, "li")).collect();
        (ul, items)
    }

    #[test]
    fn test_sibling_navigation_skips_text() {
        let dom = MemoryDom::new();
        let ul = dom.append_element(dom.body_node(), "ul");
        let a = dom.append_element(ul, "li");
        dom.append_text(&ul, "\n  ").unwrap();
        let b = dom.append_element(ul, "li");

        assert_eq!(dom.next_sibling(&a), Some(b));
        assert_eq!(dom.previous_sibling(&b), Some(a));
        assert_eq!(dom.previous_sibling(&a), None);
        assert_eq!(dom.child_element_count(&ul), 2);
    }

    #[test]
    fn test_insert_before_moves_node() {
        let dom = MemoryDom::new();
        let (ul, items) = list(&dom);

        dom.insert_before(&ul, &items[2], Some(&items[0])).unwrap();
        assert_eq!(dom.children(ul), vec![items[2], items[0], items[1]]);

        dom.insert_before(&ul, &items[2], None).unwrap();
        assert_eq!(dom.children(ul), items);
    }

    #[test]
    fn test_insert_before_rejects_foreign_reference() {
        let dom = MemoryDom::new();
        let (ul, items) = list(&dom);
        let other = dom.append_element(dom.body_node(), "div");

        let result = dom.insert_before(&other, &items[0], Some(&items[1]));
        assert!(matches!(result, Err(SortableError::Dom(_))));
        assert_eq!(dom.children(ul), items);
    }

    #[test]
    fn test_query_selector_compound() {
        let dom = MemoryDom::new();
        let (ul, _) = list(&dom);
        dom.add_class(&ul, "todo");
        dom.set_attribute(&ul, "id", "main").unwrap();

        assert_eq!(dom.query_selector("ul"), Some(ul));
        assert_eq!(dom.query_selector(".todo"), Some(ul));
        assert_eq!(dom.query_selector("ul.todo#main"), Some(ul));
        assert_eq!(dom.query_selector("#other"), None);
    }

    #[test]
    fn test_query_selector_combinators_and_attributes() {
        let dom = MemoryDom::new();
        let section = dom.append_element(dom.body_node(), "section");
        let (ul, items) = list(&dom);
        dom.set_attribute(&items[1], "data-id", "b").unwrap();
        dom.add_class(&items[2], "done");

        assert_eq!(dom.query_selector("body > ul"), Some(ul));
        assert_eq!(dom.query_selector("section ul"), None);
        assert_eq!(dom.query_selector("ul li[data-id=b]"), Some(items[1]));
        assert_eq!(dom.query_selector("li + li.done"), Some(items[2]));
        assert_eq!(dom.query_selector("[class~=done]"), Some(items[2]));
        assert_eq!(dom.query_selector("section, li"), Some(section));
        assert_eq!(dom.query_selector("li:hover"), None);
        assert_eq!(dom.query_selector("ul >"), None);
    }

    #[test]
    fn test_clone_deep_copies_subtree_detached() {
        let dom = MemoryDom::new();
        let (_, items) = list(&dom);
        dom.add_class(&items[0], "card");
        dom.append_text(&items[0], "Alpha").unwrap();

        let copy = dom.clone_deep(&items[0]).unwrap();
        assert_ne!(copy, items[0]);
        assert!(!dom.is_attached(copy));
        assert!(dom.has_class(&copy, "card"));
        assert_eq!(dom.text_content(copy), "Alpha");
    }

    #[test]
    fn test_animation_frame_detaches_pending_nodes() {
        let dom = MemoryDom::new();
        let image = dom.append_element(dom.body_node(), "li");

        dom.detach_next_frame(&image);
        assert!(dom.is_attached(image));
        assert_eq!(dom.pending_frame_count(), 1);

        dom.run_animation_frame();
        assert!(!dom.is_attached(image));
        assert_eq!(dom.pending_frame_count(), 0);
    }
}
