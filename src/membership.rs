//! Instance membership
//!
//! Decides the single delegation root an instance listens on and whether a
//! given element belongs to the instance.

use crate::dom::Dom;
use crate::tagger::InstanceMarker;

/// Find the delegation root for `items`.
///
/// An explicit selector wins (first document-wide match). Otherwise the
/// ancestors of the first item are tried nearest-first, and the first one
/// that contains every item, with every item carrying `marker`, is the root.
pub fn resolve_root<D: Dom>(
    dom: &D,
    items: &[D::Node],
    marker: &InstanceMarker,
    explicit: Option<&str>,
) -> Option<D::Node> {
    if let Some(selector) = explicit {
        return dom.query_selector(selector);
    }

    let first = items.first()?;
    let mut candidate = dom.parent(first);
    while let Some(ancestor) = candidate {
        let covers_all = items
            .iter()
            .all(|item| dom.contains(&ancestor, item) && marker.is_on(dom, item));
        if covers_all {
            return Some(ancestor);
        }
        candidate = dom.parent(&ancestor);
    }
    None
}

/// Ownership rules for one instance
#[derive(Debug, Clone)]
pub struct Membership<N> {
    marker: InstanceMarker,
    /// Containment element from `pickup.parent`, when configured
    boundary: Option<N>,
}

impl<N: Clone + PartialEq> Membership<N> {
    pub fn new(marker: InstanceMarker, boundary: Option<N>) -> Self {
        Self { marker, boundary }
    }

    pub fn marker(&self) -> &InstanceMarker {
        &self.marker
    }

    pub fn boundary(&self) -> Option<&N> {
        self.boundary.as_ref()
    }

    /// True when the element carries the marker and sits inside the boundary
    pub fn is_owned<D: Dom<Node = N>>(&self, dom: &D, node: &N) -> bool {
        let inside = self
            .boundary
            .as_ref()
            .map_or(true, |boundary| dom.contains(boundary, node));
        inside && self.marker.is_on(dom, node)
    }

    /// Nearest marked ancestor of `node` (inclusive), not looking past `root`
    pub fn marked_ancestor<D: Dom<Node = N>>(&self, dom: &D, node: &N, root: &N) -> Option<N> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.marker.is_on(dom, &candidate) {
                return Some(candidate);
            }
            if candidate == *root {
                return None;
            }
            current = dom.parent(&candidate);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use indextree::NodeId;

    fn tagged_list(dom: &MemoryDom, marker: &InstanceMarker) -> (NodeId, NodeId, Vec<NodeId>) {
        let section = dom.append_element(dom.body_node(), "section");
        let ul = dom.append_element(section, "ul");
        let items: Vec<NodeId> = (0..3).map(|_| dom.append_element(ul, "li")).collect();
        for item in &items {
            marker.tag_managed(dom, item).unwrap();
        }
        (section, ul, items)
    }

    #[test]
    fn test_root_is_nearest_common_ancestor() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let (_, ul, items) = tagged_list(&dom, &marker);

        assert_eq!(resolve_root(&dom, &items, &marker, None), Some(ul));
    }

    #[test]
    fn test_root_widens_for_items_in_different_lists() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let (section, _, mut items) = tagged_list(&dom, &marker);
        let other = dom.append_element(section, "ul");
        let stray = dom.append_element(other, "li");
        marker.tag_managed(&dom, &stray).unwrap();
        items.push(stray);

        assert_eq!(resolve_root(&dom, &items, &marker, None), Some(section));
    }

    #[test]
    fn test_root_requires_every_item_tagged() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let (_, ul, mut items) = tagged_list(&dom, &marker);
        items.push(dom.append_element(ul, "li"));

        assert_eq!(resolve_root(&dom, &items, &marker, None), None);
    }

    #[test]
    fn test_explicit_selector_wins() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let (section, _, items) = tagged_list(&dom, &marker);
        dom.add_class(&section, "board");

        assert_eq!(resolve_root(&dom, &items, &marker, Some(".board")), Some(section));
        assert_eq!(resolve_root(&dom, &items, &marker, Some(".missing")), None);
    }

    #[test]
    fn test_ownership_respects_marker_and_boundary() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let (_, ul, items) = tagged_list(&dom, &marker);
        let outside = dom.append_element(dom.body_node(), "li");
        marker.tag_managed(&dom, &outside).unwrap();

        let unbounded = Membership::new(marker.clone(), None);
        assert!(unbounded.is_owned(&dom, &items[0]));
        assert!(unbounded.is_owned(&dom, &outside));

        let bounded = Membership::new(marker.clone(), Some(ul));
        assert!(bounded.is_owned(&dom, &items[0]));
        assert!(!bounded.is_owned(&dom, &outside));

        let foreign = Membership::new(InstanceMarker::from_class("sortable-b"), None);
        assert!(!foreign.is_owned(&dom, &items[0]));
    }

    #[test]
    fn test_marked_ancestor_finds_item_from_nested_target() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let (_, ul, items) = tagged_list(&dom, &marker);
        let span = dom.append_element(items[1], "span");
        let membership = Membership::new(marker, None);

        assert_eq!(membership.marked_ancestor(&dom, &span, &ul), Some(items[1]));
        assert_eq!(membership.marked_ancestor(&dom, &ul, &ul), None);
    }
}
