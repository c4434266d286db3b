//! Pickup eligibility

use crate::dom::Dom;
use crate::membership::Membership;

/// Tags that cannot be reordered as siblings
const UNSORTABLE_TAGS: &[&str] = &["thead", "tbody", "tfoot", "colgroup", "html", "head", "body"];

/// Whether elements of this tag kind can be reordered at all
pub fn is_sortable_tag(tag: &str) -> bool {
    !UNSORTABLE_TAGS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Whether `node` may be picked up.
///
/// The path from `node` upward is checked for `disabled_class`. The walk stops
/// at the pickup boundary (checked) or the body (not checked), whichever is
/// reached first. The node must also be owned by the instance.
pub fn is_draggable<D: Dom>(
    dom: &D,
    membership: &Membership<D::Node>,
    node: &D::Node,
    disabled_class: &str,
) -> bool {
    let body = dom.body();
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if body.as_ref() == Some(&candidate) {
            break;
        }
        if !disabled_class.is_empty() && dom.has_class(&candidate, disabled_class) {
            return false;
        }
        if membership.boundary() == Some(&candidate) {
            break;
        }
        current = dom.parent(&candidate);
    }

    membership.is_owned(dom, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use crate::tagger::InstanceMarker;

    #[test]
    fn test_unsortable_tags() {
        for tag in ["tbody", "THEAD", "tfoot", "colgroup", "body", "head", "html"] {
            assert!(!is_sortable_tag(tag), "{tag} should be rejected");
        }
        for tag in ["li", "tr", "td", "div", "section"] {
            assert!(is_sortable_tag(tag), "{tag} should be accepted");
        }
    }

    #[test]
    fn test_disabled_ancestor_blocks_pickup() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let wrapper = dom.append_element(dom.body_node(), "div");
        let ul = dom.append_element(wrapper, "ul");
        let li = dom.append_element(ul, "li");
        marker.tag_managed(&dom, &li).unwrap();
        let membership = Membership::new(marker, None);

        assert!(is_draggable(&dom, &membership, &li, "sortable-disabled"));

        dom.add_class(&wrapper, "sortable-disabled");
        assert!(!is_draggable(&dom, &membership, &li, "sortable-disabled"));

        dom.remove_class(&wrapper, "sortable-disabled");
        dom.add_class(&li, "sortable-disabled");
        assert!(!is_draggable(&dom, &membership, &li, "sortable-disabled"));
    }

    #[test]
    fn test_walk_stops_at_boundary() {
        let dom = MemoryDom::new();
        let marker = InstanceMarker::from_class("sortable-a");
        let wrapper = dom.append_element(dom.body_node(), "div");
        let ul = dom.append_element(wrapper, "ul");
        let li = dom.append_element(ul, "li");
        marker.tag_managed(&dom, &li).unwrap();
        dom.add_class(&wrapper, "sortable-disabled");

        let bounded = Membership::new(marker.clone(), Some(ul));
        assert!(is_draggable(&dom, &bounded, &li, "sortable-disabled"));

        dom.add_class(&ul, "sortable-disabled");
        assert!(!is_draggable(&dom, &bounded, &li, "sortable-disabled"));
    }

    #[test]
    fn test_unowned_element_is_not_draggable() {
        let dom = MemoryDom::new();
        let li = dom.append_element(dom.body_node(), "li");
        let membership = Membership::new(InstanceMarker::from_class("sortable-a"), None);

        assert!(!is_draggable(&dom, &membership, &li, "sortable-disabled"));
    }
}
