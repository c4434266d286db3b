//! CSS selector matching for the arena document
//!
//! Selector lists are parsed and matched by the `selectors` crate; this module
//! only exposes arena nodes through [`selectors::Element`].

use cssparser::{Parser, ParserInput};
use indextree::{Arena, NodeId};
use selectors::attr::{AttrSelectorOperation, AttrSelectorOperator, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    matches_selector, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode,
    NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorList, SelectorParseErrorKind};
use selectors::{NthIndexCache, OpaqueElement};

use super::{ElementData, NodeData};

pub(super) type Selectors = SelectorList<ArenaSelectors>;

/// Parse a selector list; `None` for anything the parser rejects
pub(super) fn parse(text: &str) -> Option<Selectors> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    SelectorList::parse(&SelectorParser, &mut parser, ParseRelative::No).ok()
}

pub(super) fn matches(selectors: &Selectors, arena: &Arena<NodeData>, node: NodeId) -> bool {
    let Some(element) = ArenaElement::new(arena, node) else {
        return false;
    };

    let mut nth_index_cache = NthIndexCache::default();
    let mut context = MatchingContext::new(
        MatchingMode::Normal,
        None,
        &mut nth_index_cache,
        QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        IgnoreNthChildForInvalidation::No,
    );

    selectors
        .0
        .iter()
        .any(|selector| matches_selector(selector, 0, None, &element, &mut context))
}

/// An element node of the arena, as seen by the selector engine
#[derive(Clone, Copy)]
pub(super) struct ArenaElement<'a> {
    arena: &'a Arena<NodeData>,
    node: NodeId,
    data: &'a ElementData,
}

impl std::fmt::Debug for ArenaElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaElement")
            .field("node", &self.node)
            .field("tag", &self.data.tag)
            .finish_non_exhaustive()
    }
}

impl<'a> ArenaElement<'a> {
    fn new(arena: &'a Arena<NodeData>, node: NodeId) -> Option<Self> {
        let data = arena.get(node)?.get().element()?;
        Some(Self { arena, node, data })
    }

    fn wrap(&self, node: NodeId) -> Option<Self> {
        Self::new(self.arena, node)
    }

    /// Attribute value; `class` is served from the class list
    fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return (!self.data.classes.is_empty()).then(|| self.data.classes.join(" "));
        }
        self.data
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn is_tag(&self, tag: &str) -> bool {
        self.data.tag == tag
    }
}

fn text_matches(
    operator: AttrSelectorOperator,
    case_sensitivity: CaseSensitivity,
    actual: &str,
    expected: &str,
) -> bool {
    let (actual, expected) = match case_sensitivity {
        CaseSensitivity::CaseSensitive => (actual.to_string(), expected.to_string()),
        CaseSensitivity::AsciiCaseInsensitive => {
            (actual.to_ascii_lowercase(), expected.to_ascii_lowercase())
        }
    };
    match operator {
        AttrSelectorOperator::Equal => actual == expected,
        AttrSelectorOperator::Includes => actual.split_whitespace().any(|part| part == expected),
        AttrSelectorOperator::DashMatch => {
            actual == expected || actual.starts_with(&format!("{expected}-"))
        }
        AttrSelectorOperator::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttrSelectorOperator::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttrSelectorOperator::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

fn name_matches(case_sensitivity: CaseSensitivity, actual: &str, expected: &str) -> bool {
    match case_sensitivity {
        CaseSensitivity::CaseSensitive => actual == expected,
        CaseSensitivity::AsciiCaseInsensitive => actual.eq_ignore_ascii_case(expected),
    }
}

impl selectors::Element for ArenaElement<'_> {
    type Impl = ArenaSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.data)
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.arena.get(self.node)?.parent()?;
        self.wrap(parent)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.node
            .preceding_siblings(self.arena)
            .skip(1)
            .find_map(|id| self.wrap(id))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.node
            .following_siblings(self.arena)
            .skip(1)
            .find_map(|id| self.wrap(id))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.node.children(self.arena).find_map(|id| self.wrap(id))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.is_tag(local_name)
    }

    fn has_namespace(&self, _ns: &()) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.tag == other.data.tag
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&()>,
        local_name: &SelectorString,
        operation: &AttrSelectorOperation<&SelectorString>,
    ) -> bool {
        let Some(actual) = self.attribute(&local_name.0) else {
            return false;
        };
        match operation {
            AttrSelectorOperation::Exists => true,
            AttrSelectorOperation::WithValue {
                operator,
                case_sensitivity,
                value,
            } => text_matches(*operator, *case_sensitivity, &actual, &value.0),
        }
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: selectors::matching::ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        (self.is_tag("a") || self.is_tag("area")) && self.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.is_tag("slot")
    }

    fn has_id(&self, id: &SelectorString, case_sensitivity: CaseSensitivity) -> bool {
        self.attribute("id")
            .is_some_and(|actual| name_matches(case_sensitivity, &actual, &id.0))
    }

    fn has_class(&self, name: &SelectorString, case_sensitivity: CaseSensitivity) -> bool {
        self.data
            .classes
            .iter()
            .any(|class| name_matches(case_sensitivity, class, &name.0))
    }

    fn imported_part(&self, _name: &SelectorString) -> Option<SelectorString> {
        None
    }

    fn is_part(&self, _name: &SelectorString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.node
            .children(self.arena)
            .all(|id| match self.arena.get(id).map(|n| n.get()) {
                Some(NodeData::Element(_)) => false,
                Some(NodeData::Text(text)) => text.is_empty(),
                None => true,
            })
    }

    fn is_root(&self) -> bool {
        self.is_tag("html") && self.arena.get(self.node).and_then(|n| n.parent()).is_none()
    }
}

/// Identifier, name and value strings of parsed selectors
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(super) struct SelectorString(String);

impl From<&str> for SelectorString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::borrow::Borrow<str> for SelectorString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl cssparser::ToCss for SelectorString {
    fn to_css<W>(&self, dest: &mut W) -> std::fmt::Result
    where
        W: std::fmt::Write,
    {
        cssparser::serialize_string(&self.0, dest)
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct ArenaSelectors;

impl selectors::SelectorImpl for ArenaSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = SelectorString;
    type Identifier = SelectorString;
    type LocalName = SelectorString;
    type NamespacePrefix = SelectorString;
    type NamespaceUrl = ();
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = ();
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// No pseudo-classes are supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = ArenaSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> std::fmt::Result
    where
        W: std::fmt::Write,
    {
        match *self {}
    }
}

/// No pseudo-elements are supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum PseudoElement {}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = ArenaSelectors;
}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> std::fmt::Result
    where
        W: std::fmt::Write,
    {
        match *self {}
    }
}

struct SelectorParser;

impl<'i> selectors::parser::Parser<'i> for SelectorParser {
    type Impl = ArenaSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_non_ts_pseudo_class(
        &self,
        location: cssparser::SourceLocation,
        name: cssparser::CowRcStr<'i>,
    ) -> Result<NonTSPseudoClass, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn parse_pseudo_element(
        &self,
        location: cssparser::SourceLocation,
        name: cssparser::CowRcStr<'i>,
    ) -> Result<PseudoElement, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(location.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn parse_non_ts_functional_pseudo_class<'t>(
        &self,
        name: cssparser::CowRcStr<'i>,
        parser: &mut Parser<'i, 't>,
    ) -> Result<NonTSPseudoClass, cssparser::ParseError<'i, SelectorParseErrorKind<'i>>> {
        Err(parser.new_custom_error(SelectorParseErrorKind::UnsupportedPseudoClassOrElement(name)))
    }

    fn default_namespace(&self) -> Option<()> {
        None
    }

    fn namespace_for_prefix(&self, _prefix: &SelectorString) -> Option<()> {
        None
    }
}
