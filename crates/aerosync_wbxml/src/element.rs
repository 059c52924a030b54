//! The element tree that the codec serializes.

/// Content carried by an element.
///
/// The protocol never mixes text and child elements inside one element,
/// so the two are modeled as exclusive variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Marker element with no value and no children.
    Empty,
    /// Inline text value.
    Text(String),
    /// Ordered child elements.
    Children(Vec<Element>),
}

/// One node of a protocol element tree.
///
/// Every element is annotated with the code page its tag belongs to; the
/// encoder emits page-switch instructions whenever a subtree crosses into
/// a different page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Code page index the tag is defined on.
    pub page: u8,
    /// Element name as defined in the code page table.
    pub tag: &'static str,
    /// The element's content.
    pub content: Content,
}

impl Element {
    /// Creates an empty marker element.
    pub fn empty(page: u8, tag: &'static str) -> Self {
        Self {
            page,
            tag,
            content: Content::Empty,
        }
    }

    /// Creates an element with an inline text value.
    pub fn text(page: u8, tag: &'static str, value: impl Into<String>) -> Self {
        Self {
            page,
            tag,
            content: Content::Text(value.into()),
        }
    }

    /// Creates a container element with child elements.
    pub fn container(page: u8, tag: &'static str, children: Vec<Element>) -> Self {
        Self {
            page,
            tag,
            content: Content::Children(children),
        }
    }

    /// Appends a child, converting `Empty` or `Text` content if necessary.
    ///
    /// Converting a text element to a container drops the text; callers
    /// only use this on elements built as containers.
    pub fn push(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
    }

    /// Returns the inline text value, if this is a text element.
    pub fn value(&self) -> Option<&str> {
        match &self.content {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the child elements, or an empty slice for non-containers.
    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Children(c) => c,
            _ => &[],
        }
    }

    /// Finds the first direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children().iter().find(|c| c.tag == tag)
    }

    /// Returns all direct children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children().iter().filter(move |c| c.tag == tag)
    }

    /// Returns the text value of the first direct child with the given tag.
    pub fn child_value(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Element::value)
    }

    /// Returns true if a direct child with the given tag exists.
    pub fn has_child(&self, tag: &str) -> bool {
        self.child(tag).is_some()
    }
}
