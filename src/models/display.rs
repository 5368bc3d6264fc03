//! Display tree produced by the safe markdown renderer.
//!
//! Element kinds and attribute names are closed enums: the tree can only
//! describe the markup the renderer knows how to emit. There is no way to
//! express a script, frame or image element, nor an event-handler attribute.

/// Element kinds the renderer can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Paragraph,
    /// Heading with level 1..=6
    Heading(u8),
    BlockQuote,
    CodeBlock,
    OrderedList,
    UnorderedList,
    ListItem,
    Emphasis,
    Strong,
    Strikethrough,
    InlineCode,
    Anchor,
    LineBreak,
    Rule,
}

/// Node kinds addressable by the render override table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Paragraph,
    Heading,
    BlockQuote,
    CodeBlock,
    List,
    ListItem,
    Emphasis,
    Strong,
    Strikethrough,
    Code,
    Link,
    LineBreak,
    Rule,
}

impl ElementKind {
    /// HTML tag name used when serializing.
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::Heading(1) => "h1",
            Self::Heading(2) => "h2",
            Self::Heading(3) => "h3",
            Self::Heading(4) => "h4",
            Self::Heading(5) => "h5",
            Self::Heading(_) => "h6",
            Self::BlockQuote => "blockquote",
            Self::CodeBlock => "pre",
            Self::OrderedList => "ol",
            Self::UnorderedList => "ul",
            Self::ListItem => "li",
            Self::Emphasis => "em",
            Self::Strong => "strong",
            Self::Strikethrough => "del",
            Self::InlineCode => "code",
            Self::Anchor => "a",
            Self::LineBreak => "br",
            Self::Rule => "hr",
        }
    }

    pub fn node_kind(self) -> NodeKind {
        match self {
            Self::Paragraph => NodeKind::Paragraph,
            Self::Heading(_) => NodeKind::Heading,
            Self::BlockQuote => NodeKind::BlockQuote,
            Self::CodeBlock => NodeKind::CodeBlock,
            Self::OrderedList | Self::UnorderedList => NodeKind::List,
            Self::ListItem => NodeKind::ListItem,
            Self::Emphasis => NodeKind::Emphasis,
            Self::Strong => NodeKind::Strong,
            Self::Strikethrough => NodeKind::Strikethrough,
            Self::InlineCode => NodeKind::Code,
            Self::Anchor => NodeKind::Link,
            Self::LineBreak => NodeKind::LineBreak,
            Self::Rule => NodeKind::Rule,
        }
    }

    /// Void elements have no children and no closing tag.
    pub fn is_void(self) -> bool {
        matches!(self, Self::LineBreak | Self::Rule)
    }
}

/// Attribute names the renderer can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrName {
    Href,
    Title,
    Target,
    Rel,
    Class,
    Start,
}

impl AttrName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Href => "href",
            Self::Title => "title",
            Self::Target => "target",
            Self::Rel => "rel",
            Self::Class => "class",
            Self::Start => "start",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub name: AttrName,
    pub value: String,
}

/// A node of the display tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    fn push_text_content(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.push_text_content(out);
                }
            }
        }
    }

    fn push_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&ammonia::clean_text(text)),
            Self::Element(element) => element.push_html(out),
        }
    }
}

/// An element with typed attributes and child nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: AttrName, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: AttrName) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: AttrName, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr { name, value }),
        }
    }

    /// Append a class to the space-separated class list.
    pub fn add_class(&mut self, class: &str) {
        let classes = match self.attr(AttrName::Class) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr(AttrName::Class, classes);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr(AttrName::Class)
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text_content(&mut out);
        }
        out
    }

    fn push_html(&self, out: &mut String) {
        let tag = self.kind.tag_name();
        out.push('<');
        out.push_str(tag);
        for attr in &self.attrs {
            out.push(' ');
            out.push_str(attr.name.as_str());
            out.push_str("=\"");
            out.push_str(&ammonia::clean_text(&attr.value));
            out.push('"');
        }
        out.push('>');
        if self.kind.is_void() {
            return;
        }
        // Code blocks serialize as <pre><code>...</code></pre>
        if self.kind == ElementKind::CodeBlock {
            out.push_str("<code>");
        }
        for child in &self.children {
            child.push_html(out);
        }
        if self.kind == ElementKind::CodeBlock {
            out.push_str("</code>");
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

/// Root of a rendered document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayTree {
    pub children: Vec<Node>,
}

impl DisplayTree {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal over every node in the tree.
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut nodes = Vec::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            nodes.push(node);
            if let Node::Element(element) = node {
                stack.extend(element.children.iter().rev());
            }
        }
        nodes.into_iter()
    }

    /// All elements of the given node kind, in document order.
    pub fn find_all(&self, kind: NodeKind) -> Vec<&Element> {
        self.walk()
            .filter_map(Node::as_element)
            .filter(|element| element.kind.node_kind() == kind)
            .collect()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text_content(&mut out);
        }
        out
    }

    /// Serialize to HTML. Every text run and attribute value is escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_html(&mut out);
        }
        out
    }
}
