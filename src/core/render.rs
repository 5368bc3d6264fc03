//! Safe markdown rendering.
//!
//! Markdown is parsed with `pulldown-cmark` and folded into a [`DisplayTree`].
//! Each finished element is passed through a [`RenderOverrides`] table, which
//! is where styling and the link security policy are applied. The secure table
//! is the only place link targets are checked.
//!
//! Raw HTML in the markdown is never interpreted; it is kept as literal text.
//! Images are reduced to their alt text. Elements nested deeper than
//! [`MAX_NESTING_DEPTH`] are flattened into their parent, so the tree stays
//! shallow no matter how many blockquote or list markers a body stacks up.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::config::{DISALLOWED_LINK_SCHEMES, LINK_REL, LINK_TARGET, MAX_NESTING_DEPTH, classes};
use crate::core::convert::convert;
use crate::models::{AttrName, DisplayTree, Element, ElementKind, Node, NodeKind};

/// A rendering rule. Receives the default-built element and returns the node
/// to emit in its place, or `None` to drop it with all its children.
pub type RenderRule = Arc<dyn Fn(Element) -> Option<Node> + Send + Sync>;

/// Mapping from node kind to rendering rule.
///
/// Kinds without a rule render with default behavior.
#[derive(Clone)]
pub struct RenderOverrides {
    rules: HashMap<NodeKind, RenderRule>,
}

impl RenderOverrides {
    /// A table with no rules: every node renders with default behavior.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// The notification table: styled emphasis and policed links.
    pub fn secure() -> Self {
        Self::empty()
            .with_rule(NodeKind::Emphasis, emphasis_rule)
            .with_rule(NodeKind::Link, link_rule)
    }

    /// Add or replace the rule for `kind`.
    pub fn with_rule(
        mut self,
        kind: NodeKind,
        rule: impl Fn(Element) -> Option<Node> + Send + Sync + 'static,
    ) -> Self {
        self.rules.insert(kind, Arc::new(rule));
        self
    }

    fn apply(&self, element: Element) -> Option<Node> {
        match self.rules.get(&element.kind.node_kind()) {
            Some(rule) => rule(element),
            None => Some(Node::Element(element)),
        }
    }
}

impl Default for RenderOverrides {
    fn default() -> Self {
        Self::secure()
    }
}

impl fmt::Debug for RenderOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.rules.keys()).finish()
    }
}

fn emphasis_rule(mut element: Element) -> Option<Node> {
    element.add_class(classes::EMPHASIS);
    Some(Node::Element(element))
}

fn link_rule(mut element: Element) -> Option<Node> {
    if element
        .attr(AttrName::Href)
        .is_some_and(is_disallowed_link)
    {
        return None;
    }
    element.set_attr(AttrName::Target, LINK_TARGET);
    element.set_attr(AttrName::Rel, LINK_REL);
    element.add_class(classes::LINK);
    Some(Node::Element(element))
}

/// Check whether a link target uses a disallowed scheme.
///
/// Leading and trailing whitespace and control characters are ignored, as are
/// tabs and newlines inside the scheme, matching how browsers parse URLs.
pub fn is_disallowed_link(href: &str) -> bool {
    let normalized: String = href
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .to_ascii_lowercase();

    DISALLOWED_LINK_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

/// An element or fragment still collecting children.
enum Pending {
    Element(Element),
    /// Transparent container: children are spliced into the parent.
    Fragment(Vec<Node>),
}

impl Pending {
    fn push(&mut self, node: Node) {
        match self {
            Self::Element(element) => push_merged(&mut element.children, node),
            Self::Fragment(children) => push_merged(children, node),
        }
    }
}

/// Append `node`, joining it with a preceding text node.
fn push_merged(children: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node
        && let Some(Node::Text(previous)) = children.last_mut()
    {
        previous.push_str(text);
        return;
    }
    children.push(node);
}

struct TreeBuilder<'a> {
    overrides: &'a RenderOverrides,
    stack: Vec<Pending>,
    /// Number of `Pending::Element` entries on the stack.
    depth: usize,
    root: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn new(overrides: &'a RenderOverrides) -> Self {
        Self {
            overrides,
            stack: Vec::new(),
            depth: 0,
            root: Vec::new(),
        }
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.push(node),
            None => push_merged(&mut self.root, node),
        }
    }

    fn push_text(&mut self, text: &str) {
        self.push(Node::text(text));
    }

    /// Emit a childless element through the override table.
    fn push_element(&mut self, element: Element) {
        if let Some(node) = self.overrides.apply(element) {
            self.push(node);
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        if self.depth >= MAX_NESTING_DEPTH {
            self.stack.push(Pending::Fragment(Vec::new()));
            return;
        }
        let pending = pending_for(tag);
        if matches!(pending, Pending::Element(_)) {
            self.depth += 1;
        }
        self.stack.push(pending);
    }

    fn close(&mut self) {
        match self.stack.pop() {
            Some(Pending::Element(element)) => {
                self.depth -= 1;
                self.push_element(element);
            }
            Some(Pending::Fragment(children)) => {
                for child in children {
                    self.push(child);
                }
            }
            None => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push_element(
                Element::new(ElementKind::InlineCode).with_child(Node::text(code.to_string())),
            ),
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.push_text(&math),
            Event::FootnoteReference(label) => self.push_text(&format!("[^{}]", label)),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push_element(Element::new(ElementKind::LineBreak)),
            Event::Rule => self.push_element(Element::new(ElementKind::Rule)),
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " })
            }
        }
    }

    fn finish(mut self) -> DisplayTree {
        // Close anything left open.
        while !self.stack.is_empty() {
            self.close();
        }
        DisplayTree::new(self.root)
    }
}

fn pending_for(tag: Tag<'_>) -> Pending {
    let element = match tag {
        Tag::Paragraph => Element::new(ElementKind::Paragraph),
        Tag::Heading { level, .. } => Element::new(ElementKind::Heading(level as u8)),
        Tag::BlockQuote(_) => Element::new(ElementKind::BlockQuote),
        Tag::CodeBlock(kind) => {
            let element = Element::new(ElementKind::CodeBlock);
            match kind {
                CodeBlockKind::Fenced(lang) => match code_language(&lang) {
                    Some(lang) => element.with_attr(
                        AttrName::Class,
                        format!("{}{}", classes::CODE_LANGUAGE_PREFIX, lang),
                    ),
                    None => element,
                },
                CodeBlockKind::Indented => element,
            }
        }
        Tag::List(Some(start)) => {
            let element = Element::new(ElementKind::OrderedList);
            if start == 1 {
                element
            } else {
                element.with_attr(AttrName::Start, start.to_string())
            }
        }
        Tag::List(None) => Element::new(ElementKind::UnorderedList),
        Tag::Item => Element::new(ElementKind::ListItem),
        Tag::Emphasis => Element::new(ElementKind::Emphasis),
        Tag::Strong => Element::new(ElementKind::Strong),
        Tag::Strikethrough => Element::new(ElementKind::Strikethrough),
        Tag::Link {
            dest_url, title, ..
        } => {
            let element =
                Element::new(ElementKind::Anchor).with_attr(AttrName::Href, dest_url.to_string());
            if title.is_empty() {
                element
            } else {
                element.with_attr(AttrName::Title, title.to_string())
            }
        }
        // Images, raw HTML blocks, tables, footnotes and metadata keep only
        // their text.
        _ => return Pending::Fragment(Vec::new()),
    };
    Pending::Element(element)
}

/// First word of a fence info string, if it is a plain language name.
fn code_language(info: &str) -> Option<&str> {
    let lang = info.split_whitespace().next()?;
    lang.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .then_some(lang)
}

/// Render markdown into a display tree, applying `overrides`.
pub fn render(markdown: &str, overrides: &RenderOverrides) -> DisplayTree {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    let mut builder = TreeBuilder::new(overrides);
    for event in parser {
        builder.event(event);
    }
    builder.finish()
}

/// Convert an untrusted HTML body and render it with the secure table.
pub fn render_body(body: Option<&str>) -> DisplayTree {
    render(&convert(body), &RenderOverrides::secure())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn secure(markdown: &str) -> DisplayTree {
        render(markdown, &RenderOverrides::secure())
    }

    fn assert_no_dangerous_output(tree: &DisplayTree) {
        let html = tree.to_html().to_lowercase();
        for needle in ["<script", "<iframe", "<img", "<svg", "<object", "<embed"] {
            assert!(!html.contains(needle), "{} in {}", needle, html);
        }
        for element in tree.walk().filter_map(Node::as_element) {
            if let Some(href) = element.attr(AttrName::Href) {
                assert!(!is_disallowed_link(href), "live link to {}", href);
            }
        }
    }

    /// Deepest element nesting in the tree, measured without recursion.
    fn max_depth(tree: &DisplayTree) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = tree.children.iter().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            if let Node::Element(element) = node {
                deepest = deepest.max(depth);
                stack.extend(element.children.iter().map(|child| (child, depth + 1)));
            }
        }
        deepest
    }

    #[test]
    fn test_disallowed_links() {
        assert!(is_disallowed_link("javascript:alert(1)"));
        assert!(is_disallowed_link("JavaScript:alert(1)"));
        assert!(is_disallowed_link("  javascript:void(0)"));
        assert!(is_disallowed_link("\u{1}\tjavascript:x"));
        assert!(is_disallowed_link("java\tscript:x"));
        assert!(is_disallowed_link("jav\nascript:x"));
        assert!(is_disallowed_link("vbscript:msgbox"));
        assert!(is_disallowed_link("data:text/html;base64,PHNjcmlwdD4="));
    }

    #[test]
    fn test_allowed_links() {
        assert!(!is_disallowed_link("https://example.com"));
        assert!(!is_disallowed_link("/jobs/1"));
        assert!(!is_disallowed_link("mailto:a@example.com"));
        assert!(!is_disallowed_link("https://example.com/?q=javascript:"));
        assert!(!is_disallowed_link(""));
    }

    #[test]
    fn test_bold_text() {
        let tree = secure("This is **bold** text");
        let strong = tree.find_all(NodeKind::Strong);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong[0].text_content(), "bold");
        assert_eq!(tree.text_content(), "This is bold text");
    }

    #[test]
    fn test_emphasis_is_styled() {
        let tree = secure("an *important* note");
        let emphasis = tree.find_all(NodeKind::Emphasis);
        assert_eq!(emphasis.len(), 1);
        assert!(emphasis[0].has_class(classes::EMPHASIS));
        assert_eq!(emphasis[0].text_content(), "important");
    }

    #[test]
    fn test_emphasis_unstyled_without_rule() {
        let tree = render("an *important* note", &RenderOverrides::empty());
        let emphasis = tree.find_all(NodeKind::Emphasis);
        assert_eq!(emphasis.len(), 1);
        assert_eq!(emphasis[0].attr(AttrName::Class), None);
    }

    #[test]
    fn test_safe_link_attributes() {
        let tree = secure("[Docs](https://example.com/docs \"Read\")");
        let links = tree.find_all(NodeKind::Link);
        assert_eq!(links.len(), 1);
        let link = links[0];
        assert_eq!(link.attr(AttrName::Href), Some("https://example.com/docs"));
        assert_eq!(link.attr(AttrName::Title), Some("Read"));
        assert_eq!(link.attr(AttrName::Target), Some(LINK_TARGET));
        assert_eq!(link.attr(AttrName::Rel), Some(LINK_REL));
        assert!(link.has_class(classes::LINK));
        assert_eq!(link.text_content(), "Docs");
    }

    #[test]
    fn test_javascript_link_is_dropped() {
        let tree = secure(r#"[Click me](javascript:alert("XSS"))"#);
        assert!(tree.find_all(NodeKind::Link).is_empty());
        assert!(!tree.text_content().contains("Click me"));
        assert_no_dangerous_output(&tree);
    }

    #[test]
    fn test_javascript_link_variants_are_dropped() {
        for markdown in [
            "[a](JAVASCRIPT:alert(1))",
            "[a](<  javascript:alert(1)>)",
            "[a](&#106;avascript:alert(1))",
            "[a](java&#9;script:alert(1))",
            "<javascript:alert(1)>",
        ] {
            let tree = secure(markdown);
            assert!(
                tree.find_all(NodeKind::Link).is_empty(),
                "link survived for {:?}",
                markdown
            );
        }
    }

    #[test]
    fn test_dropped_link_keeps_siblings() {
        let tree = secure("before [x](javascript:alert(1)) after");
        assert_eq!(tree.text_content(), "before  after");
    }

    #[test]
    fn test_empty_table_keeps_links() {
        let tree = render("[x](https://example.com)", &RenderOverrides::empty());
        let links = tree.find_all(NodeKind::Link);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].attr(AttrName::Target), None);
    }

    #[test]
    fn test_custom_rule() {
        let overrides = RenderOverrides::secure().with_rule(NodeKind::Strong, |_| None);
        let tree = render("a **b** c", &overrides);
        assert!(tree.find_all(NodeKind::Strong).is_empty());
        assert_eq!(tree.text_content(), "a  c");
    }

    #[test]
    fn test_raw_html_is_text() {
        let tree = secure("<script>alert(1)</script>\n\nhi <img src=x onerror=alert(1)>");
        assert_no_dangerous_output(&tree);
        assert!(tree.text_content().contains("<script>"));
    }

    #[test]
    fn test_image_becomes_alt_text() {
        let tree = secure("![logo](javascript:alert(1))");
        assert_no_dangerous_output(&tree);
        assert_eq!(tree.text_content(), "logo");
    }

    #[test]
    fn test_converted_structure() {
        let tree = secure("# Title\n\nSome `code` and\n\n- A\n- B\n");
        assert_eq!(tree.find_all(NodeKind::Heading).len(), 1);
        assert_eq!(
            tree.children[0].as_element().map(|e| e.kind),
            Some(ElementKind::Heading(1))
        );
        assert_eq!(tree.find_all(NodeKind::Code).len(), 1);
        assert_eq!(tree.find_all(NodeKind::List).len(), 1);
        assert_eq!(tree.find_all(NodeKind::ListItem).len(), 2);
    }

    #[test]
    fn test_fenced_code_language() {
        let tree = secure("```rust\nfn main() {}\n```\n");
        let blocks = tree.find_all(NodeKind::CodeBlock);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].attr(AttrName::Class), Some("language-rust"));

        let tree = secure("```\" onmouseover=\"x\nbody\n```\n");
        let blocks = tree.find_all(NodeKind::CodeBlock);
        assert_eq!(blocks[0].attr(AttrName::Class), None);
    }

    #[test]
    fn test_ordered_list_start() {
        let tree = secure("3. three\n4. four\n");
        let lists = tree.find_all(NodeKind::List);
        assert_eq!(lists[0].kind, ElementKind::OrderedList);
        assert_eq!(lists[0].attr(AttrName::Start), Some("3"));
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        let tree = secure("a &amp; b");
        let paragraph = tree.children[0].as_element().unwrap();
        assert_eq!(paragraph.children, vec![Node::text("a & b")]);
    }

    #[test]
    fn test_render_body_end_to_end() {
        let tree = render_body(Some(r#"<script>alert("XSS")</script>"#));
        assert_no_dangerous_output(&tree);
        assert_eq!(tree.text_content(), r#"alert("XSS")"#);

        let tree = render_body(Some(r#"<a href="javascript:alert('XSS')">Click me</a>"#));
        assert!(tree.find_all(NodeKind::Link).is_empty());
        assert!(!tree.text_content().contains("Click me"));

        let tree = render_body(Some(r#"<iframe src="javascript:alert(1)"></iframe>"#));
        assert!(tree.is_empty());

        let tree = render_body(Some(r#"<img src=x onerror="alert(1)">caption"#));
        assert_no_dangerous_output(&tree);
        assert_eq!(tree.text_content(), "caption");
    }

    #[test]
    fn test_render_body_rich_content() {
        let body = concat!(
            "<h2>Release</h2>",
            "<p>Version <strong>6.1</strong> is <em>out</em>. ",
            "See <a href=\"https://example.com/notes\">notes</a>.</p>",
            "<ul><li>fast</li><li>safe</li></ul>"
        );
        let tree = render_body(Some(body));
        assert_eq!(tree.find_all(NodeKind::Heading).len(), 1);
        assert_eq!(tree.find_all(NodeKind::Strong)[0].text_content(), "6.1");
        assert!(tree.find_all(NodeKind::Emphasis)[0].has_class(classes::EMPHASIS));
        let link = tree.find_all(NodeKind::Link)[0];
        assert_eq!(link.attr(AttrName::Href), Some("https://example.com/notes"));
        assert_eq!(link.attr(AttrName::Rel), Some(LINK_REL));
        assert_eq!(tree.find_all(NodeKind::ListItem).len(), 2);
    }

    #[test]
    fn test_render_body_empty() {
        assert!(render_body(None).is_empty());
        assert!(render_body(Some("")).is_empty());
    }

    #[test]
    fn test_render_is_pure() {
        let markdown = "*a* [b](https://b.example) **c**";
        let overrides = RenderOverrides::default();
        assert_eq!(render(markdown, &overrides), render(markdown, &overrides));
    }

    #[test]
    fn test_deep_blockquotes_are_flattened() {
        let body = "> ".repeat(50_000) + "deep";
        let tree = render_body(Some(&body));
        assert!(max_depth(&tree) <= MAX_NESTING_DEPTH + 1);
        assert_eq!(tree.text_content().trim(), "deep");
    }

    #[test]
    fn test_deep_lists_are_flattened() {
        let body = "- ".repeat(50_000) + "deep";
        let tree = render_body(Some(&body));
        assert!(max_depth(&tree) <= MAX_NESTING_DEPTH + 1);
        assert!(tree.text_content().contains("deep"));
    }

    #[test]
    fn test_nesting_below_limit_is_kept() {
        let tree = secure("> > > quoted");
        assert_eq!(tree.find_all(NodeKind::BlockQuote).len(), 3);
    }

    #[test]
    fn test_deep_link_is_never_live() {
        let body = "> ".repeat(100) + "[x](javascript:alert(1))";
        let tree = render_body(Some(&body));
        assert!(tree.find_all(NodeKind::Link).is_empty());
        assert_no_dangerous_output(&tree);
    }

    /// Bodies built from markup that stresses both stages: tags, link syntax,
    /// and block markers that nest.
    fn hostile_body() -> impl Strategy<Value = String> {
        let fragment = prop_oneof![
            prop::sample::select(vec![
                "<a href=\"javascript:alert(1)\">",
                "<a href='JaVaScRiPt:x'>",
                "</a>",
                "<b>",
                "</b>",
                "<li>",
                "<p>",
                "<script>",
                "[",
                "](",
                ")",
                "javascript:alert(1)",
                " java\tscript:x",
                "data:text/html,x",
                "> ",
                "- ",
                "1. ",
                "*",
                "`",
                "\n",
            ])
            .prop_map(String::from),
            "[a-z ]{0,6}",
        ];
        prop::collection::vec(fragment, 0..80).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn test_no_live_disallowed_link(body in hostile_body()) {
            let tree = render_body(Some(&body));
            for link in tree.find_all(NodeKind::Link) {
                let href = link.attr(AttrName::Href).unwrap_or_default();
                prop_assert!(!is_disallowed_link(href), "live link to {:?}", href);
            }
        }

        #[test]
        fn test_arbitrary_body_stays_shallow(body in hostile_body()) {
            let tree = render_body(Some(&body));
            prop_assert!(max_depth(&tree) <= MAX_NESTING_DEPTH + 1);
        }

        #[test]
        fn test_arbitrary_text_never_yields_live_link(body in "\\PC*") {
            let tree = render_body(Some(&body));
            for link in tree.find_all(NodeKind::Link) {
                let href = link.attr(AttrName::Href).unwrap_or_default();
                prop_assert!(!is_disallowed_link(href));
            }
        }
    }
}
