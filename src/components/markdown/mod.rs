//! Sanitized markdown view.
//!
//! Builds DOM nodes directly from a [`DisplayTree`]; the tree is never
//! serialized and injected as HTML.

use leptos::prelude::*;

use crate::models::{AttrName, DisplayTree, Element, ElementKind, Node};

stylance::import_crate_style!(css, "src/components/markdown/markdown.module.css");

/// Renders a sanitized display tree.
///
/// # Props
/// - `tree`: Output of the safe renderer
#[component]
pub fn SafeMarkdown(tree: DisplayTree) -> impl IntoView {
    let nodes = tree.children.into_iter().map(render_node).collect_view();

    view! { <div class=css::markdown>{nodes}</div> }
}

fn render_node(node: Node) -> AnyView {
    match node {
        Node::Text(text) => text.into_any(),
        Node::Element(element) => render_element(element),
    }
}

fn render_element(element: Element) -> AnyView {
    let owned = |name: AttrName| element.attr(name).map(str::to_string);
    let class = owned(AttrName::Class).unwrap_or_default();
    let href = owned(AttrName::Href).unwrap_or_default();
    let title = owned(AttrName::Title);
    let target = owned(AttrName::Target);
    let rel = owned(AttrName::Rel);
    let start = owned(AttrName::Start);
    let kind = element.kind;

    let children = element
        .children
        .into_iter()
        .map(render_node)
        .collect_view();

    match kind {
        ElementKind::Paragraph => view! { <p class=class>{children}</p> }.into_any(),
        ElementKind::Heading(1) => view! { <h1 class=class>{children}</h1> }.into_any(),
        ElementKind::Heading(2) => view! { <h2 class=class>{children}</h2> }.into_any(),
        ElementKind::Heading(3) => view! { <h3 class=class>{children}</h3> }.into_any(),
        ElementKind::Heading(4) => view! { <h4 class=class>{children}</h4> }.into_any(),
        ElementKind::Heading(5) => view! { <h5 class=class>{children}</h5> }.into_any(),
        ElementKind::Heading(_) => view! { <h6 class=class>{children}</h6> }.into_any(),
        ElementKind::BlockQuote => {
            view! { <blockquote class=class>{children}</blockquote> }.into_any()
        }
        ElementKind::CodeBlock => view! {
            <pre class=css::codeBlock>
                <code class=class>{children}</code>
            </pre>
        }
        .into_any(),
        ElementKind::OrderedList => {
            view! { <ol class=class start=start>{children}</ol> }.into_any()
        }
        ElementKind::UnorderedList => view! { <ul class=class>{children}</ul> }.into_any(),
        ElementKind::ListItem => view! { <li class=class>{children}</li> }.into_any(),
        ElementKind::Emphasis => view! { <em class=class>{children}</em> }.into_any(),
        ElementKind::Strong => view! { <strong class=class>{children}</strong> }.into_any(),
        ElementKind::Strikethrough => view! { <del class=class>{children}</del> }.into_any(),
        ElementKind::InlineCode => view! { <code class=class>{children}</code> }.into_any(),
        ElementKind::Anchor => view! {
            <a href=href title=title target=target rel=rel class=class>
                {children}
            </a>
        }
        .into_any(),
        ElementKind::LineBreak => view! { <br /> }.into_any(),
        ElementKind::Rule => view! { <hr /> }.into_any(),
    }
}
