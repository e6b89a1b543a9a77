//! A pure description of what the counter island renders.

use crate::props::ResolvedProps;
use std::borrow::Cow;

/// The only user-triggerable transition the island exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Increment,
}

/// A rendered element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementNode {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, Cow<'static, str>)>,
    pub on_click: Option<Action>,
    pub children: Vec<VisualTree>,
}

/// The visual output of the component for one state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisualTree {
    Element(ElementNode),
    Text(Cow<'static, str>),
}

impl VisualTree {
    fn element(tag: &'static str) -> ElementNode {
        ElementNode {
            tag,
            attrs: Vec::new(),
            on_click: None,
            children: Vec::new(),
        }
    }

    fn text(text: impl Into<Cow<'static, str>>) -> Self {
        VisualTree::Text(text.into())
    }

    /// Renders the tree as static HTML, escaping text and attribute values.
    pub fn to_html(&self) -> String {
        let mut buf = String::new();
        self.write_html(&mut buf);
        buf
    }

    fn write_html(&self, buf: &mut String) {
        match self {
            VisualTree::Text(text) => {
                buf.push_str(&html_escape::encode_text(text));
            }
            VisualTree::Element(el) => {
                buf.push('<');
                buf.push_str(el.tag);
                for (name, value) in &el.attrs {
                    buf.push(' ');
                    buf.push_str(name);
                    buf.push_str("=\"");
                    buf.push_str(&html_escape::encode_double_quoted_attribute(
                        value,
                    ));
                    buf.push('"');
                }
                buf.push('>');
                for child in &el.children {
                    child.write_html(buf);
                }
                buf.push_str("</");
                buf.push_str(el.tag);
                buf.push('>');
            }
        }
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        match self {
            VisualTree::Text(text) => text.to_string(),
            VisualTree::Element(el) => {
                el.children.iter().map(VisualTree::text_content).collect()
            }
        }
    }
}

impl From<ElementNode> for VisualTree {
    fn from(el: ElementNode) -> Self {
        VisualTree::Element(el)
    }
}

impl ElementNode {
    fn attr(mut self, name: &'static str, value: &'static str) -> Self {
        self.attrs.push((name, Cow::Borrowed(value)));
        self
    }

    fn child(mut self, child: impl Into<VisualTree>) -> Self {
        self.children.push(child.into());
        self
    }

    fn on_click(mut self, action: Action) -> Self {
        self.on_click = Some(action);
        self
    }
}

const CARD_STYLE: &str = "padding: 12px 16px; border-radius: 12px; \
                          border: 1px solid #ddd; \
                          box-shadow: 0 2px 8px rgba(0,0,0,.05); \
                          background: white;";

/// The label shown on the counter button.
pub fn click_label(count: u32) -> String {
    format!("Clicks: {count}")
}

/// Renders the island for the given props and counter value.
pub fn render(props: &ResolvedProps, count: u32) -> VisualTree {
    VisualTree::element("div")
        .attr("style", CARD_STYLE)
        .child(
            VisualTree::element("strong")
                .child(VisualTree::text("React Island!:")),
        )
        .child(VisualTree::text(format!(" {}", props.message)))
        .child(
            VisualTree::element("div")
                .attr("style", "margin-top: 8px;")
                .child(
                    VisualTree::element("button")
                        .on_click(Action::Increment)
                        .child(VisualTree::text(click_label(count))),
                ),
        )
        .into()
}
