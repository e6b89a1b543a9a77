//! A small mock DOM that can be used for testing.
//!
//! The document lives in a thread-local arena. Each test thread gets its own
//! document with a single `<body>` root; call [`MockDom::reset`] between
//! scenarios that share a thread.

use super::{RemoveEventHandler, Renderer};
use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use std::{cell::RefCell, rc::Rc};

/// A [`Renderer`] that uses a mock DOM structure running in Rust code.
#[derive(Debug)]
pub struct MockDom;

new_key_type! {
    /// A unique identifier for a mock DOM node.
    pub struct NodeId;
}

/// A mock DOM node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

/// A mock element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Element(Node);

/// A mock text node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Text(Node);

impl AsRef<Node> for Node {
    fn as_ref(&self) -> &Node {
        self
    }
}

impl AsRef<Node> for Element {
    fn as_ref(&self) -> &Node {
        &self.0
    }
}

impl AsRef<Node> for Text {
    fn as_ref(&self) -> &Node {
        &self.0
    }
}

/// The type of mock DOM node.
#[derive(Debug, PartialEq, Eq)]
pub enum NodeType {
    /// A text node.
    Text(String),
    /// An element.
    Element {
        /// The HTML tag name.
        tag: String,
        /// The attributes, in insertion order.
        attrs: IndexMap<String, String>,
        /// The element's children.
        children: Vec<Node>,
    },
}

/// The DOM data associated with a particular node.
#[derive(Debug, PartialEq, Eq)]
pub struct NodeData {
    /// The node's parent.
    pub parent: Option<NodeId>,
    /// The node itself.
    pub ty: NodeType,
}

type Listener = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Default)]
struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    listeners: Vec<(NodeId, String, u64, Listener)>,
    next_listener: u64,
    body: Option<NodeId>,
}

thread_local! {
    static DOCUMENT: RefCell<Document> = RefCell::new(Document::default());
}

fn with_doc<U>(f: impl FnOnce(&mut Document) -> U) -> U {
    DOCUMENT.with(|doc| f(&mut doc.borrow_mut()))
}

fn with_node<U>(id: NodeId, f: impl FnOnce(&NodeData) -> U) -> Option<U> {
    with_doc(|doc| doc.nodes.get(id).map(f))
}

fn with_node_mut<U>(
    id: NodeId,
    f: impl FnOnce(&mut NodeData) -> U,
) -> Option<U> {
    with_doc(|doc| doc.nodes.get_mut(id).map(f))
}

fn insert(ty: NodeType) -> Node {
    with_doc(|doc| {
        Node(doc.nodes.insert(NodeData { parent: None, ty }))
    })
}

impl MockDom {
    /// The document's `<body>` element, created on first use.
    pub fn body() -> Element {
        let existing = with_doc(|doc| doc.body);
        match existing {
            Some(id) => Element(Node(id)),
            None => {
                let body = Self::create_element("body");
                with_doc(|doc| doc.body = Some(body.0 .0));
                body
            }
        }
    }

    /// Discards every node and listener in this thread's document.
    pub fn reset() {
        with_doc(|doc| *doc = Document::default());
    }

    /// Fires an event of the given name at the element, calling each listener
    /// once.
    ///
    /// Returns the number of listeners that ran.
    pub fn dispatch(el: &Element, name: &str) -> usize {
        let listeners: Vec<Listener> = with_doc(|doc| {
            doc.listeners
                .iter()
                .filter(|(id, ev, _, _)| *id == el.0 .0 && ev == name)
                .map(|(_, _, _, cb)| Rc::clone(cb))
                .collect()
        });
        for cb in &listeners {
            (cb.borrow_mut())();
        }
        listeners.len()
    }

    /// The number of listeners currently registered on the element.
    pub fn listener_count(el: &Element) -> usize {
        with_doc(|doc| {
            doc.listeners
                .iter()
                .filter(|(id, ..)| *id == el.0 .0)
                .count()
        })
    }

    /// Returns the element's children.
    pub fn children(el: &Element) -> Vec<Node> {
        with_node(el.0 .0, |node| match &node.ty {
            NodeType::Element { children, .. } => children.clone(),
            NodeType::Text(_) => Vec::new(),
        })
        .unwrap_or_default()
    }

    /// Casts a node to an element, if it is one.
    pub fn as_element(node: &Node) -> Option<Element> {
        with_node(node.0, |data| {
            matches!(data.ty, NodeType::Element { .. })
        })
        .and_then(|is_el| is_el.then_some(Element(*node)))
    }

    /// Collects the text content of the node and all its descendants.
    pub fn text_content(node: &Node) -> String {
        let mut buf = String::new();
        collect_text(node.0, &mut buf);
        buf
    }

    /// Returns the first element at or below `root`, in document order, that
    /// matches the selector.
    pub fn query_selector_in(
        root: &Element,
        selector: &str,
    ) -> Option<Element> {
        let selector = Selector::parse(selector)?;
        find(root.0 .0, &selector).map(|id| Element(Node(id)))
    }
}

impl Element {
    /// Outputs an HTML form of the element, for testing and debugging purposes.
    pub fn to_debug_html(&self) -> String {
        let mut buf = String::new();
        debug_html(self.0 .0, &mut buf);
        buf
    }
}

fn debug_html(id: NodeId, buf: &mut String) {
    let children = with_node(id, |node| match &node.ty {
        NodeType::Text(text) => {
            buf.push_str(text);
            None
        }
        NodeType::Element { tag, attrs, children } => {
            buf.push('<');
            buf.push_str(tag);
            for (k, v) in attrs {
                buf.push(' ');
                buf.push_str(k);
                buf.push_str("=\"");
                buf.push_str(v);
                buf.push('"');
            }
            buf.push('>');
            Some((tag.clone(), children.clone()))
        }
    })
    .flatten();

    if let Some((tag, children)) = children {
        for child in children {
            debug_html(child.0, buf);
        }
        buf.push_str("</");
        buf.push_str(&tag);
        buf.push('>');
    }
}

fn collect_text(id: NodeId, buf: &mut String) {
    let children = with_node(id, |node| match &node.ty {
        NodeType::Text(text) => {
            buf.push_str(text);
            Vec::new()
        }
        NodeType::Element { children, .. } => children.clone(),
    })
    .unwrap_or_default();
    for child in children {
        collect_text(child.0, buf);
    }
}

/// The subset of CSS selectors the mock document understands: a single `#id`,
/// `.class`, `[attr]` or tag name.
enum Selector {
    Id(String),
    Class(String),
    Attribute(String),
    Tag(String),
}

impl Selector {
    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            Some(Selector::Id(id.to_string()))
        } else if let Some(class) = selector.strip_prefix('.') {
            Some(Selector::Class(class.to_string()))
        } else if let Some(attr) = selector
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(Selector::Attribute(attr.to_string()))
        } else if !selector.is_empty()
            && selector.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            Some(Selector::Tag(selector.to_ascii_lowercase()))
        } else {
            None
        }
    }

    fn matches(&self, tag: &str, attrs: &IndexMap<String, String>) -> bool {
        match self {
            Selector::Id(id) => attrs.get("id") == Some(id),
            Selector::Class(class) => {
                attrs.get("class").is_some_and(|list| {
                    list.split_whitespace().any(|c| c == class)
                })
            }
            Selector::Attribute(name) => attrs.contains_key(name),
            Selector::Tag(name) => tag == name,
        }
    }
}

fn find(id: NodeId, selector: &Selector) -> Option<NodeId> {
    let (is_match, children) = with_node(id, |node| match &node.ty {
        NodeType::Element { tag, attrs, children } => {
            (selector.matches(tag, attrs), children.clone())
        }
        NodeType::Text(_) => (false, Vec::new()),
    })?;
    if is_match {
        return Some(id);
    }
    children.iter().find_map(|child| find(child.0, selector))
}

impl Renderer for MockDom {
    type Node = Node;
    type Element = Element;
    type Text = Text;

    fn create_element(tag: &str) -> Self::Element {
        Element(insert(NodeType::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }))
    }

    fn create_text_node(data: &str) -> Self::Text {
        Text(insert(NodeType::Text(data.to_string())))
    }

    fn set_text(node: &Self::Text, text: &str) {
        with_node_mut(node.0 .0, |node| {
            if let NodeType::Text(ref mut node) = node.ty {
                *node = text.to_string();
            }
        });
    }

    fn set_attribute(node: &Self::Element, name: &str, value: &str) {
        with_node_mut(node.0 .0, |node| {
            if let NodeType::Element { ref mut attrs, .. } = node.ty {
                attrs.insert(name.to_string(), value.to_string());
            }
        });
    }

    fn get_attribute(node: &Self::Element, name: &str) -> Option<String> {
        with_node(node.0 .0, |node| match &node.ty {
            NodeType::Element { attrs, .. } => attrs.get(name).cloned(),
            NodeType::Text(_) => None,
        })
        .flatten()
    }

    fn insert_node(
        parent: &Self::Element,
        new_child: &Self::Node,
        anchor: Option<&Self::Node>,
    ) {
        debug_assert!(&parent.0 != new_child);
        // remove if already mounted
        if let Some(old_parent) =
            with_node(new_child.0, |node| node.parent).flatten()
        {
            with_node_mut(old_parent, |node| {
                if let NodeType::Element { ref mut children, .. } = node.ty {
                    children.retain(|child| child != new_child);
                }
            });
        }
        // mount on new parent
        with_node_mut(parent.0 .0, |parent| {
            if let NodeType::Element { ref mut children, .. } = parent.ty {
                let pos = anchor
                    .and_then(|anchor| {
                        children.iter().position(|c| c == anchor)
                    })
                    .unwrap_or(children.len());
                children.insert(pos, *new_child);
            }
        });
        with_node_mut(new_child.0, |node| node.parent = Some(parent.0 .0));
    }

    fn clear_children(parent: &Self::Element) {
        let prev_children = with_node_mut(parent.0 .0, |node| match node.ty {
            NodeType::Element { ref mut children, .. } => {
                std::mem::take(children)
            }
            NodeType::Text(_) => Vec::new(),
        })
        .unwrap_or_default();
        for child in prev_children {
            with_node_mut(child.0, |node| {
                node.parent = None;
            });
        }
    }

    fn query_selector(selector: &str) -> Option<Self::Element> {
        Self::query_selector_in(&Self::body(), selector)
    }

    fn add_event_listener(
        el: &Self::Element,
        name: &str,
        cb: Box<dyn FnMut()>,
    ) -> RemoveEventHandler<Self::Element> {
        let key = with_doc(|doc| {
            let key = doc.next_listener;
            doc.next_listener += 1;
            doc.listeners.push((
                el.0 .0,
                name.to_string(),
                key,
                Rc::new(RefCell::new(cb)),
            ));
            key
        });
        RemoveEventHandler::new(move |_: &Element| {
            with_doc(|doc| doc.listeners.retain(|(_, _, k, _)| *k != key));
        })
    }
}
