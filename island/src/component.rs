//! The live counter island: builds a [`VisualTree`] into a host element and
//! keeps it up to date as the user clicks.

use crate::{
    props::ResolvedProps,
    renderer::{RemoveEventHandler, Renderer},
    view::{render, Action, VisualTree},
};
use std::{cell::RefCell, rc::Rc};

/// The island's only piece of local state.
///
/// Starts at zero and only ever goes up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counter(u32);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }
}

/// A node that has been created through the renderer, mirroring one
/// [`VisualTree`] node.
enum Built<R: Renderer> {
    Element {
        el: R::Element,
        children: Vec<Built<R>>,
    },
    Text {
        node: R::Text,
        content: String,
    },
}

impl<R: Renderer> Built<R> {
    fn node(&self) -> &R::Node {
        match self {
            Built::Element { el, .. } => el.as_ref(),
            Built::Text { node, .. } => node.as_ref(),
        }
    }
}

struct State<R: Renderer> {
    props: ResolvedProps,
    counter: Counter,
    root: Vec<Built<R>>,
}

impl<R: Renderer> State<R> {
    fn apply(&mut self, action: Action) {
        match action {
            Action::Increment => self.counter.increment(),
        }
        tracing::debug!(count = self.counter.get(), "island counter changed");
        let next = render(&self.props, self.counter.get());
        reconcile::<R>(&mut self.root, std::slice::from_ref(&next));
    }
}

/// Updates built nodes in place to match `next`.
///
/// The counter's output always has the same shape, so only text nodes whose
/// content changed are touched.
fn reconcile<R: Renderer>(built: &mut [Built<R>], next: &[VisualTree]) {
    debug_assert_eq!(built.len(), next.len(), "island tree changed shape");
    for (built, next) in built.iter_mut().zip(next) {
        match (built, next) {
            (Built::Text { node, content }, VisualTree::Text(text)) => {
                if content.as_str() != &**text {
                    R::set_text(node, text);
                    *content = text.to_string();
                }
            }
            (Built::Element { children, .. }, VisualTree::Element(el)) => {
                reconcile::<R>(children, &el.children);
            }
            _ => debug_assert!(false, "island tree changed shape"),
        }
    }
}

/// A mounted, interactive counter island.
///
/// Dropping it removes its listeners and clears the host element.
pub struct CounterIsland<R: Renderer> {
    host: R::Element,
    state: Rc<RefCell<State<R>>>,
    listeners: Vec<(R::Element, RemoveEventHandler<R::Element>)>,
}

impl<R: Renderer> CounterIsland<R> {
    /// Replaces the host's contents with a live island rendered from `props`.
    pub fn build(host: &R::Element, props: ResolvedProps) -> Self {
        R::clear_children(host);

        let tree = render(&props, 0);
        let state = Rc::new(RefCell::new(State {
            props,
            counter: Counter::new(),
            root: Vec::new(),
        }));
        let mut listeners = Vec::new();
        let built = build_node::<R>(&tree, &state, &mut listeners);
        R::insert_node(host, built.node(), None);
        state.borrow_mut().root.push(built);

        Self {
            host: host.clone(),
            state,
            listeners,
        }
    }

    /// The current counter value.
    pub fn count(&self) -> u32 {
        self.state.borrow().counter.get()
    }

    /// The message being displayed.
    pub fn message(&self) -> String {
        self.state.borrow().props.message.to_string()
    }

    /// The element the island is mounted on.
    pub fn host(&self) -> &R::Element {
        &self.host
    }

    /// Removes the island's event listeners and contents from the host.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<R: Renderer> std::fmt::Debug for CounterIsland<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterIsland")
            .field("message", &self.message())
            .field("count", &self.count())
            .finish()
    }
}

impl<R: Renderer> Drop for CounterIsland<R> {
    fn drop(&mut self) {
        for (el, remove) in self.listeners.drain(..) {
            remove.remove(&el);
        }
        R::clear_children(&self.host);
    }
}

fn build_node<R: Renderer>(
    tree: &VisualTree,
    state: &Rc<RefCell<State<R>>>,
    listeners: &mut Vec<(R::Element, RemoveEventHandler<R::Element>)>,
) -> Built<R> {
    match tree {
        VisualTree::Text(text) => Built::Text {
            node: R::create_text_node(text),
            content: text.to_string(),
        },
        VisualTree::Element(node) => {
            let el = R::create_element(node.tag);
            for (name, value) in &node.attrs {
                R::set_attribute(&el, name, value);
            }
            if let Some(action) = node.on_click {
                let state = Rc::downgrade(state);
                let remove = R::add_event_listener(
                    &el,
                    "click",
                    Box::new(move || {
                        if let Some(state) = state.upgrade() {
                            state.borrow_mut().apply(action);
                        }
                    }),
                );
                listeners.push((el.clone(), remove));
            }
            let children = node
                .children
                .iter()
                .map(|child| {
                    let child = build_node::<R>(child, state, listeners);
                    R::insert_node(&el, child.node(), None);
                    child
                })
                .collect();
            Built::Element { el, children }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::mock_dom::{Element, MockDom};

    fn button_of(host: &Element) -> Element {
        MockDom::query_selector_in(host, "button")
            .expect("island renders a button")
    }

    #[test]
    fn counter_starts_at_zero_and_increments() {
        let mut counter = Counter::new();
        assert_eq!(counter.get(), 0);
        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn counter_saturates() {
        let mut counter = Counter(u32::MAX);
        counter.increment();
        assert_eq!(counter.get(), u32::MAX);
    }

    #[test]
    fn build_replaces_static_content() {
        let host = MockDom::create_element("div");
        let stale = MockDom::create_text_node("Loading...");
        MockDom::insert_node(&host, stale.as_ref(), None);

        let island =
            CounterIsland::<MockDom>::build(&host, ResolvedProps::default());
        let html = host.to_debug_html();
        assert!(!html.contains("Loading..."));
        assert!(html.contains(
            "<strong>React Island!:</strong> Hello from React Island!"
        ));
        assert!(html.contains("<button>Clicks: 0</button>"));
        assert_eq!(island.count(), 0);
    }

    #[test]
    fn clicks_update_count_and_label() {
        let host = MockDom::create_element("div");
        let island =
            CounterIsland::<MockDom>::build(&host, ResolvedProps::default());
        let button = button_of(&host);

        for expected in 1..=3 {
            MockDom::dispatch(&button, "click");
            assert_eq!(island.count(), expected);
            assert_eq!(
                MockDom::text_content(button.as_ref()),
                format!("Clicks: {expected}")
            );
        }
    }

    #[test]
    fn reconcile_keeps_nodes() {
        let host = MockDom::create_element("div");
        let _island =
            CounterIsland::<MockDom>::build(&host, ResolvedProps::default());
        let button = button_of(&host);
        let label = MockDom::children(&button);

        MockDom::dispatch(&button, "click");
        assert_eq!(button_of(&host), button);
        assert_eq!(MockDom::children(&button), label);
    }

    #[test]
    fn unmount_clears_host_and_listeners() {
        let host = MockDom::create_element("div");
        let island =
            CounterIsland::<MockDom>::build(&host, ResolvedProps::default());
        let button = button_of(&host);
        assert_eq!(MockDom::listener_count(&button), 1);

        island.unmount();
        assert_eq!(host.to_debug_html(), "<div></div>");
        assert_eq!(MockDom::listener_count(&button), 0);
        assert_eq!(MockDom::dispatch(&button, "click"), 0);
    }
}
