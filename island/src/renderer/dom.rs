use super::{RemoveEventHandler, Renderer};
use wasm_bindgen::{intern, prelude::Closure, JsCast, JsValue};
use web_sys::{Element, Node, Text};

#[derive(Debug)]
pub struct Dom;

thread_local! {
    static DOCUMENT: Option<web_sys::Document> =
        web_sys::window().and_then(|w| w.document());
}

/// Returns the
/// [`Document`](https://developer.mozilla.org/en-US/docs/Web/API/Document).
///
/// This is cached as a thread-local variable, so calling `document()` multiple
/// times requires only one call out to JavaScript.
///
/// ## Panics
/// Panics if called outside a browser environment.
pub fn document() -> web_sys::Document {
    DOCUMENT.with(|doc| {
        doc.clone()
            .expect("the island can only render inside a browser document")
    })
}

#[track_caller]
fn or_debug(result: Result<(), JsValue>, el: &Node, name: &'static str) {
    if let Err(err) = result {
        let location = std::panic::Location::caller();
        tracing::warn!(
            %location,
            call = name,
            node = ?el.node_name(),
            error = ?err,
            "non-fatal DOM error"
        );
    }
}

impl Renderer for Dom {
    type Node = Node;
    type Element = Element;
    type Text = Text;

    fn create_element(tag: &str) -> Self::Element {
        document()
            .create_element(intern(tag))
            .expect("element tag names are static and valid")
    }

    fn create_text_node(text: &str) -> Self::Text {
        document().create_text_node(text)
    }

    fn set_text(node: &Self::Text, text: &str) {
        node.set_node_value(Some(text));
    }

    fn set_attribute(node: &Self::Element, name: &str, value: &str) {
        or_debug(node.set_attribute(intern(name), value), node, "setAttribute");
    }

    fn get_attribute(node: &Self::Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn insert_node(
        parent: &Self::Element,
        new_child: &Self::Node,
        anchor: Option<&Self::Node>,
    ) {
        or_debug(
            parent.insert_before(new_child, anchor).map(drop),
            parent,
            "insertBefore",
        );
    }

    fn clear_children(parent: &Self::Element) {
        parent.set_text_content(Some(""));
    }

    // `SyntaxError` from the browser is logged and treated as no match.
    fn query_selector(selector: &str) -> Option<Self::Element> {
        match document().query_selector(selector) {
            Ok(el) => el,
            Err(err) => {
                tracing::warn!(selector, error = ?err, "invalid selector");
                None
            }
        }
    }

    fn add_event_listener(
        el: &Self::Element,
        name: &str,
        mut cb: Box<dyn FnMut()>,
    ) -> RemoveEventHandler<Self::Element> {
        let cb = Closure::<dyn FnMut(web_sys::Event)>::new(
            move |_: web_sys::Event| cb(),
        );
        let name = intern(name);
        or_debug(
            el.add_event_listener_with_callback(
                name,
                cb.as_ref().unchecked_ref(),
            ),
            el,
            "addEventListener",
        );

        let name = name.to_owned();
        RemoveEventHandler::new(move |el: &Element| {
            or_debug(
                el.remove_event_listener_with_callback(
                    intern(&name),
                    cb.as_ref().unchecked_ref(),
                ),
                el,
                "removeEventListener",
            );
        })
    }
}
