use std::fmt::Debug;

/// A DOM renderer backed by `web_sys`.
#[cfg(feature = "web")]
pub mod dom;
/// A renderer based on an in-memory mock DOM.
pub mod mock_dom;

/// Implements the instructions the island needs to find its mount target and
/// render into it.
///
/// The browser implementation is [`dom::Dom`]; [`mock_dom::MockDom`] runs the
/// same component logic without a browser.
pub trait Renderer: Debug + Sized + 'static {
    /// The basic type of node in the view tree.
    type Node: Clone + 'static;
    /// A visible element in the view tree.
    type Element: AsRef<Self::Node> + Clone + 'static;
    /// A text node in the view tree.
    type Text: AsRef<Self::Node> + Clone + 'static;

    /// Creates a new element with the given tag name.
    fn create_element(tag: &str) -> Self::Element;

    /// Creates a new text node.
    fn create_text_node(text: &str) -> Self::Text;

    /// Sets the text content of the node.
    fn set_text(node: &Self::Text, text: &str);

    /// Sets the given attribute on the given node by key and value.
    fn set_attribute(node: &Self::Element, name: &str, value: &str);

    /// Reads an attribute from the given node.
    fn get_attribute(node: &Self::Element, name: &str) -> Option<String>;

    /// Appends the new child to the parent, before the anchor node. If `anchor`
    /// is `None`, append to the end of the parent's children.
    fn insert_node(
        parent: &Self::Element,
        new_child: &Self::Node,
        anchor: Option<&Self::Node>,
    );

    /// Removes all children from the parent element.
    fn clear_children(parent: &Self::Element);

    /// Returns the first element in the document that matches the selector,
    /// if any.
    ///
    /// A selector the renderer cannot parse matches nothing and yields
    /// `None`, the same as a selector with no match.
    fn query_selector(selector: &str) -> Option<Self::Element>;

    /// Adds an event listener to an element.
    ///
    /// Returns a handle that removes the listener.
    fn add_event_listener(
        el: &Self::Element,
        name: &str,
        cb: Box<dyn FnMut()>,
    ) -> RemoveEventHandler<Self::Element>;
}

/// A function that can be called to remove an event handler from an element
/// after it has been added.
#[must_use = "Dropping this without calling remove() leaves the listener \
              attached for the lifetime of the element."]
pub struct RemoveEventHandler<T>(Box<dyn FnOnce(&T)>);

impl<T> RemoveEventHandler<T> {
    /// Creates a new container with a function that will be called to remove
    /// the listener.
    pub(crate) fn new(remove: impl FnOnce(&T) + 'static) -> Self {
        Self(Box::new(remove))
    }

    /// Removes the listener from the element.
    pub fn remove(self, el: &T) {
        (self.0)(el)
    }
}

impl<T> Debug for RemoveEventHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RemoveEventHandler").finish()
    }
}
