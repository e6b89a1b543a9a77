use crate::{
    component::CounterIsland,
    error::MountError,
    props::{resolve, InitProps},
    renderer::Renderer,
};
#[cfg(feature = "web")]
use std::borrow::Cow;
use std::fmt::Debug;

/// The selector the server-rendered page uses for the island's placeholder.
pub const DEFAULT_SELECTOR: &str = "#react-hello";

/// The attribute holding the serialized [`InitProps`].
pub const DEFAULT_PROPS_ATTRIBUTE: &str = "data-props";

/// The window property set once the island is live.
pub const DEFAULT_READY_FLAG: &str = "__ISLAND_OK__";

/// The placeholder selector from `[package.metadata.island]`, resolved when the
/// crate is built.
pub const CONFIGURED_SELECTOR: &str = env!("ISLAND_BUILD_MOUNT_SELECTOR");

/// The props attribute from `[package.metadata.island]`.
pub const CONFIGURED_PROPS_ATTRIBUTE: &str =
    env!("ISLAND_BUILD_PROPS_ATTRIBUTE");

/// The ready flag from `[package.metadata.island]`.
pub const CONFIGURED_READY_FLAG: &str = env!("ISLAND_BUILD_READY_FLAG");

/// Where to find the placeholder and its props.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountOptions {
    pub selector: String,
    pub props_attribute: String,
}

impl MountOptions {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ..Default::default()
        }
    }

    /// The options this crate was built with, from `[package.metadata.island]`
    /// and any `ISLAND_*` overrides present at build time.
    pub fn configured() -> Self {
        Self {
            selector: CONFIGURED_SELECTOR.to_string(),
            props_attribute: CONFIGURED_PROPS_ATTRIBUTE.to_string(),
        }
    }

    pub fn with_props_attribute(
        mut self,
        attribute: impl Into<String>,
    ) -> Self {
        self.props_attribute = attribute.into();
        self
    }
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            props_attribute: DEFAULT_PROPS_ATTRIBUTE.to_string(),
        }
    }
}

/// Notified once the island has been mounted and is interactive.
///
/// Diagnostics hook in here instead of reading process-wide state.
pub trait ReadyObserver {
    fn island_ready(&self, selector: &str);
}

impl<F> ReadyObserver for F
where
    F: Fn(&str),
{
    fn island_ready(&self, selector: &str) {
        self(selector)
    }
}

/// Sets a boolean property on `window` when the island is ready, so it can be
/// checked from the browser console or an end-to-end test.
#[cfg(feature = "web")]
#[derive(Clone, Debug)]
pub struct WindowFlag(pub Cow<'static, str>);

#[cfg(feature = "web")]
impl WindowFlag {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The flag this crate was built with.
    pub fn configured() -> Self {
        Self::new(CONFIGURED_READY_FLAG)
    }
}

#[cfg(feature = "web")]
impl Default for WindowFlag {
    fn default() -> Self {
        Self::new(DEFAULT_READY_FLAG)
    }
}

#[cfg(feature = "web")]
impl ReadyObserver for WindowFlag {
    fn island_ready(&self, _selector: &str) {
        use wasm_bindgen::JsValue;

        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = js_sys::Reflect::set(
            &window,
            &JsValue::from_str(&self.0),
            &JsValue::TRUE,
        ) {
            tracing::warn!(
                flag = %self.0,
                error = ?err,
                "could not set ready flag"
            );
        }
    }
}

/// Owns a mounted island. Dropping it unmounts the island and clears the
/// placeholder.
///
/// If the island should live as long as the page, call
/// [`UnmountHandle::forget`].
#[must_use]
pub struct UnmountHandle<R: Renderer> {
    island: CounterIsland<R>,
}

impl<R: Renderer> UnmountHandle<R> {
    /// The mounted island.
    pub fn island(&self) -> &CounterIsland<R> {
        &self.island
    }

    /// Leaks the handle, keeping the island mounted for the rest of the page's
    /// life.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl<R: Renderer> Debug for UnmountHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnmountHandle")
            .field("count", &self.island.count())
            .finish()
    }
}

/// Mounts the island on the element matching `selector`, reading props from
/// `data-props`.
///
/// See [`mount_with`].
pub fn mount<R: Renderer>(
    selector: &str,
) -> Result<Option<UnmountHandle<R>>, MountError> {
    mount_with::<R>(&MountOptions::new(selector), None)
}

/// Finds the placeholder, reads its props and replaces its contents with a
/// live island.
///
/// Returns `Ok(None)` without touching the document if no element matches. A
/// selector the renderer cannot parse matches nothing, so it is the same no-op
/// rather than an error: the page around the island keeps loading. Props are
/// parsed before anything is rendered, so a [`MountError::Parse`] leaves the
/// placeholder as the server sent it.
pub fn mount_with<R: Renderer>(
    options: &MountOptions,
    observer: Option<&dyn ReadyObserver>,
) -> Result<Option<UnmountHandle<R>>, MountError> {
    let Some(host) = R::query_selector(&options.selector) else {
        tracing::debug!(
            selector = %options.selector,
            "no island placeholder on this page"
        );
        return Ok(None);
    };

    let raw = R::get_attribute(&host, &options.props_attribute);
    let props = InitProps::from_attribute(raw.as_deref())?;
    let resolved = resolve(&props);

    let island = CounterIsland::<R>::build(&host, resolved);
    tracing::info!(
        selector = %options.selector,
        props = props.len(),
        "island mounted"
    );

    if let Some(observer) = observer {
        observer.island_ready(&options.selector);
    }
    Ok(Some(UnmountHandle { island }))
}
