//! A counter island: one interactive component embedded in an otherwise
//! server-rendered page.
//!
//! The server emits a placeholder element (see [`props::render_placeholder`])
//! carrying its initialization props as JSON in a `data-props` attribute. In
//! the browser, [`mount::mount_with`] finds that placeholder, parses the props
//! and replaces its static contents with a live [`component::CounterIsland`].
//!
//! ```
//! use counter_island::prelude::*;
//!
//! let mut props = InitProps::new();
//! props.insert("message", "Hi");
//! let html = render_placeholder("react-hello", "data-props", &props);
//!
//! // the server writes `html` into the page, and the browser reads it back
//! # let parsed =
//! #     InitProps::from_attribute(Some(r#"{"message":"Hi"}"#)).unwrap();
//! # assert_eq!(parsed, props);
//! # assert!(html.starts_with("<div id=\"react-hello\""));
//! ```
//!
//! Rendering goes through the [`renderer::Renderer`] trait, so the same
//! component runs against the browser DOM (feature `web`) and against
//! [`renderer::mock_dom::MockDom`] in tests.

pub mod component;
pub mod error;
pub mod mount;
pub mod props;
pub mod renderer;
pub mod view;

pub mod prelude {
    pub use crate::{
        component::{Counter, CounterIsland},
        error::MountError,
        mount::{
            mount, mount_with, MountOptions, ReadyObserver, UnmountHandle,
            CONFIGURED_PROPS_ATTRIBUTE, CONFIGURED_READY_FLAG,
            CONFIGURED_SELECTOR, DEFAULT_PROPS_ATTRIBUTE, DEFAULT_READY_FLAG,
            DEFAULT_SELECTOR,
        },
        props::{
            render_placeholder, resolve, InitProps, ResolvedProps,
            DEFAULT_MESSAGE,
        },
        renderer::Renderer,
        view::{render, VisualTree},
    };

    #[cfg(feature = "web")]
    pub use crate::{mount::WindowFlag, renderer::dom::Dom};
}

/// Browser entry point: mounts the island once the module loads, using the
/// selector, props attribute and ready flag from `[package.metadata.island]`.
///
/// A malformed props attribute is thrown back to JavaScript as an error.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn hydrate() -> Result<(), wasm_bindgen::JsValue> {
    use prelude::*;

    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    if let Some(handle) = mount_with::<Dom>(
        &MountOptions::configured(),
        Some(&WindowFlag::configured()),
    )? {
        handle.forget();
    }
    Ok(())
}
