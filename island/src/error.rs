use thiserror::Error;

/// The ways in which mounting the island can fail.
///
/// A missing mount target is not an error: pages without the island load
/// normally.
#[derive(Debug, Error)]
pub enum MountError {
    /// The serialized-properties attribute was present, but was not well-formed
    /// JSON.
    #[error("could not parse island props: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(feature = "web")]
impl From<MountError> for wasm_bindgen::JsValue {
    fn from(err: MountError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
