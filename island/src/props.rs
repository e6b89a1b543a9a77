//! Hydration props: the initialization data the server serializes into the
//! placeholder element, and its resolution into the values the component
//! actually renders.

use crate::error::MountError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// The greeting shown when the server does not provide a usable `message`.
pub const DEFAULT_MESSAGE: &str = "Hello from React Island!";

/// Initialization properties read from the placeholder element.
///
/// This is an arbitrary JSON object. It is consumed once, at mount time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitProps(Map<String, Value>);

impl InitProps {
    /// Creates an empty set of props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the value of the serialized-properties attribute.
    ///
    /// An absent or empty attribute yields an empty mapping. Malformed JSON is
    /// a [`MountError::Parse`]. Well-formed JSON that is not an object carries
    /// no props and also yields an empty mapping.
    pub fn from_attribute(attr: Option<&str>) -> Result<Self, MountError> {
        match attr.filter(|raw| !raw.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => match serde_json::from_str::<Value>(raw)? {
                Value::Object(map) => Ok(Self(map)),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Serializes the props as they should appear in the attribute.
    pub fn to_attribute(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    /// Adds a property, replacing any previous value under the same key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Looks up a raw property value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no properties at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for InitProps {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Props after default substitution, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedProps {
    pub message: Cow<'static, str>,
}

impl Default for ResolvedProps {
    fn default() -> Self {
        Self {
            message: Cow::Borrowed(DEFAULT_MESSAGE),
        }
    }
}

/// Substitutes defaults for missing or unusable props.
///
/// `message` is used only if it is a JSON string. Any other shape falls back to
/// [`DEFAULT_MESSAGE`] without complaint.
pub fn resolve(props: &InitProps) -> ResolvedProps {
    match props.get("message") {
        Some(Value::String(message)) => ResolvedProps {
            message: Cow::Owned(message.clone()),
        },
        _ => ResolvedProps::default(),
    }
}

/// Renders the server-side placeholder element for an island.
///
/// The props are written into `attribute` as attribute-escaped JSON, so that
/// [`InitProps::from_attribute`] reads back exactly what was written.
pub fn render_placeholder(
    id: &str,
    attribute: &str,
    props: &InitProps,
) -> String {
    let id = html_escape::encode_double_quoted_attribute(id);
    if props.is_empty() {
        format!("<div id=\"{id}\"></div>")
    } else {
        let json = props.to_attribute();
        let json = html_escape::encode_double_quoted_attribute(&json);
        format!("<div id=\"{id}\" {attribute}=\"{json}\"></div>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_attribute_is_empty() {
        let props = InitProps::from_attribute(None).unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn object_attribute_parses() {
        let props =
            InitProps::from_attribute(Some(r#"{"message":"Hi","n":3}"#))
                .unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("n"), Some(&json!(3)));
    }

    #[test]
    fn malformed_attribute_is_parse_error() {
        let err = InitProps::from_attribute(Some("{bad json")).unwrap_err();
        assert!(matches!(err, MountError::Parse(_)));
    }

    #[test]
    fn non_object_json_is_empty() {
        for raw in ["[1, 2]", "42", "\"message\"", "null", "true"] {
            let props = InitProps::from_attribute(Some(raw)).unwrap();
            assert!(props.is_empty(), "{raw} should carry no props");
            assert_eq!(resolve(&props).message, DEFAULT_MESSAGE);
        }
    }

    #[test]
    fn empty_attribute_is_empty() {
        let props = InitProps::from_attribute(Some("")).unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn whitespace_attribute_is_parse_error() {
        let err = InitProps::from_attribute(Some("   ")).unwrap_err();
        assert!(matches!(err, MountError::Parse(_)));
    }

    #[test]
    fn resolve_uses_string_message() {
        let mut props = InitProps::new();
        props.insert("message", "Hi");
        assert_eq!(resolve(&props).message, "Hi");
    }

    #[test]
    fn resolve_falls_back_to_default() {
        assert_eq!(resolve(&InitProps::new()).message, DEFAULT_MESSAGE);

        for bad in [json!(null), json!(7), json!(["Hi"]), json!({"a": 1})] {
            let mut props = InitProps::new();
            props.insert("message", bad);
            assert_eq!(resolve(&props).message, DEFAULT_MESSAGE);
        }
    }

    #[test]
    fn empty_string_message_is_kept() {
        let mut props = InitProps::new();
        props.insert("message", "");
        assert_eq!(resolve(&props).message, "");
    }

    #[test]
    fn placeholder_escapes_props() {
        let mut props = InitProps::new();
        props.insert("message", "say \"hi\" & <wave>");
        let html = render_placeholder("react-hello", "data-props", &props);
        assert!(html.starts_with("<div id=\"react-hello\" data-props=\""));
        assert!(!html.contains("\"hi\""));
        assert!(html.contains("&quot;"));
    }

    #[test]
    fn placeholder_without_props_has_no_attribute() {
        let html =
            render_placeholder("react-hello", "data-props", &InitProps::new());
        assert_eq!(html, "<div id=\"react-hello\"></div>");
    }
}
