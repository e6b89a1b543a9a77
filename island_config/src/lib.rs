#![forbid(unsafe_code)]
//! Configuration for the counter island's build output and mount contract.
//!
//! The compiled island is written under the backend's static directory with
//! stable, non-hashed file names, so that server-rendered pages can reference
//! it without being regenerated on every build. Settings live in
//! `[package.metadata.island]` and can be overridden with `ISLAND_*`
//! environment variables.

pub mod errors;

use crate::errors::IslandConfigError;
use config::{Case, Config, File, FileFormat};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::{env::VarError, fmt, fs, path::Path, str::FromStr, sync::Arc};
use typed_builder::TypedBuilder;

/// A Struct to allow us to parse the island's settings from a Cargo.toml.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ConfFile {
    pub island_options: IslandOptions,
}

/// Settings for the island's build output and for the placeholder contract
/// between the server-rendered page and the client.
#[derive(TypedBuilder, Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct IslandOptions {
    /// The base name of the JS and Wasm files. Files are never content-hashed.
    /// Defaults to `main`.
    #[builder(setter(into), default = default_output_name())]
    #[serde(default = "default_output_name")]
    pub output_name: Arc<str>,
    /// The backend's static directory, relative to the workspace root. Other
    /// files in it belong to the backend and must be left alone. Defaults to
    /// `app/static`.
    #[builder(setter(into), default = default_site_root())]
    #[serde(default = "default_site_root")]
    pub site_root: Arc<str>,
    /// The directory under `site_root` that compiled assets are written into.
    /// Defaults to `assets`.
    #[builder(setter(into), default = default_site_pkg_dir())]
    #[serde(default = "default_site_pkg_dir")]
    pub site_pkg_dir: Arc<str>,
    /// The URL prefix the backend serves `site_root` under.
    /// Defaults to `/static`.
    #[builder(setter(into), default = default_static_base())]
    #[serde(default = "default_static_base")]
    pub static_base: Arc<str>,
    /// The selector of the placeholder element.
    /// Defaults to `#react-hello`.
    #[builder(setter(into), default = default_mount_selector())]
    #[serde(default = "default_mount_selector")]
    pub mount_selector: Arc<str>,
    /// The placeholder attribute carrying the JSON props.
    /// Defaults to `data-props`.
    #[builder(setter(into), default = default_props_attribute())]
    #[serde(default = "default_props_attribute")]
    pub props_attribute: Arc<str>,
    /// The `window` property set once the island is interactive.
    /// Defaults to `__ISLAND_OK__`.
    #[builder(setter(into), default = default_ready_flag())]
    #[serde(default = "default_ready_flag")]
    pub ready_flag: Arc<str>,
    /// The deployment environment.
    /// Defaults to `DEV`.
    #[builder(default)]
    #[serde(default)]
    pub env: Env,
}

impl IslandOptions {
    /// Builds the options entirely from `ISLAND_*` environment variables, using
    /// defaults for anything unset.
    pub fn try_from_env() -> Result<Self, IslandConfigError> {
        Ok(IslandOptions {
            output_name: env_w_default("ISLAND_OUTPUT_NAME", "main")?.into(),
            site_root: env_w_default("ISLAND_SITE_ROOT", "app/static")?.into(),
            site_pkg_dir: env_w_default("ISLAND_SITE_PKG_DIR", "assets")?
                .into(),
            static_base: env_w_default("ISLAND_STATIC_BASE", "/static")?.into(),
            mount_selector: env_w_default(
                "ISLAND_MOUNT_SELECTOR",
                "#react-hello",
            )?
            .into(),
            props_attribute: env_w_default(
                "ISLAND_PROPS_ATTRIBUTE",
                "data-props",
            )?
            .into(),
            ready_flag: env_w_default("ISLAND_READY_FLAG", "__ISLAND_OK__")?
                .into(),
            env: env_from_str(env_w_default("ISLAND_ENV", "dev")?.as_str())?,
        })
    }
}

impl Default for IslandOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_output_name() -> Arc<str> {
    "main".into()
}

fn default_site_root() -> Arc<str> {
    "app/static".into()
}

fn default_site_pkg_dir() -> Arc<str> {
    "assets".into()
}

fn default_static_base() -> Arc<str> {
    "/static".into()
}

fn default_mount_selector() -> Arc<str> {
    "#react-hello".into()
}

fn default_props_attribute() -> Arc<str> {
    "data-props".into()
}

fn default_ready_flag() -> Arc<str> {
    "__ISLAND_OK__".into()
}

fn env_wo_default(key: &str) -> Result<Option<String>, IslandConfigError> {
    match std::env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(IslandConfigError::EnvVarError(format!("{key}: {e}"))),
    }
}

fn env_w_default(
    key: &str,
    default: &str,
) -> Result<String, IslandConfigError> {
    Ok(env_wo_default(key)?.unwrap_or_else(|| default.to_string()))
}

/// An enum that can be used to define the environment the island is deployed
/// to.
#[derive(Debug, Clone, Copy, serde::Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum Env {
    PROD,
    STAGING,
    #[default]
    DEV,
}

fn env_from_str(input: &str) -> Result<Env, IslandConfigError> {
    let sanitized = input.to_lowercase();
    match sanitized.as_ref() {
        "dev" | "development" => Ok(Env::DEV),
        "staging" => Ok(Env::STAGING),
        "prod" | "production" => Ok(Env::PROD),
        _ => Err(IslandConfigError::EnvVarError(format!(
            "{input} is not a supported environment. Use `development`, \
             `staging` or `production`.",
        ))),
    }
}

impl FromStr for Env {
    type Err = IslandConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        env_from_str(input)
    }
}

impl TryFrom<String> for Env {
    type Error = IslandConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        env_from_str(s.as_str())
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Env::PROD => "production",
            Env::STAGING => "staging",
            Env::DEV => "development",
        })
    }
}

/// Loads [`IslandOptions`] from a Cargo.toml at `path`, or from the environment
/// alone if no path is given.
pub fn get_configuration(
    path: Option<&str>,
) -> Result<ConfFile, IslandConfigError> {
    if let Some(path) = path {
        get_config_from_file(path)
    } else {
        get_config_from_env()
    }
}

/// Loads [`IslandOptions`] from the `[package.metadata.island]` section of a
/// Cargo.toml.
pub fn get_config_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<ConfFile, IslandConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|_| IslandConfigError::ConfigNotFound)?;
    let island_options = get_config_from_str(&text)?;
    Ok(ConfFile { island_options })
}

/// Parses the `[package.metadata.island]` section out of Cargo.toml text,
/// applying `ISLAND_*` environment overrides on top.
pub fn get_config_from_str(
    text: &str,
) -> Result<IslandOptions, IslandConfigError> {
    let re = Regex::new(r"(?m)^\[package\.metadata\.island\]")
        .map_err(|e| IslandConfigError::ConfigError(e.to_string()))?;
    let start = match re.find(text) {
        Some(found) => found.end(),
        None => return Err(IslandConfigError::ConfigSectionNotFound),
    };

    // so that serde error messages have right line number
    let newlines = text[..start].matches('\n').count();
    let section_end = text[start..]
        .find("\n[")
        .map(|idx| start + idx)
        .unwrap_or(text.len());
    let input = "\n".repeat(newlines) + &text[start..section_end];

    let config = Config::builder()
        .add_source(File::from_str(&input, FileFormat::Toml))
        .add_source(
            config::Environment::with_prefix("ISLAND")
                .convert_case(Case::Kebab)
                .keep_prefix(false),
        )
        .build()?;

    config
        .try_deserialize()
        .map_err(|e| IslandConfigError::ConfigError(e.to_string()))
}

/// Loads [`IslandOptions`] from `ISLAND_*` environment variables only.
pub fn get_config_from_env() -> Result<ConfFile, IslandConfigError> {
    Ok(ConfFile {
        island_options: IslandOptions::try_from_env()?,
    })
}

/// The stable paths of the island's compiled assets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetManifest {
    options: IslandOptions,
}

impl AssetManifest {
    pub fn new(options: &IslandOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }

    /// The directory compiled assets are written into, relative to the
    /// workspace root.
    pub fn out_dir(&self) -> String {
        format!("{}/{}", self.options.site_root, self.options.site_pkg_dir)
    }

    /// The JS entry module, relative to `site_root`.
    pub fn js_path(&self) -> String {
        self.asset_path(&self.options.output_name, "js")
    }

    /// The Wasm binary, relative to `site_root`.
    pub fn wasm_path(&self) -> String {
        self.asset_path(&format!("{}_bg", self.options.output_name), "wasm")
    }

    /// Any other emitted asset, relative to `site_root`. Names are kept as-is.
    pub fn asset_path(&self, name: &str, ext: &str) -> String {
        format!("{}/{name}.{ext}", self.options.site_pkg_dir)
    }

    /// The URL the backend serves a `site_root`-relative path under.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.options.static_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The `<head>` tags that load and start the island.
    pub fn hydration_scripts(&self) -> String {
        let js = self.url(&self.js_path());
        let wasm = self.url(&self.wasm_path());
        let js_href = html_escape::encode_double_quoted_attribute(&js);
        let wasm_href = html_escape::encode_double_quoted_attribute(&wasm);
        let js_literal = script_string(&js);
        let wasm_literal = script_string(&wasm);
        format!(
            "<link rel=\"modulepreload\" href=\"{js_href}\">\
             <link rel=\"preload\" href=\"{wasm_href}\" as=\"fetch\" \
             type=\"application/wasm\" crossorigin=\"\">\
             <script type=\"module\">import init from {js_literal}; \
             init({{ module_or_path: {wasm_literal} }});</script>"
        )
    }

    /// The server-rendered placeholder element for the island, using the
    /// configured selector and props attribute.
    ///
    /// The selector must be an `#id` or `.class` selector so that an element
    /// can be written for it. Empty props are left out entirely.
    pub fn placeholder<P: Serialize>(
        &self,
        props: &P,
    ) -> Result<String, IslandConfigError> {
        let selector = self.options.mount_selector.trim();
        let (name, value) = if let Some(id) = selector.strip_prefix('#') {
            ("id", id)
        } else if let Some(class) = selector.strip_prefix('.') {
            ("class", class)
        } else {
            return Err(IslandConfigError::ConfigError(format!(
                "mount-selector {selector:?} is not an `#id` or `.class` \
                 selector"
            )));
        };
        let value = html_escape::encode_double_quoted_attribute(value);

        let props = serde_json::to_value(props)
            .map_err(|e| IslandConfigError::ConfigError(e.to_string()))?;
        match props {
            Value::Object(map) if map.is_empty() => {
                Ok(format!("<div {name}=\"{value}\"></div>"))
            }
            props => {
                let json = props.to_string();
                let json = html_escape::encode_double_quoted_attribute(&json);
                let attribute = &self.options.props_attribute;
                Ok(format!(
                    "<div {name}=\"{value}\" {attribute}=\"{json}\"></div>"
                ))
            }
        }
    }
}

/// A JS string literal that is safe inside an inline `<script>`.
fn script_string(s: &str) -> String {
    Value::String(s.to_string()).to_string().replace('<', "\\u003c")
}

#[cfg(test)]
mod tests;
