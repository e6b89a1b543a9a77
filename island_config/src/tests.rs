use crate::{
    env_from_str, env_w_default, env_wo_default, AssetManifest, Env,
    IslandOptions,
};

#[test]
fn env_from_str_test() {
    assert!(matches!(env_from_str("dev").unwrap(), Env::DEV));
    assert!(matches!(env_from_str("development").unwrap(), Env::DEV));
    assert!(matches!(env_from_str("DEV").unwrap(), Env::DEV));
    assert!(matches!(env_from_str("staging").unwrap(), Env::STAGING));
    assert!(matches!(env_from_str("prod").unwrap(), Env::PROD));
    assert!(matches!(env_from_str("PRODUCTION").unwrap(), Env::PROD));
    assert!(env_from_str("TEST").is_err());
    assert!(env_from_str("?").is_err());
}

#[test]
fn env_display_round_trips() {
    for env in [Env::DEV, Env::STAGING, Env::PROD] {
        assert_eq!(env.to_string().parse::<Env>().unwrap(), env);
    }
}

#[test]
fn env_w_default_test() {
    temp_env::with_var("ISLAND_CONFIG_ENV_TEST", Some("custom"), || {
        assert_eq!(
            env_w_default("ISLAND_CONFIG_ENV_TEST", "default").unwrap(),
            String::from("custom")
        );
    });

    temp_env::with_var_unset("ISLAND_CONFIG_ENV_TEST", || {
        assert_eq!(
            env_w_default("ISLAND_CONFIG_ENV_TEST", "default").unwrap(),
            String::from("default")
        );
    });
}

#[test]
fn env_wo_default_test() {
    temp_env::with_var("ISLAND_CONFIG_ENV_TEST", Some("custom"), || {
        assert_eq!(
            env_wo_default("ISLAND_CONFIG_ENV_TEST").unwrap(),
            Some(String::from("custom"))
        );
    });

    temp_env::with_var_unset("ISLAND_CONFIG_ENV_TEST", || {
        assert_eq!(env_wo_default("ISLAND_CONFIG_ENV_TEST").unwrap(), None);
    });
}

#[test]
fn try_from_env_test() {
    let config = temp_env::with_vars(
        [
            ("ISLAND_OUTPUT_NAME", Some("island")),
            ("ISLAND_SITE_ROOT", Some("public")),
            ("ISLAND_SITE_PKG_DIR", Some("pkg")),
            ("ISLAND_STATIC_BASE", Some("/assets-root")),
            ("ISLAND_MOUNT_SELECTOR", Some("#counter")),
            ("ISLAND_PROPS_ATTRIBUTE", Some("data-init")),
            ("ISLAND_READY_FLAG", Some("__READY__")),
            ("ISLAND_ENV", Some("PROD")),
        ],
        || IslandOptions::try_from_env().unwrap(),
    );

    assert_eq!(config.output_name.as_ref(), "island");
    assert_eq!(config.site_root.as_ref(), "public");
    assert_eq!(config.site_pkg_dir.as_ref(), "pkg");
    assert_eq!(config.static_base.as_ref(), "/assets-root");
    assert_eq!(config.mount_selector.as_ref(), "#counter");
    assert_eq!(config.props_attribute.as_ref(), "data-init");
    assert_eq!(config.ready_flag.as_ref(), "__READY__");
    assert_eq!(config.env, Env::PROD);
}

#[test]
fn defaults_match_page_contract() {
    let options = IslandOptions::default();
    assert_eq!(options.output_name.as_ref(), "main");
    assert_eq!(options.site_root.as_ref(), "app/static");
    assert_eq!(options.site_pkg_dir.as_ref(), "assets");
    assert_eq!(options.mount_selector.as_ref(), "#react-hello");
    assert_eq!(options.props_attribute.as_ref(), "data-props");
    assert_eq!(options.ready_flag.as_ref(), "__ISLAND_OK__");
    assert_eq!(options.env, Env::DEV);
}

#[test]
fn manifest_uses_stable_names() {
    let manifest = AssetManifest::new(&IslandOptions::default());
    assert_eq!(manifest.out_dir(), "app/static/assets");
    assert_eq!(manifest.js_path(), "assets/main.js");
    assert_eq!(manifest.wasm_path(), "assets/main_bg.wasm");
    assert_eq!(manifest.asset_path("style", "css"), "assets/style.css");
    assert_eq!(manifest.url("assets/main.js"), "/static/assets/main.js");
}

#[test]
fn manifest_url_normalizes_slashes() {
    let options = IslandOptions::builder().static_base("/static/").build();
    let manifest = AssetManifest::new(&options);
    assert_eq!(manifest.url("/assets/main.js"), "/static/assets/main.js");
}

#[test]
fn hydration_scripts_reference_stable_urls() {
    let options = IslandOptions::builder().output_name("island").build();
    let scripts = AssetManifest::new(&options).hydration_scripts();
    assert!(scripts.contains(
        "<link rel=\"modulepreload\" href=\"/static/assets/island.js\">"
    ));
    assert!(scripts.contains("href=\"/static/assets/island_bg.wasm\""));
    assert!(scripts.contains("import init from \"/static/assets/island.js\";"));
    assert!(scripts.contains(
        "init({ module_or_path: \"/static/assets/island_bg.wasm\" });"
    ));
}

#[test]
fn hydration_scripts_escape_configured_paths() {
    let options = IslandOptions::builder()
        .static_base("/st\"atic</script>")
        .build();
    let scripts = AssetManifest::new(&options).hydration_scripts();

    assert!(scripts
        .contains("href=\"/st&quot;atic&lt;/script&gt;/assets/main.js\""));
    assert!(scripts.contains(
        "import init from \"/st\\\"atic\\u003c/script>/assets/main.js\";"
    ));
    // the only closing tag is the one that ends the module script
    assert_eq!(scripts.matches("</script>").count(), 1);
    assert!(scripts.ends_with("</script>"));
}

#[test]
fn placeholder_uses_configured_selector_and_attribute() {
    let options = IslandOptions::builder()
        .mount_selector("#counter")
        .props_attribute("data-init")
        .build();
    let manifest = AssetManifest::new(&options);

    let empty = serde_json::Map::new();
    assert_eq!(
        manifest.placeholder(&empty).unwrap(),
        "<div id=\"counter\"></div>"
    );
    assert_eq!(
        manifest
            .placeholder(&serde_json::json!({ "message": "a\"b" }))
            .unwrap(),
        concat!(
            "<div id=\"counter\" data-init=\"",
            "{&quot;message&quot;:&quot;a\\&quot;b&quot;}\"></div>"
        )
    );
}

#[test]
fn placeholder_class_selector() {
    let options = IslandOptions::builder().mount_selector(".island").build();
    let html = AssetManifest::new(&options)
        .placeholder(&serde_json::Map::new())
        .unwrap();
    assert_eq!(html, "<div class=\"island\"></div>");
}

#[test]
fn placeholder_rejects_complex_selector() {
    let options = IslandOptions::builder()
        .mount_selector("main > div")
        .build();
    let err = AssetManifest::new(&options)
        .placeholder(&serde_json::Map::new())
        .unwrap_err();
    assert!(matches!(err, crate::errors::IslandConfigError::ConfigError(_)));
}
