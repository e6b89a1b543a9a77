#![cfg(all(feature = "web", target_family = "wasm"))]

use counter_island::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn placeholder(id: &str, props: Option<&str>) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("div").unwrap();
    el.set_id(id);
    if let Some(props) = props {
        el.set_attribute("data-props", props).unwrap();
    }
    el.set_text_content(Some("static"));
    document.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn mounts_into_browser_dom() {
    let el = placeholder("web-hello", Some(r#"{"message":"Hi"}"#));
    let handle = mount::<Dom>("#web-hello").unwrap().unwrap();

    let text = el.text_content().unwrap();
    assert!(text.starts_with("React Island!: Hi"));

    let button = el.query_selector("button").unwrap().unwrap();
    button.unchecked_ref::<web_sys::HtmlElement>().click();
    assert_eq!(button.text_content().unwrap(), "Clicks: 1");
    assert_eq!(handle.island().count(), 1);
}

#[wasm_bindgen_test]
fn window_flag_is_set() {
    placeholder("flag-hello", None);
    let options = MountOptions::new("#flag-hello");
    let flag = WindowFlag::new(String::from("__FLAG_TEST__"));
    let handle = mount_with::<Dom>(&options, Some(&flag)).unwrap();
    assert!(handle.is_some());

    let window = web_sys::window().unwrap();
    let flag =
        js_sys::Reflect::get(&window, &JsValue::from_str("__FLAG_TEST__"))
            .unwrap();
    assert_eq!(flag, JsValue::TRUE);
}

#[wasm_bindgen_test]
fn malformed_props_throw() {
    let el = placeholder("bad-hello", Some("{bad json"));
    let err = mount::<Dom>("#bad-hello").unwrap_err();
    assert!(matches!(err, MountError::Parse(_)));
    assert_eq!(el.text_content().unwrap(), "static");
}
