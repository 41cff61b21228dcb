//! DOM helpers and per-component element bindings.
//!
//! Each component locates its root by a data-attribute selector and its
//! children by selectors scoped to that root, so several instances of the
//! same component can coexist on one page without sharing elements.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlInputElement, HtmlSelectElement, MouseEvent};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let nl = doc().query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn query_within(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok()?
}

pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let nl = parent.query_selector_all(selector).unwrap();
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value()
}

pub fn get_select_value(el: &HtmlSelectElement) -> String {
    el.value()
}

/// Attach a click handler. The closure is leaked; listeners are bound once
/// to stable containers and live for the page lifetime.
pub fn on_click(target: &EventTarget, handler: impl FnMut(MouseEvent) + 'static) {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    target
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

/// Attach a handler for an arbitrary event kind ("input", "change", ...).
pub fn on_event(target: &EventTarget, kind: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    target
        .add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

/// Resolve the element a delegated handler should act on: the closest
/// ancestor of the event target matching `selector`, if any.
pub fn delegated_target(event: &web_sys::Event, selector: &str) -> Option<Element> {
    let target = event.target()?;
    let el = target.dyn_ref::<Element>()?;
    el.closest(selector).ok().flatten()
}

macro_rules! bind_el {
    ($root:expr, $selector:expr) => {
        query_within($root, $selector)
            .ok_or_else(|| JsValue::from_str(&format!("missing element {}", $selector)))?
    };
}

macro_rules! bind_input {
    ($root:expr, $selector:expr) => {
        bind_el!($root, $selector)
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| JsValue::from_str(&format!("{} is not an input", $selector)))?
    };
}

macro_rules! bind_select {
    ($root:expr, $selector:expr) => {
        bind_el!($root, $selector)
            .dyn_into::<HtmlSelectElement>()
            .map_err(|_| JsValue::from_str(&format!("{} is not a select", $selector)))?
    };
}

// ── Element bindings ──

/// Child elements of one `[data-js-shop]` root.
#[derive(Clone)]
pub struct ShopElements {
    pub root: Element,
    pub search: HtmlInputElement,
    pub filter: HtmlSelectElement,
    pub sort: HtmlSelectElement,
    pub catalog: Element,
}

impl ShopElements {
    pub fn bind(root: Element) -> Result<ShopElements, JsValue> {
        Ok(ShopElements {
            search: bind_input!(&root, "[data-js-search]"),
            filter: bind_select!(&root, "[data-js-filter]"),
            sort: bind_select!(&root, "[data-js-sort]"),
            catalog: bind_el!(&root, "[data-js-catalog]"),
            root,
        })
    }
}

/// Child elements of one `[data-js-cart]` root.
#[derive(Clone)]
pub struct CartElements {
    pub root: Element,
    pub list: Element,
    pub total: Element,
    pub delivery_options: Vec<HtmlInputElement>,
}

impl CartElements {
    pub fn bind(root: Element) -> Result<CartElements, JsValue> {
        let delivery_options = query_all_within(&root, "[data-js-cart-radio]")
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
            .collect();
        Ok(CartElements {
            list: bind_el!(&root, "[data-js-cart-list]"),
            total: bind_el!(&root, "[data-js-cart-amount]"),
            delivery_options,
            root,
        })
    }
}
