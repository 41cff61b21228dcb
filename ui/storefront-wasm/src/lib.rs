//! Storefront WASM frontend.
//!
//! Pure Rust + WASM storefront widget set: product catalog with
//! search/filter/sort and a localStorage-backed shopping cart. Each concern
//! lives in its own module; components are mounted once per matching root
//! element and share a single cart service.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod dom;
pub mod storage;

use std::rc::Rc;

use sf_cart_core::CartService;
use wasm_bindgen::prelude::*;

use crate::storage::LocalCartStore;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init()
}

/// Mount every component instance over one shared cart service.
fn init() -> Result<(), JsValue> {
    let service = Rc::new(CartService::new(LocalCartStore));

    for root in dom::query_all(catalog::ROOT_SELECTOR) {
        catalog::Catalog::mount(root, service.clone())?;
    }
    for root in dom::query_all(cart::ROOT_SELECTOR) {
        cart::Cart::mount(root, service.clone())?;
    }

    Ok(())
}
