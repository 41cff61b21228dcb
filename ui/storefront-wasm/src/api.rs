//! Catalog loader.
//!
//! Wraps `fetch` for the single static JSON document the storefront reads.
//! Failures come back as plain strings; callers log and degrade.

use sf_types::Product;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::dom;

/// Relative path of the static product document.
pub const CATALOG_PATH: &str = "products.json";

/// Fetch and parse the product list.
///
/// The document itself is not validated beyond being a JSON array of
/// product records; individual missing fields degrade at render time.
pub async fn fetch_catalog(path: &str) -> Result<Vec<Product>, String> {
    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(path, &opts).map_err(|e| format!("{e:?}"))?;

    let resp_value = JsFuture::from(dom::window().fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch error: {e:?}"))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "response is not a Response".to_string())?;

    if !resp.ok() {
        return Err(format!("{} {}", resp.status(), resp.status_text()));
    }

    let text = JsFuture::from(resp.text().map_err(|e| format!("{e:?}"))?)
        .await
        .map_err(|e| format!("text error: {e:?}"))?;

    let text_str = text.as_string().unwrap_or_default();

    serde_json::from_str(&text_str).map_err(|e| format!("JSON parse error: {e}"))
}
