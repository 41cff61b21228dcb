//! localStorage-backed cart store.
//!
//! One slot, JSON array of id tokens. Access is synchronous and
//! unsynchronized: concurrent writers (other tabs) race, last write wins.

use sf_cart_core::{CART_SLOT, CartStore, decode_slot, encode_slot};

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// [`CartStore`] over `window.localStorage`. Absent storage (disabled by
/// the browser) behaves as a cart that is always empty and drops writes.
#[derive(Default)]
pub struct LocalCartStore;

impl CartStore for LocalCartStore {
    fn load(&self) -> Vec<String> {
        storage()
            .and_then(|s| s.get_item(CART_SLOT).ok().flatten())
            .map(|raw| decode_slot(&raw))
            .unwrap_or_default()
    }

    fn save(&self, tokens: &[String]) {
        if let Some(s) = storage() {
            let _ = s.set_item(CART_SLOT, &encode_slot(tokens));
        }
    }

    fn clear(&self) {
        if let Some(s) = storage() {
            let _ = s.remove_item(CART_SLOT);
        }
    }
}
