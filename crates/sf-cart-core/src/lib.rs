//! Cart state: the persisted id-token sequence, the quantity map derived
//! from it, and the totals computed over the catalog.
//!
//! The persisted representation is an ordered, non-deduplicated sequence of
//! product-id tokens under a single storage slot: one token per purchased
//! unit. Quantities are never stored; they are re-derived from the sequence
//! on every read. All fallible reads default to empty rather than erroring.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;
use sf_types::Product;

/// Name of the storage slot holding the cart token sequence.
pub const CART_SLOT: &str = "cart";

/// Delivery option value that triggers the courier surcharge.
pub const COURIER_OPTION: &str = "Курьер";

/// Flat surcharge applied when the courier delivery option is selected.
pub const COURIER_SURCHARGE: f64 = 40.0;

// ── Slot codec ──

/// Decode the raw slot contents into a normalized token sequence.
///
/// The slot holds a JSON array whose entries may be strings or numbers;
/// both normalize to string tokens. Anything malformed (bad JSON, wrong
/// shape, non-scalar entries) decodes as empty.
pub fn decode_slot(raw: &str) -> Vec<String> {
    let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

/// Encode a token sequence for the storage slot.
pub fn encode_slot(tokens: &[String]) -> String {
    serde_json::to_string(tokens).unwrap_or_else(|_| "[]".to_string())
}

// ── Derived quantity map ──

/// Tally the token sequence into an id → count map.
pub fn quantities(tokens: &[String]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

/// Distinct ids in first-occurrence order, for stable line-item rendering.
pub fn distinct_ids(tokens: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for token in tokens {
        if !seen.contains(token) {
            seen.push(token.clone());
        }
    }
    seen
}

/// Count of one id's tokens in the sequence.
pub fn count_of(tokens: &[String], id: &str) -> u32 {
    tokens.iter().filter(|t| t.as_str() == id).count() as u32
}

// ── Totals ──

/// Sum of unit prices over the whole token sequence. Tokens that do not
/// resolve to a known product contribute nothing.
pub fn subtotal(tokens: &[String], products: &[Product]) -> f64 {
    tokens
        .iter()
        .filter_map(|id| Product::find_by_id(products, id))
        .map(|p| p.price)
        .sum()
}

/// Surcharge for the currently selected delivery option, if any.
pub fn delivery_surcharge(selected: Option<&str>) -> f64 {
    match selected {
        Some(value) if value == COURIER_OPTION => COURIER_SURCHARGE,
        _ => 0.0,
    }
}

/// Format an amount for display, e.g. `250₽`.
pub fn format_amount(amount: f64) -> String {
    format!("{amount}₽")
}

// ── Storage abstraction ──

/// Persistence seam for the cart slot. Implementations are synchronous and
/// best-effort: a failed read is an empty cart, a failed write is dropped.
pub trait CartStore {
    fn load(&self) -> Vec<String>;
    fn save(&self, tokens: &[String]);
    fn clear(&self);
}

/// Heap-backed store for tests and headless use.
#[derive(Default)]
pub struct InMemoryCartStore {
    tokens: RefCell<Vec<String>>,
}

impl InMemoryCartStore {
    pub fn with_tokens(tokens: Vec<String>) -> Self {
        Self {
            tokens: RefCell::new(tokens),
        }
    }
}

impl CartStore for InMemoryCartStore {
    fn load(&self) -> Vec<String> {
        self.tokens.borrow().clone()
    }

    fn save(&self, tokens: &[String]) {
        *self.tokens.borrow_mut() = tokens.to_vec();
    }

    fn clear(&self) {
        self.tokens.borrow_mut().clear();
    }
}

// ── Mutation service ──

/// A single cart mutation, broadcast to subscribers after persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    Added(String),
    Removed(String),
    Cleared,
}

impl CartChange {
    /// Id affected by the change, if it names one.
    pub fn id(&self) -> Option<&str> {
        match self {
            CartChange::Added(id) | CartChange::Removed(id) => Some(id),
            CartChange::Cleared => None,
        }
    }
}

/// Mutation and notification hub over a [`CartStore`].
///
/// Every component on the page holds the same service instance, so a
/// mutation made by one (e.g. the catalog's add button) reaches all
/// subscribed cart views. Cross-tab consistency is out of scope: the slot
/// is unsynchronized and last write wins.
pub struct CartService<S: CartStore> {
    store: S,
    listeners: RefCell<Vec<Box<dyn Fn(&CartChange)>>>,
}

impl<S: CartStore> CartService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Current token sequence, re-read from the store.
    pub fn tokens(&self) -> Vec<String> {
        self.store.load()
    }

    pub fn is_empty(&self) -> bool {
        self.store.load().is_empty()
    }

    /// Current quantity of one product id.
    pub fn quantity_of(&self, id: &str) -> u32 {
        count_of(&self.store.load(), id)
    }

    /// Append one token and return the id's new quantity.
    pub fn add(&self, id: &str) -> u32 {
        let mut tokens = self.store.load();
        tokens.push(id.to_string());
        self.store.save(&tokens);
        let quantity = count_of(&tokens, id);
        self.notify(&CartChange::Added(id.to_string()));
        quantity
    }

    /// Remove the first matching token. No-op (and no notification) when
    /// the id is absent.
    pub fn remove_one(&self, id: &str) {
        let mut tokens = self.store.load();
        let Some(index) = tokens.iter().position(|t| t == id) else {
            return;
        };
        tokens.remove(index);
        self.store.save(&tokens);
        self.notify(&CartChange::Removed(id.to_string()));
    }

    /// Wipe the slot wholesale.
    pub fn clear(&self) {
        self.store.clear();
        self.notify(&CartChange::Cleared);
    }

    /// Register a change listener. Listeners live as long as the service.
    pub fn subscribe(&self, listener: impl Fn(&CartChange) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn notify(&self, change: &CartChange) {
        for listener in self.listeners.borrow().iter() {
            listener(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Товар {id}"),
            price,
            category: "misc".to_string(),
            image: String::new(),
        }
    }

    fn tokens(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decode_normalizes_numbers_and_strings() {
        assert_eq!(decode_slot(r#"["1", 2, "3"]"#), tokens(&["1", "2", "3"]));
    }

    #[test]
    fn decode_defaults_malformed_data_to_empty() {
        assert!(decode_slot("").is_empty());
        assert!(decode_slot("not json").is_empty());
        assert!(decode_slot(r#"{"cart": []}"#).is_empty());
        assert!(decode_slot("42").is_empty());
    }

    #[test]
    fn slot_round_trips_string_sequences() {
        let seq = tokens(&["1", "1", "2"]);
        assert_eq!(decode_slot(&encode_slot(&seq)), seq);
    }

    #[test]
    fn quantity_map_matches_token_counts() {
        let seq = tokens(&["1", "2", "1", "3", "1"]);
        let counts = quantities(&seq);
        assert_eq!(counts.get("1"), Some(&3));
        assert_eq!(counts.get("2"), Some(&1));
        assert_eq!(counts.get("3"), Some(&1));
        let sum: u32 = counts.values().sum();
        assert_eq!(sum as usize, seq.len());
    }

    #[test]
    fn distinct_ids_keep_first_occurrence_order() {
        let seq = tokens(&["2", "1", "2", "3", "1"]);
        assert_eq!(distinct_ids(&seq), tokens(&["2", "1", "3"]));
    }

    #[test]
    fn add_n_then_remove_n_restores_prior_state() {
        let service = CartService::new(InMemoryCartStore::with_tokens(tokens(&["7", "8", "7"])));
        let before = service.tokens();
        for _ in 0..5 {
            service.add("9");
        }
        for _ in 0..5 {
            service.remove_one("9");
        }
        assert_eq!(service.tokens(), before);
    }

    #[test]
    fn remove_takes_first_match_and_preserves_order() {
        let service =
            CartService::new(InMemoryCartStore::with_tokens(tokens(&["1", "2", "1", "3"])));
        service.remove_one("1");
        assert_eq!(service.tokens(), tokens(&["2", "1", "3"]));
    }

    #[test]
    fn remove_of_absent_id_is_a_no_op() {
        let service = CartService::new(InMemoryCartStore::with_tokens(tokens(&["1", "2"])));
        let notified = std::rc::Rc::new(RefCell::new(0u32));
        let n = notified.clone();
        service.subscribe(move |_| *n.borrow_mut() += 1);
        service.remove_one("404");
        assert_eq!(service.tokens(), tokens(&["1", "2"]));
        assert_eq!(*notified.borrow(), 0);
    }

    #[test]
    fn add_returns_new_quantity_and_notifies() {
        let service = CartService::new(InMemoryCartStore::default());
        let changes = std::rc::Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        service.subscribe(move |c| sink.borrow_mut().push(c.clone()));

        assert_eq!(service.add("3"), 1);
        assert_eq!(service.add("3"), 2);
        service.clear();

        assert_eq!(
            *changes.borrow(),
            vec![
                CartChange::Added("3".to_string()),
                CartChange::Added("3".to_string()),
                CartChange::Cleared,
            ]
        );
        assert!(service.is_empty());
    }

    #[test]
    fn subtotal_sums_resolvable_tokens_only() {
        let products = vec![product("1", 100.0), product("2", 50.0)];
        let seq = tokens(&["1", "1", "2", "discontinued"]);
        assert_eq!(subtotal(&seq, &products), 250.0);
    }

    #[test]
    fn courier_option_adds_flat_forty() {
        assert_eq!(delivery_surcharge(Some(COURIER_OPTION)), 40.0);
        assert_eq!(delivery_surcharge(Some("Самовывоз")), 0.0);
        assert_eq!(delivery_surcharge(None), 0.0);
    }

    #[test]
    fn total_of_two_teas_and_a_coffee_is_250() {
        // storage = ["1","1","2"], prices 100 and 50, no surcharge
        let products = vec![product("1", 100.0), product("2", 50.0)];
        let seq = tokens(&["1", "1", "2"]);
        let counts = quantities(&seq);
        assert_eq!(products[0].line_total(counts["1"]), 200.0);
        assert_eq!(products[1].line_total(counts["2"]), 50.0);
        let total = subtotal(&seq, &products) + delivery_surcharge(None);
        assert_eq!(format_amount(total), "250₽");
    }

    #[test]
    fn courier_on_base_250_displays_290() {
        let products = vec![product("1", 100.0), product("2", 50.0)];
        let seq = tokens(&["1", "1", "2"]);
        let total = subtotal(&seq, &products) + delivery_surcharge(Some(COURIER_OPTION));
        assert_eq!(format_amount(total), "290₽");
    }

    #[test]
    fn decrement_leaves_remaining_line_only() {
        let products = vec![product("1", 100.0), product("2", 50.0)];
        let service = CartService::new(InMemoryCartStore::with_tokens(tokens(&["1", "2"])));
        service.remove_one("1");
        assert_eq!(service.tokens(), tokens(&["2"]));
        assert_eq!(service.quantity_of("1"), 0);
        assert_eq!(
            format_amount(subtotal(&service.tokens(), &products)),
            "50₽"
        );
    }

    #[test]
    fn empty_cart_formats_zero_total() {
        let service = CartService::new(InMemoryCartStore::default());
        assert!(service.is_empty());
        assert_eq!(format_amount(subtotal(&service.tokens(), &[])), "0₽");
    }
}
