//! Shopping cart component.
//!
//! Renders one line per distinct id in the stored token sequence, keeps the
//! displayed total in sync with the quantity map and the selected delivery
//! option, and owns the clear-cart control.
//!
//! All mutations flow through the shared [`CartService`]; this component
//! only reacts to the resulting [`CartChange`] notifications, so additions
//! made by a catalog instance on the same page update every mounted cart.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sf_cart_core::{CartChange, CartService, distinct_ids};
use sf_types::Product;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::api;
use crate::dom::{self, CartElements};
use crate::storage::LocalCartStore;

pub const ROOT_SELECTOR: &str = "[data-js-cart]";

const CLEAR_BUTTON_SELECTOR: &str = "[data-js-clear-cart]";
const EMPTY_MESSAGE: &str = "Корзина пуста :(";

pub struct Cart {
    els: CartElements,
    cart: Rc<CartService<LocalCartStore>>,
    products: RefCell<Vec<Product>>,
    loaded: Cell<bool>,
}

impl Cart {
    /// Bind one cart instance to a root element, subscribe it to cart
    /// changes and start its asynchronous initialization.
    pub fn mount(root: Element, cart: Rc<CartService<LocalCartStore>>) -> Result<(), JsValue> {
        let this = Rc::new(Cart {
            els: CartElements::bind(root)?,
            cart: cart.clone(),
            products: RefCell::new(Vec::new()),
            loaded: Cell::new(false),
        });
        this.bind_events();

        {
            let this2 = this.clone();
            cart.subscribe(move |change| this2.apply_change(change));
        }

        let init = this.clone();
        wasm_bindgen_futures::spawn_local(async move {
            init.init().await;
        });
        Ok(())
    }

    /// Full (re)initialization: empty state, or fetch + render everything.
    async fn init(self: Rc<Self>) {
        if self.cart.is_empty() {
            self.render_empty();
            return;
        }

        // The product list is fetched here independently of any catalog
        // component on the page; there is no shared cache.
        match api::fetch_catalog(api::CATALOG_PATH).await {
            Ok(products) => {
                *self.products.borrow_mut() = products;
                self.loaded.set(true);
                self.render_lines();
                self.update_total();
                self.ensure_clear_button();
            }
            Err(e) => gloo_console::error!("failed to load cart products:", e),
        }
    }

    fn bind_events(self: &Rc<Self>) {
        // Delegated +/- clicks on the stable list container.
        {
            let list = self.els.list.clone();
            let this = self.clone();
            dom::on_event(&list, "click", move |event| {
                let Some(item) = dom::delegated_target(&event, "[data-js-item]") else {
                    return;
                };
                let id = item.get_attribute("data-js-item").unwrap_or_default();
                if dom::delegated_target(&event, "[data-js-increase]").is_some() {
                    this.cart.add(&id);
                } else if dom::delegated_target(&event, "[data-js-decrease]").is_some() {
                    this.cart.remove_one(&id);
                }
            });
        }

        // Delivery changes only move the total, never the line items.
        for option in &self.els.delivery_options {
            let this = self.clone();
            dom::on_event(option, "change", move |_| {
                this.update_total();
            });
        }
    }

    /// React to a cart mutation from any component on the page.
    fn apply_change(self: &Rc<Self>, change: &CartChange) {
        match change {
            CartChange::Cleared => self.render_empty(),
            CartChange::Added(id) | CartChange::Removed(id) => {
                if !self.loaded.get() {
                    // First item landed in a cart that rendered empty at
                    // mount; run the full fetch + render path.
                    let this = self.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        this.init().await;
                    });
                    return;
                }
                if self.line_element(id).is_some() {
                    self.update_line(id);
                } else {
                    self.render_lines();
                }
                self.update_total();
            }
        }
    }

    // ── Rendering ──

    fn render_empty(&self) {
        dom::set_inner_html(&self.els.list, &format!("<p>{EMPTY_MESSAGE}</p>"));
        dom::set_text(&self.els.total, &sf_cart_core::format_amount(0.0));
        self.remove_clear_button();
    }

    /// Rebuild every line item from the stored sequence, in first-occurrence
    /// order. Ids that no longer resolve render as unavailable lines rather
    /// than disappearing.
    fn render_lines(self: &Rc<Self>) {
        let tokens = self.cart.tokens();
        if tokens.is_empty() {
            self.render_empty();
            return;
        }

        dom::set_inner_html(&self.els.list, "");
        let products = self.products.borrow();
        for id in distinct_ids(&tokens) {
            let quantity = sf_cart_core::count_of(&tokens, &id);
            let item = dom::create_element("li");
            item.set_attribute("data-js-item", &id).unwrap();
            match Product::find_by_id(&products, &id) {
                Some(product) => {
                    dom::set_inner_html(
                        &item,
                        &format!(
                            r#"
          {name} x<span data-js-quantity>{quantity}</span> -
          <span data-js-price>{line_total}</span>₽
          <button class="button-price" data-js-decrease>-</button>
          <button class="button-price" data-js-increase>+</button>
        "#,
                            name = product.name,
                            line_total = product.line_total(quantity),
                        ),
                    );
                }
                None => {
                    // Discontinued or unknown id: keep it visible and
                    // removable instead of silently dropping it.
                    item.set_attribute("data-js-unavailable", "").unwrap();
                    dom::set_inner_html(
                        &item,
                        &format!(
                            r#"
          Товар недоступен x<span data-js-quantity>{quantity}</span>
          <button class="button-price" data-js-decrease>-</button>
        "#,
                        ),
                    );
                }
            }
            self.els.list.append_child(&item).unwrap();
        }
        self.ensure_clear_button();
    }

    /// Update one line in place after a quantity change; drop the line at
    /// zero and fall back to the empty state when the whole cart drains.
    fn update_line(&self, id: &str) {
        let Some(item) = self.line_element(id) else {
            return;
        };

        let quantity = self.cart.quantity_of(id);
        if quantity == 0 {
            item.remove();
        } else {
            if let Some(quantity_el) = dom::query_within(&item, "[data-js-quantity]") {
                dom::set_text(&quantity_el, &quantity.to_string());
            }
            if let Some(price_el) = dom::query_within(&item, "[data-js-price]") {
                let products = self.products.borrow();
                if let Some(product) = Product::find_by_id(&products, id) {
                    dom::set_text(&price_el, &product.line_total(quantity).to_string());
                }
            }
        }

        if self.cart.is_empty() {
            self.render_empty();
        }
    }

    fn update_total(&self) {
        let tokens = self.cart.tokens();
        if tokens.is_empty() {
            // No surcharge on an empty cart
            dom::set_text(&self.els.total, &sf_cart_core::format_amount(0.0));
            return;
        }
        let products = self.products.borrow();
        let total = sf_cart_core::subtotal(&tokens, &products)
            + sf_cart_core::delivery_surcharge(self.selected_delivery().as_deref());
        dom::set_text(&self.els.total, &sf_cart_core::format_amount(total));
    }

    /// Value of the checked delivery option, if any.
    fn selected_delivery(&self) -> Option<String> {
        self.els
            .delivery_options
            .iter()
            .find(|option| option.checked())
            .map(|option| option.value())
    }

    fn line_element(&self, id: &str) -> Option<Element> {
        dom::query_within(&self.els.list, &format!("[data-js-item=\"{id}\"]"))
    }

    // ── Clear control ──

    fn ensure_clear_button(self: &Rc<Self>) {
        if dom::query_within(&self.els.root, CLEAR_BUTTON_SELECTOR).is_some() {
            return;
        }
        let button = dom::create_element("button");
        button.set_attribute("data-js-clear-cart", "").unwrap();
        button.set_class_name("button button-accent");
        dom::set_text(&button, "Очистить корзину");

        let this = self.clone();
        dom::on_click(&button, move |_| {
            this.cart.clear();
        });

        self.els.list.after_with_node_1(&button).unwrap();
    }

    fn remove_clear_button(&self) {
        if let Some(button) = dom::query_within(&self.els.root, CLEAR_BUTTON_SELECTOR) {
            button.remove();
        }
    }
}
