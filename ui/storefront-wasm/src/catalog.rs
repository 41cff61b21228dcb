//! Product catalog component.
//!
//! Renders the product list with search, category filter and price sort,
//! and pushes "add to cart" through the shared cart service. Add-button
//! clicks are handled by one delegated listener on the stable catalog
//! container, so re-renders never re-bind handlers.

use std::cell::RefCell;
use std::rc::Rc;

use sf_cart_core::CartService;
use sf_catalog_core::{CatalogView, SortDirection};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::api;
use crate::dom::{self, ShopElements};
use crate::storage::LocalCartStore;

pub const ROOT_SELECTOR: &str = "[data-js-shop]";

const ADD_BUTTON_SELECTOR: &str = "[data-js-catalog-button]";

pub struct Catalog {
    els: ShopElements,
    view: RefCell<CatalogView>,
    cart: Rc<CartService<LocalCartStore>>,
}

impl Catalog {
    /// Bind one catalog instance to a root element and start its
    /// asynchronous load.
    pub fn mount(root: Element, cart: Rc<CartService<LocalCartStore>>) -> Result<(), JsValue> {
        let this = Rc::new(Catalog {
            els: ShopElements::bind(root)?,
            view: RefCell::new(CatalogView::default()),
            cart,
        });
        this.bind_events();

        let init = this.clone();
        wasm_bindgen_futures::spawn_local(async move {
            init.load().await;
        });
        Ok(())
    }

    /// Fetch the product list once. On failure the catalog stays empty.
    async fn load(&self) {
        match api::fetch_catalog(api::CATALOG_PATH).await {
            Ok(products) => {
                self.view.borrow_mut().set_products(products);
                self.render();
            }
            Err(e) => gloo_console::error!("failed to load catalog:", e),
        }
    }

    fn bind_events(self: &Rc<Self>) {
        {
            let search = self.els.search.clone();
            let this = self.clone();
            dom::on_event(&search, "input", move |_| {
                let query = dom::get_input_value(&this.els.search);
                this.view.borrow_mut().search(&query);
                this.render();
            });
        }
        {
            let filter = self.els.filter.clone();
            let this = self.clone();
            dom::on_event(&filter, "change", move |_| {
                let category = dom::get_select_value(&this.els.filter);
                this.view.borrow_mut().filter(&category);
                this.render();
            });
        }
        {
            let sort = self.els.sort.clone();
            let this = self.clone();
            dom::on_event(&sort, "change", move |_| {
                let direction = SortDirection::from_value(&dom::get_select_value(&this.els.sort));
                this.view.borrow_mut().sort(direction);
                this.render();
            });
        }
        {
            // Delegated: one listener on the container outlives every render.
            let catalog = self.els.catalog.clone();
            let this = self.clone();
            dom::on_event(&catalog, "click", move |event| {
                if let Some(button) = dom::delegated_target(&event, ADD_BUTTON_SELECTOR) {
                    let id = button.get_attribute("data-id").unwrap_or_default();
                    this.on_add_to_cart(&id);
                }
            });
        }
    }

    /// Clear the container and render one entry per displayed product.
    fn render(&self) {
        dom::set_inner_html(&self.els.catalog, "");
        for product in self.view.borrow().filtered() {
            let item = dom::create_element("li");
            item.set_class_name("catalog__item");
            dom::set_inner_html(
                &item,
                &format!(
                    r#"
          <figure class="catalog__item-inner">
            <img src="{image}" alt="{name}" class="catalog__item-img">
            <figcaption class="catalog__item-title h6">{name}</figcaption>
          </figure>
          <p class="catalog__item-price">{price} руб.</p>
          <button class="catalog__item-button button button-accent" data-id="{id}" data-js-catalog-button>Добавить в корзину</button>
        "#,
                    image = product.image,
                    name = product.name,
                    price = product.price,
                    id = product.id,
                ),
            );
            self.els.catalog.append_child(&item).unwrap();
        }
    }

    /// Append the id token and confirm with the product name and its new
    /// quantity.
    fn on_add_to_cart(&self, id: &str) {
        let quantity = self.cart.add(id);
        if let Some(product) = self.view.borrow().find(id) {
            let _ = dom::window().alert_with_message(&format!(
                "Добавлено: {}\nКоличество: {}",
                product.name, quantity
            ));
        }
    }
}
