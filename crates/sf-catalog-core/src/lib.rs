//! Catalog view state: the full product list plus the currently displayed
//! subset, with search, category filter and price sort over it.
//!
//! Search and filter each re-derive the subset from the FULL list, so they
//! override each other rather than composing. Sort reorders the current
//! subset in place without touching the full list.

use sf_types::Product;

/// Category value that passes every product through the filter.
pub const ALL_CATEGORIES: &str = "all";

/// Price sort direction, parsed from the sort control's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Control values are `"asc"` / `"desc"`; anything else sorts descending,
    /// matching the two-armed control.
    pub fn from_value(value: &str) -> Self {
        if value == "asc" {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }
}

/// Full list + displayed subset for one catalog component instance.
#[derive(Debug, Default, Clone)]
pub struct CatalogView {
    products: Vec<Product>,
    filtered: Vec<Product>,
}

impl CatalogView {
    /// Install the fetched product list; the displayed subset starts as a
    /// copy of the whole list.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.filtered = products.clone();
        self.products = products;
    }

    /// The currently displayed subset.
    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        Product::find_by_id(&self.products, id)
    }

    /// Case-insensitive substring match on name, over the full list.
    pub fn search(&mut self, query: &str) {
        let query = query.to_lowercase();
        self.filtered = self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
    }

    /// Exact category match over the full list; [`ALL_CATEGORIES`] passes
    /// everything through.
    pub fn filter(&mut self, category: &str) {
        self.filtered = self
            .products
            .iter()
            .filter(|p| category == ALL_CATEGORIES || p.category == category)
            .cloned()
            .collect();
    }

    /// Sort the displayed subset in place by price.
    pub fn sort(&mut self, direction: SortDirection) {
        self.filtered.sort_by(|a, b| match direction {
            SortDirection::Ascending => a.price.total_cmp(&b.price),
            SortDirection::Descending => b.price.total_cmp(&a.price),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogView {
        let mut view = CatalogView::default();
        view.set_products(vec![
            product("1", "Чай чёрный", 100.0, "drinks"),
            product("2", "Кофе", 250.0, "drinks"),
            product("3", "Печенье", 50.0, "snacks"),
            product("4", "Чайник", 900.0, "goods"),
        ]);
        view
    }

    fn product(id: &str, name: &str, price: f64, category: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
            category: category.to_string(),
            image: String::new(),
        }
    }

    fn ids(view: &CatalogView) -> Vec<&str> {
        view.filtered().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut view = catalog();
        view.search("чай");
        assert_eq!(ids(&view), vec!["1", "4"]);
        view.search("ЧАЙ");
        assert_eq!(ids(&view), vec!["1", "4"]);
    }

    #[test]
    fn zero_match_search_yields_empty_list() {
        let mut view = catalog();
        view.search("борщ");
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn filter_matches_category_exactly() {
        let mut view = catalog();
        view.filter("drinks");
        assert_eq!(ids(&view), vec!["1", "2"]);
    }

    #[test]
    fn all_sentinel_passes_everything() {
        let mut view = catalog();
        view.filter("drinks");
        view.filter(ALL_CATEGORIES);
        assert_eq!(ids(&view), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn search_and_filter_override_each_other() {
        let mut view = catalog();
        view.filter("drinks");
        view.search("печ");
        // search re-derives from the full list, dropping the filter
        assert_eq!(ids(&view), vec!["3"]);
        view.filter("goods");
        assert_eq!(ids(&view), vec!["4"]);
    }

    #[test]
    fn sort_reorders_the_current_subset_only() {
        let mut view = catalog();
        view.filter("drinks");
        view.sort(SortDirection::Descending);
        assert_eq!(ids(&view), vec!["2", "1"]);
        view.sort(SortDirection::from_value("asc"));
        assert_eq!(ids(&view), vec!["1", "2"]);
    }
}
