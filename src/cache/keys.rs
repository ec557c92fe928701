//! Cache key space.
//!
//! Three key shapes: the full snapshot, quantity-filtered pages and single
//! products. Every quantity page shares `QUANTITY_PREFIX` so the whole
//! family can be dropped in one prefix deletion.

/// Full SKU-ordered collection snapshot
pub const ALL_PRODUCTS: &str = "all_products";

/// Shared prefix of every quantity-filtered page
pub const QUANTITY_PREFIX: &str = "products_quantity_";

/// `products_quantity_{quantity}_{page}_{per_page}`
pub fn quantity_page(quantity: i64, page: i64, per_page: i64) -> String {
    format!("{}{}_{}_{}", QUANTITY_PREFIX, quantity, page, per_page)
}

/// `product_{sku}`
pub fn product(sku: &str) -> String {
    format!("product_{}", sku)
}
