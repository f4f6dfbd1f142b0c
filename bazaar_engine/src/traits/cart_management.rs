use crate::{
    db_types::CartLine,
    traits::{data_objects::CartContents, MarketplaceError},
};

/// The single-vendor shopping cart.
///
/// Each mutating method runs as one atomic unit in the backend: product validation, the vendor-affinity check and
/// the item changes either all commit or none do. A customer has at most one cart, and every item in it belongs to the
/// cart's vendor.
#[allow(async_fn_in_trait)]
pub trait CartManagement: Clone {
    async fn fetch_cart(&self, customer_id: i64) -> Result<Option<CartContents>, MarketplaceError>;

    /// Adds one or more lines to the customer's cart, creating the cart if necessary.
    ///
    /// All the products must exist, be active, belong to a single vendor and that vendor must match the current
    /// cart's vendor (if the cart has items). Quantities for products that are already in the cart are summed, and the
    /// sum is checked against the product's current stock. Validation of every line happens before any row is written.
    async fn add_to_cart(&self, customer_id: i64, lines: &[CartLine]) -> Result<CartContents, MarketplaceError>;

    /// Sets the quantity for an item in the customer's cart. The item must belong to the customer.
    async fn update_cart_item(
        &self,
        customer_id: i64,
        item_id: i64,
        quantity: i64,
    ) -> Result<CartContents, MarketplaceError>;

    /// Removes an item from the customer's cart. If it was the last item, the cart is deleted and `None` is returned.
    async fn remove_cart_item(&self, customer_id: i64, item_id: i64) -> Result<Option<CartContents>, MarketplaceError>;

    /// Deletes the customer's cart. Returns `false` if there was no cart to delete.
    async fn clear_cart(&self, customer_id: i64) -> Result<bool, MarketplaceError>;

    /// Discards the current cart (if any) and opens an empty cart for `vendor_id`.
    async fn switch_cart_vendor(&self, customer_id: i64, vendor_id: i64) -> Result<CartContents, MarketplaceError>;
}
