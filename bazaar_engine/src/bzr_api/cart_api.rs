use std::fmt::Debug;

use log::*;

use crate::{
    bzr_api::order_objects::CartSummary,
    db_types::CartLine,
    fees::FeeSchedule,
    traits::{CartManagement, MarketplaceError},
};

/// The customer's single-vendor shopping cart.
///
/// All mutations return the cart as it stands afterwards, priced with the fee schedule.
pub struct CartApi<B> {
    db: B,
    fees: FeeSchedule,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<B> CartApi<B> {
    pub fn new(db: B, fees: FeeSchedule) -> Self {
        Self { db, fees }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub async fn get_cart(&self, customer_id: i64) -> Result<Option<CartSummary>, MarketplaceError> {
        let contents = self.db.fetch_cart(customer_id).await?;
        contents.map(|c| CartSummary::from_contents(c, &self.fees)).transpose()
    }

    /// Adds `quantity` units of a product to the customer's cart.
    ///
    /// Fails with [`MarketplaceError::VendorConflict`] if the cart holds items from another vendor. The caller should
    /// then offer to [switch vendor](Self::switch_vendor) instead of treating it as a bad request.
    pub async fn add_item(&self, customer_id: i64, product_id: i64, quantity: i64) -> Result<CartSummary, MarketplaceError> {
        self.add_multiple(customer_id, &[CartLine::new(product_id, quantity)]).await
    }

    /// Adds several products at once. Either every line is added or none is.
    pub async fn add_multiple(&self, customer_id: i64, lines: &[CartLine]) -> Result<CartSummary, MarketplaceError> {
        trace!("🛒️ Customer #{customer_id} is adding {} line(s) to their cart", lines.len());
        let contents = self.db.add_to_cart(customer_id, lines).await.map_err(|e| {
            debug!("🛒️ Could not add items to the cart for customer #{customer_id}. {e}");
            e
        })?;
        debug!("🛒️ Cart #{} for customer #{customer_id} now has {} items", contents.cart.id, contents.item_count());
        CartSummary::from_contents(contents, &self.fees)
    }

    pub async fn update_item(
        &self,
        customer_id: i64,
        item_id: i64,
        quantity: i64,
    ) -> Result<CartSummary, MarketplaceError> {
        let contents = self.db.update_cart_item(customer_id, item_id, quantity).await?;
        trace!("🛒️ Cart item #{item_id} quantity set to {quantity}");
        CartSummary::from_contents(contents, &self.fees)
    }

    /// Removes an item. Returns `None` if that emptied (and therefore deleted) the cart.
    pub async fn remove_item(&self, customer_id: i64, item_id: i64) -> Result<Option<CartSummary>, MarketplaceError> {
        let contents = self.db.remove_cart_item(customer_id, item_id).await?;
        if contents.is_none() {
            debug!("🛒️ Last item removed. The cart for customer #{customer_id} has been deleted");
        }
        contents.map(|c| CartSummary::from_contents(c, &self.fees)).transpose()
    }

    /// Deletes the cart. Clearing a cart that doesn't exist is not an error.
    pub async fn clear(&self, customer_id: i64) -> Result<(), MarketplaceError> {
        if self.db.clear_cart(customer_id).await? {
            debug!("🛒️ Cart for customer #{customer_id} cleared");
        }
        Ok(())
    }

    /// Throws away the current cart, whatever is in it, and opens an empty one for `vendor_id`.
    pub async fn switch_vendor(&self, customer_id: i64, vendor_id: i64) -> Result<CartSummary, MarketplaceError> {
        let contents = self.db.switch_cart_vendor(customer_id, vendor_id).await?;
        info!("🛒️ Customer #{customer_id} switched their cart to vendor #{vendor_id}");
        CartSummary::from_contents(contents, &self.fees)
    }
}
