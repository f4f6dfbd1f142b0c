use crate::{
    db_types::{NewProduct, NewVendor, Product, ProductUpdate, Vendor},
    traits::MarketplaceError,
};

/// Vendor and product bookkeeping.
///
/// Every method that takes a `vendor_id` alongside a `product_id` must check that the product belongs to that vendor,
/// returning [`MarketplaceError::Unauthorized`] if it does not.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement: Clone {
    async fn insert_vendor(&self, vendor: NewVendor) -> Result<Vendor, MarketplaceError>;

    async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, MarketplaceError>;

    async fn insert_product(&self, vendor_id: i64, product: NewProduct) -> Result<Product, MarketplaceError>;

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, MarketplaceError>;

    /// Fetches the vendor's products, optionally filtered by a case-insensitive substring of the product name.
    async fn fetch_products_for_vendor(
        &self,
        vendor_id: i64,
        name_query: Option<&str>,
    ) -> Result<Vec<Product>, MarketplaceError>;

    async fn update_product(
        &self,
        vendor_id: i64,
        product_id: i64,
        update: ProductUpdate,
    ) -> Result<Product, MarketplaceError>;

    /// Overwrites the stock count. Used for restocking; the order flow never calls this.
    async fn set_product_stock(&self, vendor_id: i64, product_id: i64, stock: i64)
        -> Result<Product, MarketplaceError>;

    /// Flips the product's `active` flag and returns the updated product.
    async fn toggle_product(&self, vendor_id: i64, product_id: i64) -> Result<Product, MarketplaceError>;
}
