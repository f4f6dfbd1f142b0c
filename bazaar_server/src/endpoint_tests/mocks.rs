use bazaar_engine::{
    db_types::{NewProduct, NewVendor, Product, ProductUpdate, Vendor},
    traits::{CatalogManagement, MarketplaceError},
};
use mockall::mock;

mock! {
    pub Catalog {}
    impl Clone for Catalog {
        fn clone(&self) -> Self;
    }
    impl CatalogManagement for Catalog {
        async fn insert_vendor(&self, vendor: NewVendor) -> Result<Vendor, MarketplaceError>;
        async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, MarketplaceError>;
        async fn insert_product(&self, vendor_id: i64, product: NewProduct) -> Result<Product, MarketplaceError>;
        async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, MarketplaceError>;
        async fn fetch_products_for_vendor<'a>(&self, vendor_id: i64, name_query: Option<&'a str>) -> Result<Vec<Product>, MarketplaceError>;
        async fn update_product(&self, vendor_id: i64, product_id: i64, update: ProductUpdate) -> Result<Product, MarketplaceError>;
        async fn set_product_stock(&self, vendor_id: i64, product_id: i64, stock: i64) -> Result<Product, MarketplaceError>;
        async fn toggle_product(&self, vendor_id: i64, product_id: i64) -> Result<Product, MarketplaceError>;
    }
}
