use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Money, NewProduct, NewVendor, Product, ProductUpdate, Vendor},
    traits::{CatalogManagement, MarketplaceError},
};

/// Vendor registration and product management. Every vendor-scoped call is checked for ownership by the backend.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B: Clone> Clone for CatalogApi<B> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn register_vendor(&self, vendor: NewVendor) -> Result<Vendor, MarketplaceError> {
        if vendor.shop_name.trim().is_empty() {
            return Err(MarketplaceError::ValidationError("Shop name cannot be empty".into()));
        }
        let vendor = self.db.insert_vendor(vendor).await?;
        info!("🏪️ Vendor #{} ({}) registered", vendor.id, vendor.shop_name);
        Ok(vendor)
    }

    pub async fn fetch_vendor(&self, vendor_id: i64) -> Result<Vendor, MarketplaceError> {
        self.db.fetch_vendor(vendor_id).await?.ok_or_else(|| MarketplaceError::NotFound(format!("Vendor #{vendor_id}")))
    }

    pub async fn create_product(&self, vendor_id: i64, product: NewProduct) -> Result<Product, MarketplaceError> {
        validate_name(&product.name)?;
        validate_price(product.price)?;
        validate_stock(product.stock)?;
        let product = self.db.insert_product(vendor_id, product).await?;
        debug!("🏪️ Vendor #{vendor_id} created product #{} ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        vendor_id: i64,
        product_id: i64,
        update: ProductUpdate,
    ) -> Result<Product, MarketplaceError> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
        }
        if update.is_empty() {
            return self.vendor_product(vendor_id, product_id).await;
        }
        self.db.update_product(vendor_id, product_id, update).await
    }

    pub async fn update_stock(&self, vendor_id: i64, product_id: i64, stock: i64) -> Result<Product, MarketplaceError> {
        validate_stock(stock)?;
        self.db.set_product_stock(vendor_id, product_id, stock).await
    }

    pub async fn toggle_active(&self, vendor_id: i64, product_id: i64) -> Result<Product, MarketplaceError> {
        self.db.toggle_product(vendor_id, product_id).await
    }

    pub async fn products_for_vendor(
        &self,
        vendor_id: i64,
        name_query: Option<&str>,
    ) -> Result<Vec<Product>, MarketplaceError> {
        let query = name_query.map(str::trim).filter(|q| !q.is_empty());
        self.db.fetch_products_for_vendor(vendor_id, query).await
    }

    pub async fn fetch_product(&self, product_id: i64) -> Result<Product, MarketplaceError> {
        self.db
            .fetch_product(product_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Product #{product_id}")))
    }

    /// Fetches a product, checking that it belongs to `vendor_id`.
    pub async fn vendor_product(&self, vendor_id: i64, product_id: i64) -> Result<Product, MarketplaceError> {
        let product = self.fetch_product(product_id).await?;
        if product.vendor_id != vendor_id {
            return Err(MarketplaceError::Unauthorized(format!("Product #{product_id} belongs to another vendor")));
        }
        Ok(product)
    }

    //-------------------------------------- Storefront --------------------------------------
    // What customers see. Closed vendors and withdrawn products are `Unavailable` rather than hidden, so that a stale
    // link explains itself.

    /// A vendor that is open for business.
    pub async fn storefront_vendor(&self, vendor_id: i64) -> Result<Vendor, MarketplaceError> {
        let vendor = self.fetch_vendor(vendor_id).await?;
        if !vendor.active {
            return Err(MarketplaceError::Unavailable(format!("Vendor {}", vendor.shop_name)));
        }
        Ok(vendor)
    }

    /// The vendor's active products, optionally filtered by a case-insensitive substring of the name.
    pub async fn storefront_products(
        &self,
        vendor_id: i64,
        name_query: Option<&str>,
    ) -> Result<Vec<Product>, MarketplaceError> {
        self.storefront_vendor(vendor_id).await?;
        let products = self.products_for_vendor(vendor_id, name_query).await?;
        Ok(products.into_iter().filter(|p| p.active).collect())
    }

    /// An active product from an open vendor.
    pub async fn storefront_product(&self, product_id: i64) -> Result<Product, MarketplaceError> {
        let product = self.fetch_product(product_id).await?;
        if !product.active {
            return Err(MarketplaceError::Unavailable(format!("Product {}", product.name)));
        }
        self.storefront_vendor(product.vendor_id).await?;
        Ok(product)
    }
}

fn validate_name(name: &str) -> Result<(), MarketplaceError> {
    if name.trim().is_empty() {
        return Err(MarketplaceError::ValidationError("Product name cannot be empty".into()));
    }
    Ok(())
}

fn validate_price(price: Money) -> Result<(), MarketplaceError> {
    if !price.is_positive() {
        return Err(MarketplaceError::ValidationError(format!("Price must be positive, got {price}")));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> Result<(), MarketplaceError> {
    if stock < 0 {
        return Err(MarketplaceError::ValidationError(format!("Stock cannot be negative, got {stock}")));
    }
    Ok(())
}
