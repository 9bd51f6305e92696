use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Page;
use crate::domain::product::models::Product;

/// Port for catalog reads.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// Retrieve a product by name, ignoring case.
    ///
    /// # Errors
    /// * `EmptyName` - Name is blank
    /// * `NotFound` - No product with this name
    /// * `DatabaseError` - Database operation failed
    async fn get_product(&self, name: &str) -> Result<Product, ProductError>;

    /// Retrieve one page of products.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_products(&self, page: Page) -> Result<Vec<Product>, ProductError>;
}

/// Persistence operations for the catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// # Errors
    /// * `NameAlreadyExists` - Name is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, product: Product) -> Result<Product, ProductError>;

    /// Case-insensitive lookup by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, ProductError>;

    /// Products ordered by creation time, then name.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, ProductError>;
}
