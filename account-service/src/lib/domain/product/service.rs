use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Page;
use crate::domain::product::models::Product;
use crate::domain::product::ports::ProductRepository;
use crate::domain::product::ports::ProductServicePort;

/// Read-through catalog service.
pub struct ProductService<PR>
where
    PR: ProductRepository,
{
    repository: Arc<PR>,
}

impl<PR> ProductService<PR>
where
    PR: ProductRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<PR> ProductServicePort for ProductService<PR>
where
    PR: ProductRepository,
{
    async fn get_product(&self, name: &str) -> Result<Product, ProductError> {
        if name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }

        self.repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| ProductError::NotFound(name.to_string()))
    }

    async fn list_products(&self, page: Page) -> Result<Vec<Product>, ProductError> {
        self.repository.list(page.limit(), page.offset()).await
    }
}
