use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::PgPool;
use sqlx::Row;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;

fn create_error(e: sqlx::Error, name: &str) -> ProductError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return ProductError::NameAlreadyExists(name.to_string());
        }
    }
    ProductError::DatabaseError(e.to_string())
}

fn database_error(e: sqlx::Error) -> ProductError {
    ProductError::DatabaseError(e.to_string())
}

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn product_from_row(row: &PgRow) -> Result<Product, ProductError> {
        Ok(Product {
            id: ProductId(row.try_get("id").map_err(database_error)?),
            name: row.try_get("name").map_err(database_error)?,
            description: row.try_get("description").map_err(database_error)?,
            price: row.try_get("price").map_err(database_error)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| create_error(e, &product.name))?;

        Ok(product)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, ProductError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM products
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::product_from_row).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM products
            ORDER BY created_at, name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(Self::product_from_row).collect()
    }
}

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn product_from_row(row: &SqliteRow) -> Result<Product, ProductError> {
        let id: String = row.try_get("id").map_err(database_error)?;

        Ok(Product {
            id: Uuid::parse_str(&id)
                .map(ProductId)
                .map_err(|e| ProductError::DatabaseError(format!("stored product id: {}", e)))?,
            name: row.try_get("name").map_err(database_error)?,
            description: row.try_get("description").map_err(database_error)?,
            price: row.try_get("price").map_err(database_error)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| create_error(e, &product.name))?;

        Ok(product)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, ProductError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM products
            WHERE LOWER(name) = LOWER(?)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::product_from_row).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM products
            ORDER BY created_at, name
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter().map(Self::product_from_row).collect()
    }
}
