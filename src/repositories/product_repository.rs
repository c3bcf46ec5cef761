//! Product persistence behind a trait so services never touch SQL directly.

use crate::models::product::Product;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product `{0}` already exists")]
    AlreadyExists(Uuid),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products whose name contains `name` (case-insensitive), ordered by name.
    async fn browse(&self, name: Option<&str>) -> CatalogResult<Vec<Product>>;

    async fn get(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    async fn add(&self, product: &Product) -> CatalogResult<()>;
}

#[derive(Clone)]
pub struct SqliteProductRepository {
    db: Arc<SqlitePool>,
}

impl SqliteProductRepository {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn browse(&self, name: Option<&str>) -> CatalogResult<Vec<Product>> {
        let products = match name {
            Some(name) => {
                sqlx::query_as::<_, Product>(
                    "SELECT id, user_id, name, category, price
                     FROM products
                     WHERE instr(lower(name), lower(?)) > 0
                     ORDER BY name, id",
                )
                .bind(name)
                .fetch_all(&*self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    "SELECT id, user_id, name, category, price
                     FROM products
                     ORDER BY name, id",
                )
                .fetch_all(&*self.db)
                .await?
            }
        };
        Ok(products)
    }

    async fn get(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, user_id, name, category, price FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(product)
    }

    async fn add(&self, product: &Product) -> CatalogResult<()> {
        match sqlx::query(
            "INSERT INTO products (id, user_id, name, category, price)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product.id)
        .bind(product.user_id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price)
        .execute(&*self.db)
        .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(CatalogError::AlreadyExists(product.id)),
            Err(err) => Err(CatalogError::Sqlx(err)),
        }
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
