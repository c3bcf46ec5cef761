//! Catalog operations over a `ProductRepository`.

use crate::{
    models::product::Product,
    repositories::product_repository::{CatalogResult, ProductRepository},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Thin orchestration layer: no rules beyond name filtering and
/// caller-assigned identifiers.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    /// All products whose name contains `name_filter`; a blank filter matches everything.
    pub async fn browse(&self, name_filter: Option<&str>) -> CatalogResult<Vec<Product>> {
        let filter = name_filter.map(str::trim).filter(|f| !f.is_empty());
        self.repo.browse(filter).await
    }

    /// Browse, then narrow to one owner's products when an owner is known.
    pub async fn browse_owned(
        &self,
        name_filter: Option<&str>,
        owner: Option<Uuid>,
    ) -> CatalogResult<Vec<Product>> {
        let products = self.browse(name_filter).await?;
        Ok(match owner {
            Some(owner) => products.into_iter().filter(|p| p.user_id == owner).collect(),
            None => products,
        })
    }

    pub async fn get(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        self.repo.get(id).await
    }

    pub async fn create(
        &self,
        id: Uuid,
        user_id: Uuid,
        name: &str,
        category: &str,
        price: f64,
    ) -> CatalogResult<()> {
        let product = Product {
            id,
            user_id,
            name: name.to_string(),
            category: category.to_string(),
            price,
        };
        self.repo.add(&product).await?;
        info!(product_id = %id, user_id = %user_id, "created product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory stand-in proving the service only talks to the trait.
    #[derive(Default)]
    struct MemoryRepo {
        rows: Mutex<Vec<Product>>,
    }

    #[async_trait]
    impl ProductRepository for MemoryRepo {
        async fn browse(&self, name: Option<&str>) -> CatalogResult<Vec<Product>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|p| name.is_none_or(|n| p.name.contains(n)))
                .cloned()
                .collect())
        }

        async fn get(&self, id: Uuid) -> CatalogResult<Option<Product>> {
            Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn add(&self, product: &Product) -> CatalogResult<()> {
            self.rows.lock().unwrap().push(product.clone());
            Ok(())
        }
    }

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryRepo::default()))
    }

    #[tokio::test]
    async fn create_uses_caller_supplied_id() {
        let service = service();
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        service.create(id, owner, "Lamp", "home", 19.5).await.unwrap();

        let product = service.get(id).await.unwrap().unwrap();
        assert_eq!(product.user_id, owner);
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price, 19.5);
    }

    #[tokio::test]
    async fn blank_filter_matches_everything() {
        let service = service();
        service.create(Uuid::new_v4(), Uuid::new_v4(), "Lamp", "home", 1.0).await.unwrap();
        service.create(Uuid::new_v4(), Uuid::new_v4(), "Desk", "home", 2.0).await.unwrap();

        assert_eq!(service.browse(Some("   ")).await.unwrap().len(), 2);
        assert_eq!(service.browse(Some("Desk")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn browse_owned_keeps_only_owner_products() {
        let service = service();
        let alice = Uuid::new_v4();
        service.create(Uuid::new_v4(), alice, "Lamp", "home", 1.0).await.unwrap();
        service.create(Uuid::new_v4(), Uuid::new_v4(), "Lantern", "home", 2.0).await.unwrap();

        let mine = service.browse_owned(Some("La"), Some(alice)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, alice);

        let everyone = service.browse_owned(Some("La"), None).await.unwrap();
        assert_eq!(everyone.len(), 2);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        assert!(service().get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
