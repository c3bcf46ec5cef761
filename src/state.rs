//! Shared router state, built once at startup and cloned into each handler.

use crate::{
    repositories::product_repository::SqliteProductRepository,
    services::{
        auth_service::AuthService, image_pipeline::ImagePipeline, product_service::ProductService,
    },
};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    /// Shared SQLite connection pool, also probed by `/readyz`.
    pub db: Arc<SqlitePool>,
    pub products: ProductService,
    pub uploads: ImagePipeline,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(db: Arc<SqlitePool>, files_dir: impl Into<PathBuf>, session_ttl_hours: i64) -> Self {
        let repo = Arc::new(SqliteProductRepository::new(db.clone()));
        Self {
            products: ProductService::new(repo),
            uploads: ImagePipeline::new(files_dir),
            auth: AuthService::new(db.clone(), session_ttl_hours),
            db,
        }
    }
}
