//! Defines routes for the catalog, uploads and accounts.
//!
//! ## Structure
//! - **Health**
//!   - `GET  /healthz`, `GET /readyz`
//!
//! - **Products**
//!   - `GET  /products`            list, `?name=` substring filter
//!   - `POST /products`            create for an explicit `user_id`
//!   - `GET  /products/browse`     list, narrowed to the session user when logged in
//!   - `POST /products/create`     create for the session user (login required)
//!   - `POST /products/upload`     multipart image upload + thumbnails
//!   - `GET  /products/{id}`       fetch one
//!
//! - **Accounts**
//!   - `POST /account/register`, `POST /account/login`, `POST /account/logout`
//!
//! - **Images**
//!   - `GET  /images/{file}`       originals and `min_` thumbnails, served from disk

use crate::{
    handlers::{
        account_handlers::{login, logout, register},
        health_handlers::{healthz, readyz},
        product_handlers::{
            browse_products, create_owned_product, create_product, get_product, list_products,
        },
        upload_handlers::upload_images,
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::path::Path;
use tower_http::services::ServeDir;

/// Build the router. `files_dir` is served under `/images`; upload requests
/// may carry up to `max_upload_bytes` of body.
pub fn routes(files_dir: &Path, max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/products", get(list_products).post(create_product))
        .route("/products/browse", get(browse_products))
        .route("/products/create", post(create_owned_product))
        .route(
            "/products/upload",
            post(upload_images).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/products/{id}", get(get_product))
        .route("/account/register", post(register))
        .route("/account/login", post(login))
        .route("/account/logout", post(logout))
        .nest_service("/images", ServeDir::new(files_dir))
}
