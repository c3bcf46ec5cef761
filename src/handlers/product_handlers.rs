//! HTTP handlers for browsing and creating products.

use crate::{
    errors::AppError,
    handlers::session::{CurrentUser, MaybeUser},
    models::product::Product,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query params accepted by the browse endpoints.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub name: Option<String>,
}

/// Body of `POST /products`; the owner is supplied by the caller.
#[derive(Debug, Deserialize)]
pub struct CreateProductReq {
    pub user_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
}

/// Body of `POST /products/create`; the owner is the session user.
#[derive(Debug, Deserialize)]
pub struct NewProductReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    pub id: Uuid,
}

/// GET `/products?name=`
pub async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<BrowseQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.products.browse(q.name.as_deref()).await?;
    Ok(Json(products))
}

/// GET `/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    state
        .products
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("product `{}` not found", id)))
}

/// POST `/products`: the server mints the product id.
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductReq>,
) -> Result<Json<CreatedProduct>, AppError> {
    let id = Uuid::new_v4();
    state
        .products
        .create(id, req.user_id, &req.name, &req.category, req.price)
        .await?;
    Ok(Json(CreatedProduct { id }))
}

/// GET `/products/browse?name=`: logged-in callers only see their own products.
pub async fn browse_products(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(q): Query<BrowseQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.products.browse_owned(q.name.as_deref(), user).await?;
    Ok(Json(products))
}

/// POST `/products/create`: requires a session; redirects back to browse.
pub async fn create_owned_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<NewProductReq>,
) -> Result<Redirect, AppError> {
    state
        .products
        .create(Uuid::new_v4(), user.user_id, &req.name, &req.category, req.price)
        .await?;
    Ok(Redirect::to("/products/browse"))
}
