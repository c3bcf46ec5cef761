pub mod auth_service;
pub mod image_pipeline;
pub mod product_service;
