pub mod account_handlers;
pub mod health_handlers;
pub mod product_handlers;
pub mod session;
pub mod upload_handlers;
