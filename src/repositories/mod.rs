//! Persistence traits and their SQLite implementations.

pub mod product_repository;
