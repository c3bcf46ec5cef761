//! Represents a product listed in the catalog.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog entry owned by a user.
#[derive(Serialize, Clone, FromRow, Debug, PartialEq)]
pub struct Product {
    /// Identifier assigned by the caller at creation time.
    pub id: Uuid,

    /// Owner of the product.
    pub user_id: Uuid,

    pub name: String,

    pub category: String,

    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flat_response_shape() {
        let product = Product {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: "Lamp".to_string(),
            category: "Home".to_string(),
            price: 19.5,
        };

        let json = serde_json::to_value(&product).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["category", "id", "name", "price", "user_id"]);
        assert_eq!(json["price"], 19.5);
    }
}
