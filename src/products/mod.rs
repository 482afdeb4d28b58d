pub mod markers;
pub mod render;

pub use markers::ResponseMarkers;
pub use render::format_product_info;

use serde_json::Value;

/// Extract a product's identifier as a string for marker matching.
/// Ids come back from the vector store as either strings or numbers.
pub fn product_id(product: &Value) -> Option<String> {
    match &product["id"] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_id_handles_numbers_and_strings() {
        assert_eq!(product_id(&json!({"id": 5})), Some("5".to_string()));
        assert_eq!(product_id(&json!({"id": "5"})), Some("5".to_string()));
        assert_eq!(product_id(&json!({"title": "no id"})), None);
    }
}
