//! Product-card rendering appended to caller-visible responses.

use serde_json::Value;

fn field_or<'a>(product: &'a Value, key: &str, fallback: &'a str) -> &'a str {
    product[key].as_str().unwrap_or(fallback)
}

/// Render retrieved products as an HTML fragment for the chat widget.
/// Mirrors the card layout the storefront styles against.
pub fn format_product_info(products: &[Value]) -> String {
    if products.is_empty() {
        return "No relevant product information found.".to_string();
    }

    let mut html = String::from("<div class=\"products-container\">");

    for product in products {
        let image = product["thumbnail"]
            .as_str()
            .or_else(|| product["images"][0].as_str())
            .unwrap_or("");
        let title = field_or(product, "title", "Name not specified");
        let description = field_or(product, "description", "Description not specified");
        let price = match &product["price"] {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => "Price not specified".to_string(),
        };
        let id = super::product_id(product).unwrap_or_default();

        html.push_str(&format!(
            r#"
      <div class="product-card">
        <div class="product-image">
          <img src="{image}" alt="{title}" loading="lazy">
        </div>
        <div class="product-info">
          <h3 class="product-title">{title}</h3>
          <p class="product-description">{description}</p>
          <div class="product-price-container">
            <span class="product-price">${price}</span>
          </div>
          <a href="/product/{id}" class="product-detail-button" target="_blank">
            More Details
          </a>
        </div>
      </div>
    "#
        ));
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_set_renders_placeholder() {
        assert_eq!(
            format_product_info(&[]),
            "No relevant product information found."
        );
    }

    #[test]
    fn test_card_contains_core_fields() {
        let products = vec![json!({
            "id": 5,
            "title": "MacBook Pro",
            "description": "14 inch laptop",
            "price": 1999,
            "thumbnail": "https://cdn.example/mbp.jpg"
        })];

        let html = format_product_info(&products);
        assert!(html.contains("products-container"));
        assert!(html.contains("MacBook Pro"));
        assert!(html.contains("14 inch laptop"));
        assert!(html.contains("$1999"));
        assert!(html.contains("/product/5"));
        assert!(html.contains("https://cdn.example/mbp.jpg"));
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let products = vec![json!({"id": "9"})];
        let html = format_product_info(&products);

        assert!(html.contains("Name not specified"));
        assert!(html.contains("Description not specified"));
        assert!(html.contains("Price not specified"));
    }

    #[test]
    fn test_falls_back_to_first_image() {
        let products = vec![json!({
            "id": 1,
            "title": "Widget",
            "images": ["https://cdn.example/widget.png"]
        })];

        let html = format_product_info(&products);
        assert!(html.contains("https://cdn.example/widget.png"));
    }
}
