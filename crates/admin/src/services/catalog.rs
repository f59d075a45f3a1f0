//! Product form validation.
//!
//! The admin posts the same loose JSON shape the data file holds, so a form
//! is read through [`Product`]'s own deserializer and then checked.

use makeover_core::models::Extra;
use makeover_core::{MAX_PRICE, Price, PriceError, Product, ProductId, validate_discount};
use serde_json::Value;

use super::ValidationError;

/// Build a product from a submitted JSON object and validate it.
///
/// Any `id` in the body is ignored in favour of `id`.
///
/// # Errors
///
/// Returns [`ValidationError`] when the body does not describe a product, or
/// when the name is blank, the price is negative or above [`MAX_PRICE`],
/// the discount is outside
/// 0-100, the stock is negative or there is no image.
pub fn product_from_form(mut body: Extra, id: ProductId) -> Result<Product, ValidationError> {
    body.insert("id".to_owned(), Value::from(id.as_i64()));
    let product: Product = serde_json::from_value(Value::Object(body))
        .map_err(|e| ValidationError::new(format!("Invalid product: {e}")))?;
    validate(&product)?;
    Ok(product)
}

/// # Errors
///
/// See [`product_from_form`].
pub fn validate(product: &Product) -> Result<(), ValidationError> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::new("Product name is required"));
    }
    Price::parse(product.original_price).map_err(price_message)?;
    validate_discount(product.discount)
        .map_err(|_| ValidationError::new("Discount must be between 0 and 100"))?;
    if product.stock.is_some_and(|s| s < 0) {
        return Err(ValidationError::new("Stock cannot be negative"));
    }
    if product.image.is_empty() {
        return Err(ValidationError::new("At least one image is required"));
    }
    Ok(())
}

/// Form message for a rejected unit price.
pub(crate) fn price_message(err: PriceError) -> ValidationError {
    match err {
        PriceError::TooLarge => ValidationError::new(format!("Price cannot exceed {MAX_PRICE}")),
        _ => ValidationError::new("Price cannot be negative"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(value: Value) -> Extra {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_valid_form_normalizes_images() {
        let product = product_from_form(
            form(json!({
                "id": 44,
                "name": "Kajal",
                "category": "Eyes",
                "originalprice": "250",
                "discount": 5,
                "image": [{"url": "a.jpg"}, {"url": "b.jpg", "isMain": true}]
            })),
            ProductId::new(0),
        )
        .unwrap();
        assert_eq!(product.id, ProductId::new(0));
        assert_eq!(product.main_image(), Some("b.jpg"));
        assert_eq!(product.category, vec!["Eyes"]);
    }

    #[test]
    fn test_rejections() {
        let cases = [
            (json!({"name": " ", "originalprice": 1, "image": "a.jpg"}), "Product name is required"),
            (json!({"name": "A", "originalprice": -1, "image": "a.jpg"}), "Price cannot be negative"),
            (json!({"name": "A", "originalprice": "70000000000000000000000000000", "image": "a.jpg"}), "Price cannot exceed 1000000000"),
            (json!({"name": "A", "originalprice": 1, "discount": 120, "image": "a.jpg"}), "Discount must be between 0 and 100"),
            (json!({"name": "A", "originalprice": 1, "stock": -3, "image": "a.jpg"}), "Stock cannot be negative"),
            (json!({"name": "A", "originalprice": 1}), "At least one image is required"),
        ];
        for (body, message) in cases {
            let err = product_from_form(form(body), ProductId::new(1)).unwrap_err();
            assert_eq!(err.0, message);
        }

        let err = product_from_form(form(json!({"name": "A", "originalprice": "lots"})), ProductId::new(1))
            .unwrap_err();
        assert!(err.0.starts_with("Invalid product"));
    }
}
