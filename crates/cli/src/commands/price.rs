use std::path::Path;

use mixmart_core::pricing::{resolve_price, PriceError};
use mixmart_core::{DeliveryMethod, ProductId};
use serde_json::json;

use crate::commands::{read_catalog, CommandResult};

pub fn run(product_id: &str, variant: Option<&str>, catalog_path: &Path) -> CommandResult {
    let catalog = match read_catalog(catalog_path) {
        Ok(catalog) => catalog,
        Err(failure) => return failure.into_result("price"),
    };

    let method: Option<DeliveryMethod> = match variant.map(str::parse).transpose() {
        Ok(method) => method,
        Err(error) => return CommandResult::failure("price", "bad_request", error.to_string(), 5),
    };

    let Some(product) = catalog.find(&ProductId(product_id.to_owned())) else {
        return CommandResult::failure(
            "price",
            "unknown_product",
            format!("product `{product_id}` is not in the catalog snapshot"),
            5,
        );
    };

    let variant_label =
        method.map(|method| method.key().to_owned()).unwrap_or_else(|| "normal".to_owned());

    match resolve_price(product, method) {
        Ok(price) => CommandResult::success_with_data(
            "price",
            format!("{} ({variant_label}): {price} per {}", product.id.0, product.unit),
            json!({
                "product_id": product.id.0,
                "delivery_method": variant_label,
                "price": price,
            }),
        ),
        // Unpriced products render as N/A on the storefront; this is not an
        // error condition.
        Err(PriceError::NoPriceAvailable(_)) => CommandResult::success_with_data(
            "price",
            format!("{} ({variant_label}): N/A (no price available)", product.id.0),
            json!({
                "product_id": product.id.0,
                "delivery_method": variant_label,
                "price": null,
            }),
        ),
    }
}
