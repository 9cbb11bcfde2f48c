use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::product::{DeliveryMethod, Product, ProductId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("no price available for product `{}`", (.0).0)]
    NoPriceAvailable(ProductId),
}

/// Resolve the unit price for a product under a requested delivery method.
///
/// Fallback order: the requested variant's price if populated, then the
/// `normal` base price, then the cheapest populated variant. A product with
/// no price points at all is unpriced; callers display "N/A" and keep it out
/// of price-based ranking.
pub fn resolve_price(
    product: &Product,
    variant: Option<DeliveryMethod>,
) -> Result<Decimal, PriceError> {
    if let Some(method) = variant {
        if let Some(price) = product.prices.get(method) {
            return Ok(price);
        }
    }

    if let Some(price) = product.prices.get(DeliveryMethod::Normal) {
        return Ok(price);
    }

    product.prices.best().ok_or_else(|| PriceError::NoPriceAvailable(product.id.clone()))
}

/// Cheapest offered price across all variants; the single representative
/// price used on recommendation cards and for ranking.
pub fn best_price(product: &Product) -> Option<Decimal> {
    product.prices.best()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{
        DeliveryMethod, Grade, Product, ProductId, VariantPrices,
    };

    use super::{best_price, resolve_price, PriceError};

    fn product(prices: VariantPrices) -> Product {
        Product {
            id: ProductId("rm-n20".to_owned()),
            name: "Ready-mix N20".to_owned(),
            grade: Grade::new("N20"),
            category: "ready_mix".to_owned(),
            unit: "m3".to_owned(),
            stock_quantity: 40,
            prices,
            images: Vec::new(),
        }
    }

    #[test]
    fn requested_variant_price_wins_when_populated() {
        let product = product(VariantPrices {
            normal: Some(Decimal::new(20_000, 2)),
            pump: Some(Decimal::new(23_000, 2)),
            ..VariantPrices::default()
        });

        let price = resolve_price(&product, Some(DeliveryMethod::Pump)).expect("pump is priced");
        assert_eq!(price, Decimal::new(23_000, 2));
    }

    #[test]
    fn missing_variant_falls_back_to_normal() {
        let product = product(VariantPrices {
            normal: Some(Decimal::new(20_000, 2)),
            ..VariantPrices::default()
        });

        let price =
            resolve_price(&product, Some(DeliveryMethod::Tremie3)).expect("normal fallback");
        assert_eq!(price, Decimal::new(20_000, 2));
    }

    #[test]
    fn missing_normal_falls_back_to_cheapest_variant() {
        // Only pump and tremie_2 are priced; no variant requested.
        let product = product(VariantPrices {
            pump: Some(Decimal::new(24_000, 2)),
            tremie_2: Some(Decimal::new(22_500, 2)),
            ..VariantPrices::default()
        });

        let unrequested = resolve_price(&product, None).expect("cheapest variant fallback");
        assert_eq!(unrequested, Decimal::new(22_500, 2));
        assert_eq!(best_price(&product), Some(Decimal::new(22_500, 2)));

        let exact =
            resolve_price(&product, Some(DeliveryMethod::Tremie2)).expect("tremie_2 is priced");
        assert_eq!(exact, Decimal::new(22_500, 2));
    }

    #[test]
    fn fully_unpriced_product_signals_no_price_available() {
        let product = product(VariantPrices::default());

        let error = resolve_price(&product, None).expect_err("no price points");
        assert_eq!(error, PriceError::NoPriceAvailable(product.id.clone()));
        assert_eq!(best_price(&product), None);
    }
}
