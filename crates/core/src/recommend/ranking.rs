//! Ranking and dedup helpers shared by both engines.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};

use super::types::HistoryRecommendation;

/// Absolute price distance without relying on signed intermediate values.
pub(crate) fn price_distance(a: Decimal, b: Decimal) -> Decimal {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Order candidates by ascending price distance from the reference price,
/// preferring in-stock items on ties, with the product id as the final key so
/// the output is total and deterministic.
pub(crate) fn sort_by_price_distance(candidates: &mut [(Product, Decimal)], reference: Decimal) {
    candidates.sort_by(|(left, left_price), (right, right_price)| {
        price_distance(*left_price, reference)
            .cmp(&price_distance(*right_price, reference))
            .then_with(|| right.stock_quantity.cmp(&left.stock_quantity))
            .then_with(|| left.id.cmp(&right.id))
    });
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Collapse duplicate products across passes, keeping the highest-confidence
/// record per product, sorted by confidence descending then id.
pub(crate) fn dedup_keep_highest(records: Vec<HistoryRecommendation>) -> Vec<HistoryRecommendation> {
    let mut best: HashMap<ProductId, HistoryRecommendation> = HashMap::new();

    for record in records {
        match best.get(&record.product.id) {
            Some(existing) if existing.confidence >= record.confidence => {}
            _ => {
                best.insert(record.product.id.clone(), record);
            }
        }
    }

    let mut deduped: Vec<HistoryRecommendation> = best.into_values().collect();
    deduped.sort_by(|left, right| {
        right
            .confidence
            .partial_cmp(&left.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| left.product.id.cmp(&right.product.id))
    });
    deduped
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{Grade, Product, ProductId, VariantPrices};
    use crate::recommend::types::{HistoryKind, HistoryRecommendation};

    use super::{clamp_unit, dedup_keep_highest, price_distance, sort_by_price_distance};

    fn product(id: &str, stock: u32) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            name: id.to_owned(),
            grade: Grade::new("N20"),
            category: "ready_mix".to_owned(),
            unit: "m3".to_owned(),
            stock_quantity: stock,
            prices: VariantPrices::default(),
            images: Vec::new(),
        }
    }

    fn record(id: &str, kind: HistoryKind, confidence: f64) -> HistoryRecommendation {
        HistoryRecommendation {
            product: product(id, 0),
            kind,
            reason: String::new(),
            confidence,
        }
    }

    #[test]
    fn price_distance_is_symmetric() {
        let a = Decimal::new(10_000, 2);
        let b = Decimal::new(12_500, 2);
        assert_eq!(price_distance(a, b), price_distance(b, a));
        assert_eq!(price_distance(a, a), Decimal::ZERO);
    }

    #[test]
    fn closest_price_ranks_first_and_stock_breaks_ties() {
        let reference = Decimal::new(10_000, 2);
        let mut candidates = vec![
            (product("far", 99), Decimal::new(15_000, 2)),
            (product("near-low-stock", 1), Decimal::new(11_000, 2)),
            (product("near-high-stock", 50), Decimal::new(9_000, 2)),
        ];

        sort_by_price_distance(&mut candidates, reference);

        let order: Vec<&str> = candidates.iter().map(|(p, _)| p.id.0.as_str()).collect();
        assert_eq!(order, vec!["near-high-stock", "near-low-stock", "far"]);
    }

    #[test]
    fn dedup_keeps_the_highest_confidence_record() {
        let records = vec![
            record("bag-n20", HistoryKind::FrequentlyBought, 0.4),
            record("bag-n20", HistoryKind::SimilarCustomers, 0.7),
            record("rm-s30", HistoryKind::Upgrade, 0.5),
        ];

        let deduped = dedup_keep_highest(records);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].product.id.0, "bag-n20");
        assert_eq!(deduped[0].kind, HistoryKind::SimilarCustomers);
        assert!((deduped[0].confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_keeps_confidence_in_the_unit_interval() {
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(0.35), 0.35);
    }
}
