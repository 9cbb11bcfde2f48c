//! Content-based comparator engine: grouped upsell/downsell/alternative
//! recommendations for a single viewed or compared product.

use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::CatalogSnapshot;
use crate::config::ComparatorConfig;
use crate::domain::product::Product;
use crate::pricing::best_price;

use super::ranking::{price_distance, sort_by_price_distance};
use super::types::{ComparisonKind, Recommendation, RecommendationGroup};

#[derive(Clone, Debug)]
pub struct ComparatorEngine {
    config: ComparatorConfig,
}

impl ComparatorEngine {
    pub fn new(config: ComparatorConfig) -> Self {
        Self { config }
    }

    /// Grouped recommendations for a reference product against a catalog
    /// snapshot. Empty-result conditions return an empty vec, never an error:
    /// the storefront renders an empty state.
    pub fn recommendations(
        &self,
        reference: &Product,
        catalog: &CatalogSnapshot,
    ) -> Vec<RecommendationGroup> {
        let candidates: Vec<&Product> =
            catalog.products().iter().filter(|product| product.id != reference.id).collect();

        if candidates.len() < 2 {
            debug!(
                event_name = "recommend.compare.too_few_candidates",
                reference = %reference.id.0,
                candidates = candidates.len(),
                "catalog snapshot too small to compare against"
            );
            return Vec::new();
        }

        let Some(reference_price) = best_price(reference) else {
            // An unpriced reference has no price axis to partition on.
            debug!(
                event_name = "recommend.compare.unpriced_reference",
                reference = %reference.id.0,
                "reference product has no price points"
            );
            return Vec::new();
        };
        let reference_tier = reference.grade.tier();
        let band = reference_price * Decimal::from(self.config.alternative_band_pct)
            / Decimal::from(100u32);

        let mut upsell: Vec<(Product, Decimal)> = Vec::new();
        let mut downsell: Vec<(Product, Decimal)> = Vec::new();
        let mut alternative: Vec<(Product, Decimal)> = Vec::new();

        for candidate in candidates {
            if candidate.category != reference.category {
                continue;
            }
            let Some(price) = best_price(candidate) else {
                // Unpriced during staff data entry; excluded from ranking.
                continue;
            };

            let partition = match (reference_tier, candidate.grade.tier()) {
                (Some(reference_tier), Some(candidate_tier))
                    if candidate_tier > reference_tier && price > reference_price =>
                {
                    ComparisonKind::Upsell
                }
                (Some(reference_tier), Some(candidate_tier))
                    if candidate_tier < reference_tier && price < reference_price =>
                {
                    ComparisonKind::Downsell
                }
                _ if price_distance(price, reference_price) <= band => {
                    ComparisonKind::Alternative
                }
                _ => continue,
            };

            match partition {
                ComparisonKind::Upsell => upsell.push((candidate.clone(), price)),
                ComparisonKind::Downsell => downsell.push((candidate.clone(), price)),
                ComparisonKind::Alternative => alternative.push((candidate.clone(), price)),
            }
        }

        debug!(
            event_name = "recommend.compare.partitioned",
            reference = %reference.id.0,
            upsell = upsell.len(),
            downsell = downsell.len(),
            alternative = alternative.len(),
            "partitioned comparator candidates"
        );

        [
            (ComparisonKind::Upsell, upsell),
            (ComparisonKind::Downsell, downsell),
            (ComparisonKind::Alternative, alternative),
        ]
        .into_iter()
        .filter_map(|(kind, partition)| self.build_group(kind, partition, reference_price))
        .collect()
    }

    fn build_group(
        &self,
        kind: ComparisonKind,
        mut partition: Vec<(Product, Decimal)>,
        reference_price: Decimal,
    ) -> Option<RecommendationGroup> {
        if partition.is_empty() {
            return None;
        }

        sort_by_price_distance(&mut partition, reference_price);
        partition.truncate(self.config.max_per_group);

        let records = partition
            .into_iter()
            .map(|(product, _)| {
                let reason = match kind {
                    ComparisonKind::Upsell | ComparisonKind::Downsell => {
                        format!("{} (grade {})", kind.default_reason(), product.grade.0)
                    }
                    ComparisonKind::Alternative => kind.default_reason().to_owned(),
                };
                Recommendation { product, kind, reason }
            })
            .collect();

        Some(RecommendationGroup {
            title: kind.group_title().to_owned(),
            description: kind.group_description().to_owned(),
            records,
        })
    }
}

impl Default for ComparatorEngine {
    fn default() -> Self {
        Self::new(crate::config::AppConfig::default().comparator)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::CatalogSnapshot;
    use crate::config::ComparatorConfig;
    use crate::domain::product::{Grade, Product, ProductId, VariantPrices};
    use crate::recommend::types::ComparisonKind;

    use super::ComparatorEngine;

    fn product(id: &str, grade: &str, category: &str, normal_cents: i64, stock: u32) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            name: format!("Mix {id}"),
            grade: Grade::new(grade),
            category: category.to_owned(),
            unit: "m3".to_owned(),
            stock_quantity: stock,
            prices: VariantPrices {
                normal: Some(Decimal::new(normal_cents, 2)),
                ..VariantPrices::default()
            },
            images: Vec::new(),
        }
    }

    fn group_kinds(groups: &[crate::recommend::types::RecommendationGroup]) -> Vec<ComparisonKind> {
        groups
            .iter()
            .flat_map(|group| group.records.iter().map(|record| record.kind))
            .collect()
    }

    #[test]
    fn higher_grade_higher_price_lands_in_upsell_only() {
        let a = product("a", "N20", "ready_mix", 10_000, 10);
        let b = product("b", "N25", "ready_mix", 12_000, 10);
        let c = product("c", "S30", "ready_mix", 15_000, 10);
        let catalog = CatalogSnapshot::new(vec![a.clone(), b.clone(), c]);

        let groups = ComparatorEngine::default().recommendations(&a, &catalog);

        let upsell = groups
            .iter()
            .find(|group| group.records.iter().all(|r| r.kind == ComparisonKind::Upsell))
            .expect("upsell group present");
        assert!(upsell.records.iter().any(|record| record.product.id.0 == "b"));

        let downsell_has_b = groups.iter().any(|group| {
            group
                .records
                .iter()
                .any(|r| r.kind == ComparisonKind::Downsell && r.product.id.0 == "b")
        });
        assert!(!downsell_has_b, "B must not appear in downsell");
    }

    #[test]
    fn reference_product_is_never_recommended() {
        let a = product("a", "N20", "ready_mix", 10_000, 10);
        let b = product("b", "N25", "ready_mix", 12_000, 10);
        let c = product("c", "N15", "ready_mix", 8_000, 10);
        let catalog = CatalogSnapshot::new(vec![a.clone(), b, c]);

        let groups = ComparatorEngine::default().recommendations(&a, &catalog);
        assert!(!groups.is_empty());
        for group in &groups {
            assert!(group.records.iter().all(|record| record.product.id != a.id));
        }
    }

    #[test]
    fn single_candidate_catalog_yields_empty_state() {
        let a = product("a", "N20", "ready_mix", 10_000, 10);
        let b = product("b", "N25", "ready_mix", 12_000, 10);
        let catalog = CatalogSnapshot::new(vec![a.clone(), b]);

        assert!(ComparatorEngine::default().recommendations(&a, &catalog).is_empty());
    }

    #[test]
    fn empty_catalog_yields_empty_state() {
        let a = product("a", "N20", "ready_mix", 10_000, 10);
        assert!(ComparatorEngine::default()
            .recommendations(&a, &CatalogSnapshot::default())
            .is_empty());
    }

    #[test]
    fn other_categories_are_ignored() {
        let a = product("a", "N20", "ready_mix", 10_000, 10);
        let b = product("b", "N25", "bagged", 10_500, 10);
        let c = product("c", "N25", "bagged", 11_000, 10);
        let catalog = CatalogSnapshot::new(vec![a.clone(), b, c]);

        assert!(ComparatorEngine::default().recommendations(&a, &catalog).is_empty());
    }

    #[test]
    fn unpriced_candidates_are_excluded() {
        let a = product("a", "N20", "ready_mix", 10_000, 10);
        let mut b = product("b", "N25", "ready_mix", 12_000, 10);
        b.prices = VariantPrices::default();
        let c = product("c", "N15", "ready_mix", 9_000, 10);
        let catalog = CatalogSnapshot::new(vec![a.clone(), b, c]);

        let kinds = group_kinds(&ComparatorEngine::default().recommendations(&a, &catalog));
        assert_eq!(kinds, vec![ComparisonKind::Downsell]);
    }

    #[test]
    fn tierless_grades_can_only_be_alternatives() {
        let a = product("a", "N20", "admixture", 10_000, 10);
        let b = product("b", "P1", "admixture", 10_500, 10);
        let c = product("c", "P2", "admixture", 30_000, 10);
        let catalog = CatalogSnapshot::new(vec![a.clone(), b, c]);

        let groups = ComparatorEngine::default().recommendations(&a, &catalog);
        let kinds = group_kinds(&groups);
        // B is within the band; C is far outside it and has no tier.
        assert_eq!(kinds, vec![ComparisonKind::Alternative]);
        assert_eq!(groups[0].records[0].product.id.0, "b");
    }

    #[test]
    fn group_cap_limits_records_closest_first() {
        let reference = product("ref", "N20", "ready_mix", 10_000, 10);
        let mut products = vec![reference.clone()];
        for (index, cents) in [10_200, 10_400, 10_600, 10_800, 11_000].iter().enumerate() {
            products.push(product(&format!("alt-{index}"), "N20", "ready_mix", *cents, 10));
        }
        let catalog = CatalogSnapshot::new(products);

        let engine =
            ComparatorEngine::new(ComparatorConfig { max_per_group: 2, alternative_band_pct: 15 });
        let groups = engine.recommendations(&reference, &catalog);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[0].records[0].product.id.0, "alt-0");
        assert_eq!(groups[0].records[1].product.id.0, "alt-1");
    }

    #[test]
    fn output_is_deterministic_across_invocations() {
        let catalog = crate::fixtures::demo_catalog();
        let reference = catalog.products()[1].clone();
        let engine = ComparatorEngine::default();

        let first = engine.recommendations(&reference, &catalog);
        let second = engine.recommendations(&reference, &catalog);
        assert_eq!(first, second);
    }
}
