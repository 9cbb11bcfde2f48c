//! Purchase-history pattern miner: four independent passes over a customer's
//! order history, concatenated and deduplicated by product.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::CatalogSnapshot;
use crate::config::HistoryConfig;
use crate::domain::order::Order;
use crate::domain::product::{GradeTier, ProductId};

use super::ranking::{clamp_unit, dedup_keep_highest};
use super::types::{HistoryKind, HistoryRecommendation};

/// Everything the passes need to know about the customer, computed once per
/// invocation. Orders with zero line items are malformed but non-fatal and
/// are skipped here.
struct PurchaseProfile {
    /// Number of distinct orders each product appears in.
    purchase_counts: BTreeMap<ProductId, u32>,
    owned: BTreeSet<ProductId>,
    /// Products in the most recent (by `created_at`) non-empty order.
    latest_order: BTreeSet<ProductId>,
    /// Per purchased category: (total spend, total quantity).
    category_spend: BTreeMap<String, (Decimal, u64)>,
}

impl PurchaseProfile {
    fn build(history: &[Order], catalog: &CatalogSnapshot) -> Self {
        let mut purchase_counts: BTreeMap<ProductId, u32> = BTreeMap::new();
        let mut owned = BTreeSet::new();
        let mut category_spend: BTreeMap<String, (Decimal, u64)> = BTreeMap::new();

        let latest = history
            .iter()
            .filter(|order| !order.items.is_empty())
            .max_by(|left, right| {
                left.created_at.cmp(&right.created_at).then_with(|| left.id.cmp(&right.id))
            });
        let latest_order: BTreeSet<ProductId> = latest
            .map(|order| order.items.iter().map(|item| item.product_id.clone()).collect())
            .unwrap_or_default();

        for order in history.iter().filter(|order| !order.items.is_empty()) {
            let in_order: BTreeSet<&ProductId> =
                order.items.iter().map(|item| &item.product_id).collect();
            for product_id in in_order {
                *purchase_counts.entry(product_id.clone()).or_insert(0) += 1;
                owned.insert(product_id.clone());
            }

            for item in &order.items {
                // Category comes from the live catalog; retired products
                // without a catalog entry do not contribute spend statistics.
                if let Some(product) = catalog.find(&item.product_id) {
                    let entry = category_spend
                        .entry(product.category.clone())
                        .or_insert((Decimal::ZERO, 0));
                    entry.0 += item.line_total();
                    entry.1 += u64::from(item.quantity);
                }
            }
        }

        Self { purchase_counts, owned, latest_order, category_spend }
    }
}

#[derive(Clone, Debug)]
pub struct HistoryMiner<'a> {
    catalog: &'a CatalogSnapshot,
    market_orders: Option<&'a [Order]>,
    config: HistoryConfig,
}

impl<'a> HistoryMiner<'a> {
    pub fn new(catalog: &'a CatalogSnapshot, config: HistoryConfig) -> Self {
        Self { catalog, market_orders: None, config }
    }

    /// Storewide order corpus powering the co-purchase and popularity
    /// signals. Without it those passes fall back to the customer's own
    /// orders and stock depth.
    pub fn with_market_orders(mut self, orders: &'a [Order]) -> Self {
        self.market_orders = Some(orders);
        self
    }

    /// All four mining passes over the customer's order history. Passes run
    /// independently; their outputs are concatenated and deduplicated by
    /// product id keeping the highest-confidence record.
    pub fn recommendations(&self, history: &[Order]) -> Vec<HistoryRecommendation> {
        if history.is_empty() {
            return Vec::new();
        }

        let profile = PurchaseProfile::build(history, self.catalog);

        let mut records = Vec::new();
        records.extend(self.frequently_bought(&profile));
        records.extend(self.upgrades(&profile));
        records.extend(self.similar_customers(history, &profile));
        records.extend(self.category_popular(history, &profile));

        debug!(
            event_name = "recommend.history.mined",
            orders = history.len(),
            raw_records = records.len(),
            "history passes complete"
        );

        dedup_keep_highest(records)
    }

    fn frequently_bought(&self, profile: &PurchaseProfile) -> Vec<HistoryRecommendation> {
        let mut records = Vec::new();

        for (product_id, count) in &profile.purchase_counts {
            if *count < self.config.frequency_threshold {
                continue;
            }
            // Just bought: skip anything in the most recent order.
            if profile.latest_order.contains(product_id) {
                continue;
            }
            let Some(product) = self.catalog.find(product_id) else { continue };

            let confidence =
                clamp_unit(f64::from(*count) / f64::from(self.config.frequency_norm));
            records.push(HistoryRecommendation {
                product: product.clone(),
                kind: HistoryKind::FrequentlyBought,
                reason: format!("Ordered {count} times across your past orders"),
                confidence,
            });
        }

        records
    }

    fn upgrades(&self, profile: &PurchaseProfile) -> Vec<HistoryRecommendation> {
        let mut records = Vec::new();

        for (category, (total, quantity)) in &profile.category_spend {
            if *quantity == 0 {
                continue;
            }
            let average = *total / Decimal::from(*quantity);
            if average <= Decimal::ZERO {
                continue;
            }
            let bound =
                average * Decimal::from(self.config.upgrade_price_multiplier_pct)
                    / Decimal::from(100u32);

            let owned_max_tier: Option<GradeTier> = self
                .catalog
                .in_category(category)
                .filter(|product| profile.owned.contains(&product.id))
                .filter_map(|product| product.grade.tier())
                .max();

            let mut candidates: Vec<(GradeTier, Decimal, &crate::domain::product::Product)> = self
                .catalog
                .in_category(category)
                .filter(|product| !profile.owned.contains(&product.id))
                .filter_map(|product| {
                    let tier = product.grade.tier()?;
                    if let Some(owned_max) = owned_max_tier {
                        if tier <= owned_max {
                            return None;
                        }
                    }
                    let price = crate::pricing::best_price(product)?;
                    (price > average && price <= bound).then_some((tier, price, product))
                })
                .collect();

            // Highest grade first; id as the deterministic tie-break.
            candidates.sort_by(|left, right| {
                right.0.cmp(&left.0).then_with(|| left.2.id.cmp(&right.2.id))
            });

            if let Some((_, price, product)) = candidates.first() {
                let span = bound - average;
                let delta = *price - average;
                let ratio = if span > Decimal::ZERO {
                    (delta / span).to_f64().unwrap_or(1.0)
                } else {
                    1.0
                };
                let confidence = clamp_unit(0.9 - 0.7 * ratio);

                records.push(HistoryRecommendation {
                    product: (*product).clone(),
                    kind: HistoryKind::Upgrade,
                    reason: format!(
                        "Higher-grade upgrade (grade {}) within your usual {category} budget",
                        product.grade.0
                    ),
                    confidence,
                });
            }
        }

        records
    }

    fn similar_customers(
        &self,
        history: &[Order],
        profile: &PurchaseProfile,
    ) -> Vec<HistoryRecommendation> {
        let corpus = self.market_orders.unwrap_or(history);

        let mut orders_containing: HashMap<&ProductId, u32> = HashMap::new();
        let mut pair_counts: BTreeMap<(&ProductId, &ProductId), u32> = BTreeMap::new();

        for order in corpus.iter().filter(|order| !order.items.is_empty()) {
            let in_order: BTreeSet<&ProductId> =
                order.items.iter().map(|item| &item.product_id).collect();

            for product_id in &in_order {
                *orders_containing.entry(*product_id).or_insert(0) += 1;
            }

            for referring in in_order.iter().filter(|id| profile.owned.contains(**id)) {
                for candidate in in_order.iter().filter(|id| !profile.owned.contains(**id)) {
                    *pair_counts.entry((*candidate, *referring)).or_insert(0) += 1;
                }
            }
        }

        // Best referring product per candidate; BTreeMap iteration keeps the
        // choice deterministic on ties.
        let mut best: BTreeMap<&ProductId, (f64, &ProductId)> = BTreeMap::new();
        for ((candidate, referring), co_count) in &pair_counts {
            let total = orders_containing.get(referring).copied().unwrap_or(0);
            if total == 0 {
                continue;
            }
            let ratio = clamp_unit(f64::from(*co_count) / f64::from(total));
            match best.get(candidate) {
                Some((existing, _)) if *existing >= ratio => {}
                _ => {
                    best.insert(*candidate, (ratio, *referring));
                }
            }
        }

        let mut records = Vec::new();
        for (candidate, (confidence, referring)) in best {
            let Some(product) = self.catalog.find(candidate) else { continue };
            let referring_name = self
                .catalog
                .find(referring)
                .map(|product| product.name.clone())
                .unwrap_or_else(|| referring.0.clone());

            records.push(HistoryRecommendation {
                product: product.clone(),
                kind: HistoryKind::SimilarCustomers,
                reason: format!("Customers who bought {referring_name} often add this"),
                confidence,
            });
        }

        records
    }

    fn category_popular(
        &self,
        history: &[Order],
        profile: &PurchaseProfile,
    ) -> Vec<HistoryRecommendation> {
        let corpus = self.market_orders.unwrap_or(history);

        let mut units_ordered: HashMap<&ProductId, u64> = HashMap::new();
        for order in corpus {
            for item in &order.items {
                *units_ordered.entry(&item.product_id).or_insert(0) += u64::from(item.quantity);
            }
        }

        let mut records = Vec::new();
        for category in profile.category_spend.keys() {
            let mut candidates: Vec<&crate::domain::product::Product> = self
                .catalog
                .in_category(category)
                .filter(|product| !profile.owned.contains(&product.id))
                .collect();

            // Popularity by corpus demand, stock depth as the fallback
            // signal, id for total determinism.
            candidates.sort_by(|left, right| {
                let left_units = units_ordered.get(&left.id).copied().unwrap_or(0);
                let right_units = units_ordered.get(&right.id).copied().unwrap_or(0);
                right_units
                    .cmp(&left_units)
                    .then_with(|| right.stock_quantity.cmp(&left.stock_quantity))
                    .then_with(|| left.id.cmp(&right.id))
            });

            for (rank, product) in
                candidates.into_iter().take(self.config.popular_per_category).enumerate()
            {
                // Weakest signal of the four; base confidence sits below the
                // personalized passes so dedup prefers those.
                let confidence = clamp_unit(0.45 * 0.75_f64.powi(rank as i32));
                records.push(HistoryRecommendation {
                    product: product.clone(),
                    kind: HistoryKind::CategoryPopular,
                    reason: format!("Popular choice in {category}"),
                    confidence,
                });
            }
        }

        records
    }
}
