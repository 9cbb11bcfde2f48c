//! Record and group shapes emitted by the recommendation engines.

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Relation of a comparator-engine candidate to the reference product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    Upsell,
    Downsell,
    Alternative,
}

impl ComparisonKind {
    pub fn group_title(&self) -> &'static str {
        match self {
            Self::Upsell => "Step up in grade",
            Self::Downsell => "Budget-friendly picks",
            Self::Alternative => "Comparable alternatives",
        }
    }

    pub fn group_description(&self) -> &'static str {
        match self {
            Self::Upsell => "Stronger mixes in the same category, priced above your selection",
            Self::Downsell => "Lower-grade mixes that cost less for lighter-duty work",
            Self::Alternative => "Substitutes in the same category at a similar price point",
        }
    }

    pub fn default_reason(&self) -> &'static str {
        match self {
            Self::Upsell => "Higher-grade alternative at a similar price point",
            Self::Downsell => "More economical option for similar use cases",
            Self::Alternative => "Comparable substitute in the same category",
        }
    }
}

/// Pass that produced a history-miner record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    FrequentlyBought,
    Upgrade,
    SimilarCustomers,
    CategoryPopular,
}

impl HistoryKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::FrequentlyBought => "You order this regularly",
            Self::Upgrade => "Higher-grade upgrade for your usual purchases",
            Self::SimilarCustomers => "Customers with similar orders also bought this",
            Self::CategoryPopular => "Popular in a category you buy from",
        }
    }
}

/// One comparator-engine recommendation. The product is never the reference
/// product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product: Product,
    pub kind: ComparisonKind,
    pub reason: String,
}

/// One history-miner recommendation with its confidence in [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecommendation {
    pub product: Product,
    pub kind: HistoryKind,
    pub reason: String,
    pub confidence: f64,
}

/// Presentation group computed per request; never persisted, immutable once
/// returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
    pub title: String,
    pub description: String,
    pub records: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::{ComparisonKind, HistoryKind};

    #[test]
    fn kinds_serialize_as_snake_case_type_tags() {
        let upsell = serde_json::to_string(&ComparisonKind::Upsell).expect("serializes");
        assert_eq!(upsell, "\"upsell\"");

        let frequent =
            serde_json::to_string(&HistoryKind::FrequentlyBought).expect("serializes");
        assert_eq!(frequent, "\"frequently_bought\"");
    }

    #[test]
    fn every_kind_carries_display_copy() {
        for kind in [ComparisonKind::Upsell, ComparisonKind::Downsell, ComparisonKind::Alternative]
        {
            assert!(!kind.group_title().is_empty());
            assert!(!kind.group_description().is_empty());
            assert!(!kind.default_reason().is_empty());
        }
    }
}
