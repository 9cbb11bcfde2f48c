//! Recommendation engines: the content-based comparator for product pages and
//! the purchase-history miner for the account dashboard. Both are pure
//! functions of their inputs; neither persists anything.

pub mod comparator;
pub mod history;
mod ranking;
mod types;

pub use comparator::ComparatorEngine;
pub use history::HistoryMiner;
pub use types::{
    ComparisonKind, HistoryKind, HistoryRecommendation, Recommendation, RecommendationGroup,
};
