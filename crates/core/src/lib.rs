pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod pricing;
pub mod recommend;

pub use catalog::CatalogSnapshot;
pub use config::{
    AppConfig, ComparatorConfig, ConfigError, ConfigOverrides, HistoryConfig, LoadOptions,
    LogFormat, LoggingConfig,
};
pub use domain::order::{Order, OrderId, OrderItem, OrderStatus, PaymentStatus};
pub use domain::product::{
    DeliveryMethod, Grade, GradeClass, GradeTier, Product, ProductId, ProductImage, VariantPrices,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use pricing::{best_price, resolve_price, PriceError};
pub use recommend::{
    ComparatorEngine, ComparisonKind, HistoryKind, HistoryMiner, HistoryRecommendation,
    Recommendation, RecommendationGroup,
};
