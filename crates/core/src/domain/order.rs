use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{DeliveryMethod, ProductId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

/// Line item with the name/price/variant snapshot taken at purchase time.
/// The product it references may since have been repriced or retired.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub delivery_method: DeliveryMethod,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};
    use rust_decimal::Decimal;

    use crate::domain::product::{DeliveryMethod, ProductId};

    use super::{Order, OrderId, OrderItem, OrderStatus, PaymentStatus};

    #[test]
    fn line_total_multiplies_snapshot_price_by_quantity() {
        let item = OrderItem {
            product_id: ProductId("rm-n20".to_owned()),
            name: "Ready-mix N20".to_owned(),
            unit_price: Decimal::new(21_500, 2),
            quantity: 3,
            delivery_method: DeliveryMethod::Pump,
        };

        assert_eq!(item.line_total(), Decimal::new(64_500, 2));
    }

    #[test]
    fn order_serializes_with_snake_case_statuses() {
        let order = Order {
            id: OrderId("ord-1".to_owned()),
            status: OrderStatus::Delivered,
            payment_status: PaymentStatus::Paid,
            created_at: DateTime::UNIX_EPOCH + Duration::days(20_000),
            total: Decimal::new(64_500, 2),
            items: Vec::new(),
        };

        let json = serde_json::to_string(&order).expect("order serializes");
        assert!(json.contains("\"status\":\"delivered\""));
        assert!(json.contains("\"payment_status\":\"paid\""));
    }
}
