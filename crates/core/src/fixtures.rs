//! Canonical demo seeds for the storefront: a small concrete catalog plus a
//! customer history and a storewide order corpus. The CLI demo command and
//! the integration tests both run against these.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::catalog::CatalogSnapshot;
use crate::domain::order::{Order, OrderId, OrderItem, OrderStatus, PaymentStatus};
use crate::domain::product::{
    DeliveryMethod, Grade, Product, ProductId, ProductImage, VariantPrices,
};

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    grade: &'static str,
    category: &'static str,
    unit: &'static str,
    stock_quantity: u32,
    /// Per-variant prices in cents; `None` means the variant is not offered.
    normal: Option<i64>,
    pump: Option<i64>,
    tremie_1: Option<i64>,
    tremie_2: Option<i64>,
    tremie_3: Option<i64>,
    image: Option<&'static str>,
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        id: "rm-n20",
        name: "Ready-Mix N20",
        grade: "N20",
        category: "ready_mix",
        unit: "m3",
        stock_quantity: 140,
        normal: Some(21_000),
        pump: Some(23_500),
        tremie_1: Some(24_000),
        tremie_2: None,
        tremie_3: None,
        image: Some("https://cdn.mixmart.example/rm-n20.jpg"),
    },
    SeedProduct {
        id: "rm-n25",
        name: "Ready-Mix N25",
        grade: "N25",
        category: "ready_mix",
        unit: "m3",
        stock_quantity: 110,
        normal: Some(23_800),
        pump: Some(26_400),
        tremie_1: None,
        tremie_2: None,
        tremie_3: None,
        image: Some("https://cdn.mixmart.example/rm-n25.jpg"),
    },
    SeedProduct {
        id: "rm-s30",
        name: "Ready-Mix S30 Structural",
        grade: "S30",
        category: "ready_mix",
        unit: "m3",
        stock_quantity: 60,
        normal: Some(27_900),
        pump: Some(30_200),
        tremie_1: Some(31_000),
        tremie_2: Some(31_800),
        tremie_3: Some(32_500),
        image: Some("https://cdn.mixmart.example/rm-s30.jpg"),
    },
    SeedProduct {
        id: "rm-s35",
        name: "Ready-Mix S35 Structural",
        grade: "S35",
        category: "ready_mix",
        unit: "m3",
        stock_quantity: 25,
        // Pump-and-tremie-only product; no normal delivery price.
        normal: None,
        pump: Some(33_600),
        tremie_1: None,
        tremie_2: Some(34_900),
        tremie_3: None,
        image: None,
    },
    SeedProduct {
        id: "bag-n20",
        name: "Bagged Mix N20 40kg",
        grade: "N20",
        category: "bagged",
        unit: "bag",
        stock_quantity: 800,
        normal: Some(3_000),
        pump: None,
        tremie_1: None,
        tremie_2: None,
        tremie_3: None,
        image: Some("https://cdn.mixmart.example/bag-n20.jpg"),
    },
    SeedProduct {
        id: "bag-n25",
        name: "Bagged Mix N25 40kg",
        grade: "N25",
        category: "bagged",
        unit: "bag",
        stock_quantity: 620,
        normal: Some(3_600),
        pump: None,
        tremie_1: None,
        tremie_2: None,
        tremie_3: None,
        image: None,
    },
    SeedProduct {
        id: "bag-s30",
        name: "Bagged Mix S30 40kg",
        grade: "S30",
        category: "bagged",
        unit: "bag",
        stock_quantity: 340,
        normal: Some(5_900),
        pump: None,
        tremie_1: None,
        tremie_2: None,
        tremie_3: None,
        image: None,
    },
    SeedProduct {
        id: "adm-plast",
        name: "Plasticizer Admixture 5L",
        grade: "P1",
        category: "admixture",
        unit: "can",
        stock_quantity: 210,
        normal: Some(4_500),
        pump: None,
        tremie_1: None,
        tremie_2: None,
        tremie_3: None,
        image: None,
    },
    SeedProduct {
        id: "adm-retard",
        name: "Set Retarder Admixture 5L",
        grade: "P2",
        category: "admixture",
        unit: "can",
        stock_quantity: 150,
        normal: Some(4_900),
        pump: None,
        tremie_1: None,
        tremie_2: None,
        tremie_3: None,
        image: None,
    },
    SeedProduct {
        id: "adm-cure",
        name: "Curing Compound 20L",
        grade: "C1",
        category: "admixture",
        unit: "drum",
        stock_quantity: 90,
        // Awaiting pricing from the supplier; fully unpriced on purpose.
        normal: None,
        pump: None,
        tremie_1: None,
        tremie_2: None,
        tremie_3: None,
        image: None,
    },
];

fn cents(value: Option<i64>) -> Option<Decimal> {
    value.map(|cents| Decimal::new(cents, 2))
}

fn build_product(seed: &SeedProduct) -> Product {
    Product {
        id: ProductId(seed.id.to_owned()),
        name: seed.name.to_owned(),
        grade: Grade::new(seed.grade),
        category: seed.category.to_owned(),
        unit: seed.unit.to_owned(),
        stock_quantity: seed.stock_quantity,
        prices: VariantPrices {
            normal: cents(seed.normal),
            pump: cents(seed.pump),
            tremie_1: cents(seed.tremie_1),
            tremie_2: cents(seed.tremie_2),
            tremie_3: cents(seed.tremie_3),
        },
        images: seed
            .image
            .map(|url| vec![ProductImage { url: url.to_owned(), primary: true }])
            .unwrap_or_default(),
    }
}

/// Fixed point in time so demo output and tests are stable.
fn seed_day(offset: i64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + Duration::days(20_000 + offset)
}

fn seed_order(
    id: &str,
    day_offset: i64,
    delivery_method: DeliveryMethod,
    items: &[(&str, i64, u32)],
) -> Order {
    let catalog = demo_catalog();
    let items: Vec<OrderItem> = items
        .iter()
        .map(|(product_id, cents, quantity)| OrderItem {
            product_id: ProductId((*product_id).to_owned()),
            name: catalog
                .find(&ProductId((*product_id).to_owned()))
                .map(|product| product.name.clone())
                .unwrap_or_else(|| (*product_id).to_owned()),
            unit_price: Decimal::new(*cents, 2),
            quantity: *quantity,
            delivery_method,
        })
        .collect();
    let total = items.iter().map(OrderItem::line_total).sum();

    Order {
        id: OrderId(id.to_owned()),
        status: OrderStatus::Delivered,
        payment_status: PaymentStatus::Paid,
        created_at: seed_day(day_offset),
        total,
        items,
    }
}

pub fn demo_catalog() -> CatalogSnapshot {
    CatalogSnapshot::new(SEED_PRODUCTS.iter().map(build_product).collect())
}

/// A repeat customer: steady bagged N20 purchases, then a first ready-mix
/// order as the most recent one.
pub fn demo_customer_orders() -> Vec<Order> {
    vec![
        seed_order("ord-0001", 0, DeliveryMethod::Normal, &[("bag-n20", 3_000, 20)]),
        seed_order(
            "ord-0002",
            14,
            DeliveryMethod::Normal,
            &[("bag-n20", 3_000, 25), ("adm-plast", 4_500, 2)],
        ),
        seed_order("ord-0003", 30, DeliveryMethod::Normal, &[("bag-n20", 3_000, 15)]),
        seed_order("ord-0004", 45, DeliveryMethod::Pump, &[("rm-n20", 23_500, 6)]),
    ]
}

/// Storewide corpus powering the co-purchase and popularity signals.
pub fn demo_market_orders() -> Vec<Order> {
    vec![
        seed_order(
            "mkt-0001",
            2,
            DeliveryMethod::Normal,
            &[("bag-n20", 3_000, 30), ("adm-plast", 4_500, 3)],
        ),
        seed_order(
            "mkt-0002",
            5,
            DeliveryMethod::Normal,
            &[("bag-n20", 3_000, 18), ("bag-s30", 5_900, 6)],
        ),
        seed_order(
            "mkt-0003",
            9,
            DeliveryMethod::Pump,
            &[("rm-n20", 23_500, 8), ("adm-plast", 4_500, 2)],
        ),
        seed_order(
            "mkt-0004",
            12,
            DeliveryMethod::Normal,
            &[("bag-n25", 3_600, 40), ("bag-n20", 3_000, 10)],
        ),
        seed_order("mkt-0005", 16, DeliveryMethod::Tremie2, &[("rm-s30", 31_800, 12)]),
        seed_order(
            "mkt-0006",
            21,
            DeliveryMethod::Normal,
            &[("bag-n20", 3_000, 22), ("bag-s30", 5_900, 4)],
        ),
    ]
}
