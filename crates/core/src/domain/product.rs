use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Structural class encoded by the leading letter of a grade code.
/// Normal-duty (`N`) mixes rank below structural (`S`) mixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GradeClass {
    Normal,
    Structural,
}

/// Parsed, orderable view of a grade code: class first, then strength,
/// so N20 < N25 < S30.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GradeTier {
    pub class: GradeClass,
    pub strength: u32,
}

/// Raw grade code as entered by staff, e.g. "N20" or "S35".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grade(pub String);

impl Grade {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Parse the code into an orderable tier. Codes with an unknown class
    /// letter or a non-numeric suffix have no tier and stay out of
    /// tier-based partitioning.
    pub fn tier(&self) -> Option<GradeTier> {
        let code = self.0.trim();
        let mut chars = code.chars();
        let class = match chars.next()?.to_ascii_uppercase() {
            'N' => GradeClass::Normal,
            'S' => GradeClass::Structural,
            _ => return None,
        };
        let strength = chars.as_str().parse().ok()?;
        Some(GradeTier { class, strength })
    }
}

/// The five delivery variants a product can be priced for. This is a closed
/// enumeration, not an open map: adding a variant is a catalog schema change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeliveryMethod {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "pump")]
    Pump,
    #[serde(rename = "tremie_1")]
    Tremie1,
    #[serde(rename = "tremie_2")]
    Tremie2,
    #[serde(rename = "tremie_3")]
    Tremie3,
}

impl DeliveryMethod {
    pub const ALL: [DeliveryMethod; 5] = [
        DeliveryMethod::Normal,
        DeliveryMethod::Pump,
        DeliveryMethod::Tremie1,
        DeliveryMethod::Tremie2,
        DeliveryMethod::Tremie3,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Pump => "pump",
            Self::Tremie1 => "tremie_1",
            Self::Tremie2 => "tremie_2",
            Self::Tremie3 => "tremie_3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal delivery",
            Self::Pump => "Pump delivery",
            Self::Tremie1 => "Tremie 1 placement",
            Self::Tremie2 => "Tremie 2 placement",
            Self::Tremie3 => "Tremie 3 placement",
        }
    }
}

impl std::str::FromStr for DeliveryMethod {
    type Err = crate::errors::DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "pump" => Ok(Self::Pump),
            "tremie_1" => Ok(Self::Tremie1),
            "tremie_2" => Ok(Self::Tremie2),
            "tremie_3" => Ok(Self::Tremie3),
            other => Err(crate::errors::DomainError::UnknownDeliveryMethod(other.to_owned())),
        }
    }
}

/// Sparse per-variant price record. Absence means the delivery method is not
/// offered for the product, not that it is free.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPrices {
    pub normal: Option<Decimal>,
    pub pump: Option<Decimal>,
    pub tremie_1: Option<Decimal>,
    pub tremie_2: Option<Decimal>,
    pub tremie_3: Option<Decimal>,
}

impl VariantPrices {
    pub fn get(&self, method: DeliveryMethod) -> Option<Decimal> {
        match method {
            DeliveryMethod::Normal => self.normal,
            DeliveryMethod::Pump => self.pump,
            DeliveryMethod::Tremie1 => self.tremie_1,
            DeliveryMethod::Tremie2 => self.tremie_2,
            DeliveryMethod::Tremie3 => self.tremie_3,
        }
    }

    /// The delivery methods this product is actually offered with.
    pub fn available(&self) -> Vec<(DeliveryMethod, Decimal)> {
        DeliveryMethod::ALL
            .into_iter()
            .filter_map(|method| self.get(method).map(|price| (method, price)))
            .collect()
    }

    /// Cheapest offered price across all variants, if any variant is priced.
    pub fn best(&self) -> Option<Decimal> {
        DeliveryMethod::ALL.into_iter().filter_map(|method| self.get(method)).min()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub grade: Grade,
    pub category: String,
    pub unit: String,
    pub stock_quantity: u32,
    pub prices: VariantPrices,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// First image flagged primary, falling back to the first image.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.iter().find(|image| image.primary).or_else(|| self.images.first())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{DeliveryMethod, Grade, GradeClass, ProductImage, VariantPrices};

    #[test]
    fn grade_tiers_order_by_class_then_strength() {
        let n20 = Grade::new("N20").tier().expect("N20 parses");
        let n25 = Grade::new("N25").tier().expect("N25 parses");
        let s30 = Grade::new("S30").tier().expect("S30 parses");

        assert!(n20 < n25);
        assert!(n25 < s30);
        assert_eq!(s30.class, GradeClass::Structural);
        assert_eq!(s30.strength, 30);
    }

    #[test]
    fn unknown_grade_codes_have_no_tier() {
        assert!(Grade::new("P1").tier().is_none());
        assert!(Grade::new("N").tier().is_none());
        assert!(Grade::new("").tier().is_none());
    }

    #[test]
    fn lowercase_grade_codes_still_parse() {
        let tier = Grade::new("s35").tier().expect("lowercase parses");
        assert_eq!(tier.class, GradeClass::Structural);
        assert_eq!(tier.strength, 35);
    }

    #[test]
    fn best_price_is_minimum_of_populated_variants() {
        let prices = VariantPrices {
            normal: None,
            pump: Some(Decimal::new(14_500, 2)),
            tremie_1: None,
            tremie_2: Some(Decimal::new(13_900, 2)),
            tremie_3: None,
        };

        assert_eq!(prices.best(), Some(Decimal::new(13_900, 2)));
        assert_eq!(prices.available().len(), 2);
    }

    #[test]
    fn fully_unpriced_record_has_no_best_price() {
        assert_eq!(VariantPrices::default().best(), None);
    }

    #[test]
    fn delivery_method_round_trips_through_key() {
        for method in DeliveryMethod::ALL {
            let parsed: DeliveryMethod = method.key().parse().expect("key parses back");
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn primary_image_prefers_flagged_then_first() {
        let mut product = crate::fixtures::demo_catalog()
            .products()
            .first()
            .cloned()
            .expect("fixture catalog is non-empty");

        product.images = vec![
            ProductImage { url: "a.jpg".to_owned(), primary: false },
            ProductImage { url: "b.jpg".to_owned(), primary: true },
        ];
        assert_eq!(product.primary_image().map(|image| image.url.as_str()), Some("b.jpg"));

        product.images[1].primary = false;
        assert_eq!(product.primary_image().map(|image| image.url.as_str()), Some("a.jpg"));
    }
}
