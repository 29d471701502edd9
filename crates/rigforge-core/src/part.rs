use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::specs::Specs;

/// Stock level at or below which a part counts as low stock when the catalog
/// record carries no explicit threshold.
pub const DEFAULT_MIN_THRESHOLD: u32 = 5;

/// A build slot. Declaration order is the fixed slot order used for display,
/// share codes, checkout and preset iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CPU")]
    Cpu,
    Cooler,
    Mainboard,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "PSU")]
    Psu,
    Case,
    Monitor,
    GamingGear,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Cpu,
        Category::Cooler,
        Category::Mainboard,
        Category::Ram,
        Category::Gpu,
        Category::Ssd,
        Category::Psu,
        Category::Case,
        Category::Monitor,
        Category::GamingGear,
    ];

    /// Name used by the product collaborator's `category` column.
    pub fn wire_name(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Cooler => "Cooler",
            Category::Mainboard => "Mainboard",
            Category::Ram => "RAM",
            Category::Gpu => "GPU",
            Category::Ssd => "SSD",
            Category::Psu => "PSU",
            Category::Case => "Case",
            Category::Monitor => "Monitor",
            Category::GamingGear => "GamingGear",
        }
    }

    /// Lowercase identifier used in share codes and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Cooler => "cooler",
            Category::Mainboard => "mainboard",
            Category::Ram => "ram",
            Category::Gpu => "gpu",
            Category::Ssd => "ssd",
            Category::Psu => "psu",
            Category::Case => "case",
            Category::Monitor => "monitor",
            Category::GamingGear => "gaminggear",
        }
    }

    /// Human-readable slot title.
    pub fn label(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Cooler => "CPU Cooler",
            Category::Mainboard => "Mainboard",
            Category::Ram => "Memory (RAM)",
            Category::Gpu => "Graphics Card",
            Category::Ssd => "Storage (SSD)",
            Category::Psu => "Power Supply",
            Category::Case => "Case",
            Category::Monitor => "Monitor",
            Category::GamingGear => "Gaming Gear",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.wire_name() == s)
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == s)
    }

    /// Monitors and gaming gear are optional extras outside the core tower.
    pub fn is_peripheral(self) -> bool {
        matches!(self, Category::Monitor | Category::GamingGear)
    }

    pub fn core_slots() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| !c.is_peripheral())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the slug or the wire name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == needle || c.wire_name().eq_ignore_ascii_case(&needle))
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// A product row exactly as the catalog collaborator returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPart {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(deserialize_with = "lenient::int")]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_threshold: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub warranty_months: Option<u32>,
}

/// A purchasable component with typed specs. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub id: u64,
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    pub quantity: i64,
    pub specs: Specs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_months: Option<u32>,
}

impl Part {
    /// Convert a catalog row, returning `None` when its category is not one
    /// the builder knows about.
    pub fn from_raw(raw: RawPart) -> Option<Self> {
        let category = Category::from_wire(raw.category.trim())?;
        Some(Part {
            id: raw.id,
            name: raw.name,
            category,
            price: raw.price,
            quantity: raw.quantity,
            specs: Specs::from_value(category, raw.specs),
            min_threshold: raw.min_threshold,
            warranty_months: raw.warranty_months,
        })
    }

    pub fn in_stock(&self) -> bool {
        self.quantity >= 1
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= i64::from(self.min_threshold.unwrap_or(DEFAULT_MIN_THRESHOLD))
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_wire(category.wire_name()), Some(category));
            assert_eq!(Category::from_slug(category.slug()), Some(category));
            assert_eq!(category.slug().parse::<Category>(), Ok(category));
        }
        assert_eq!("gpu".parse::<Category>(), Ok(Category::Gpu));
        assert_eq!("GamingGear".parse::<Category>(), Ok(Category::GamingGear));
        assert!("Fan".parse::<Category>().is_err());
    }

    #[test]
    fn core_slots_exclude_peripherals() {
        let core: Vec<_> = Category::core_slots().collect();
        assert_eq!(core.len(), 8);
        assert!(!core.contains(&Category::Monitor));
        assert!(!core.contains(&Category::GamingGear));
    }

    #[test]
    fn raw_rows_from_sql_strings() {
        let raw: RawPart = serde_json::from_value(json!({
            "id": "17",
            "name": "Ryzen 5 7600",
            "category": "CPU",
            "price": "7990.00",
            "quantity": "12",
            "min_threshold": "3",
            "specs": "{\"socket\": \"AM5\", \"tdp\": \"65\"}",
            "image_url": ""
        }))
        .unwrap();
        let part = Part::from_raw(raw).unwrap();

        assert_eq!(part.id, 17);
        assert_eq!(part.price, dec!(7990.00));
        assert_eq!(part.quantity, 12);
        assert_eq!(part.specs.socket(), Some("AM5"));
        assert_eq!(part.specs.tdp(), Some(65));
        assert!(part.in_stock());
        assert!(!part.is_low_stock());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let raw: RawPart = serde_json::from_value(json!({
            "id": 1, "name": "Thermal paste", "category": "Accessory",
            "price": 150, "quantity": 4
        }))
        .unwrap();
        assert!(Part::from_raw(raw).is_none());
    }

    #[test]
    fn low_stock_uses_default_threshold() {
        let raw: RawPart = serde_json::from_value(json!({
            "id": 2, "name": "Case fan", "category": "Cooler",
            "price": 390, "quantity": 5, "specs": null
        }))
        .unwrap();
        let part = Part::from_raw(raw).unwrap();
        assert!(part.is_low_stock());
        assert_eq!(part.specs, Specs::empty(Category::Cooler));
    }
}
