use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::part::{Category, Part};

/// The parts chosen so far, at most one per [`Category`], iterated in slot
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Build {
    slots: BTreeMap<Category, Part>,
}

impl Build {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> Option<&Part> {
        self.slots.get(&category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.slots.contains_key(&category)
    }

    /// Put `part` into its own category's slot, returning what was there.
    pub fn insert(&mut self, part: Part) -> Option<Part> {
        self.slots.insert(part.category, part)
    }

    pub fn remove(&mut self, category: Category) -> Option<Part> {
        self.slots.remove(&category)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Part)> {
        self.slots.iter().map(|(c, p)| (*c, p))
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Exact sum of the selected prices, saturating at [`Decimal::MAX`].
    pub fn total_price(&self) -> Decimal {
        self.slots
            .values()
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.price))
    }

    pub fn filled_core_slots(&self) -> usize {
        self.slots.keys().filter(|c| !c.is_peripheral()).count()
    }
}

impl FromIterator<Part> for Build {
    fn from_iter<I: IntoIterator<Item = Part>>(iter: I) -> Self {
        let mut build = Build::new();
        for part in iter {
            build.insert(part);
        }
        build
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::RawPart;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn part(id: u64, category: &str, price: &str) -> Part {
        let raw: RawPart = serde_json::from_value(json!({
            "id": id, "name": format!("part {id}"), "category": category,
            "price": price, "quantity": 1
        }))
        .unwrap();
        Part::from_raw(raw).unwrap()
    }

    #[test]
    fn one_part_per_slot() {
        let mut build = Build::new();
        assert!(build.insert(part(1, "GPU", "100")).is_none());
        let old = build.insert(part(2, "GPU", "200"));
        assert_eq!(old.map(|p| p.id), Some(1));
        assert_eq!(build.len(), 1);
        assert_eq!(build.get(Category::Gpu).map(|p| p.id), Some(2));
    }

    #[test]
    fn iterates_in_slot_order() {
        let build: Build = [part(1, "Case", "1"), part(2, "CPU", "1"), part(3, "RAM", "1")]
            .into_iter()
            .collect();
        let order: Vec<Category> = build.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Category::Cpu, Category::Ram, Category::Case]);
    }

    #[test]
    fn price_sum_is_exact() {
        let mut build = Build::new();
        assert_eq!(build.total_price(), Decimal::ZERO);

        for _ in 0..1000 {
            build.insert(part(1, "CPU", "0.10"));
            build.insert(part(2, "RAM", "0.20"));
            assert_eq!(build.total_price(), dec!(0.30));
            build.remove(Category::Ram);
            assert_eq!(build.total_price(), dec!(0.10));
        }
    }

    #[test]
    fn price_sum_saturates() {
        let max = Decimal::MAX.to_string();
        let build: Build = [part(1, "CPU", &max), part(2, "GPU", &max)].into_iter().collect();
        assert_eq!(build.total_price(), Decimal::MAX);
    }

    #[test]
    fn core_slot_count_skips_peripherals() {
        let build: Build = [part(1, "CPU", "1"), part(2, "Monitor", "1")]
            .into_iter()
            .collect();
        assert_eq!(build.filled_core_slots(), 1);
    }
}
