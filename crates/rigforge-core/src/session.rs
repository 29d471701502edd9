//! Per-user build state.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::build::Build;
use crate::catalog::Catalog;
use crate::part::{Category, Part};
use crate::power::total_wattage;
use crate::rules::{self, Violation};
use crate::tier::{Tier, classify};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{part} is a {actual} part and cannot fill the {slot} slot")]
    CategoryMismatch {
        slot: Category,
        actual: Category,
        part: String,
    },
    #[error("No category is open for selection")]
    NoOpenCategory,
    #[error("Part {0} is not in the catalog")]
    UnknownPart(u64),
}

/// Selection list for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidates<'a> {
    pub category: Category,
    /// Every part compatible with the rest of the build, in catalog order.
    pub compatible: Vec<&'a Part>,
    /// The subset of `compatible` inside the active tier.
    pub suggestions: Vec<&'a Part>,
    pub tier: Option<Tier>,
}

impl<'a> Candidates<'a> {
    /// Compatible parts that aren't suggestions.
    pub fn others(&self) -> impl Iterator<Item = &'a Part> + '_ {
        self.compatible
            .iter()
            .copied()
            .filter(|p| !self.suggestions.iter().any(|s| s.id == p.id))
    }

    /// Highest-priced suggestion, or highest-priced compatible part when no
    /// suggestion exists. Ties go to the earliest part in catalog order.
    pub fn best(&self) -> Option<&'a Part> {
        let pool = if self.suggestions.is_empty() {
            &self.compatible
        } else {
            &self.suggestions
        };
        pool.iter()
            .copied()
            .reduce(|best, p| if p.price > best.price { p } else { best })
    }

    pub fn is_empty(&self) -> bool {
        self.compatible.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Derived {
    total_price: Decimal,
    total_wattage: u32,
    warnings: BTreeMap<Category, Violation>,
}

/// One user's in-progress build over a shared catalog.
///
/// Every mutation recomputes the total price, the wattage estimate and the
/// compatibility warnings for all filled slots, since changing one slot can
/// invalidate another.
#[derive(Debug, Clone)]
pub struct BuildSession {
    catalog: Arc<Catalog>,
    build: Build,
    current_category: Option<Category>,
    active_tier: Option<Tier>,
    derived: Derived,
}

impl BuildSession {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let mut session = Self {
            catalog,
            build: Build::new(),
            current_category: None,
            active_tier: None,
            derived: Derived::default(),
        };
        session.recompute();
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn build(&self) -> &Build {
        &self.build
    }

    pub fn current_category(&self) -> Option<Category> {
        self.current_category
    }

    pub fn active_tier(&self) -> Option<Tier> {
        self.active_tier
    }

    pub fn set_active_tier(&mut self, tier: Option<Tier>) {
        self.active_tier = tier;
    }

    /// Put `part` into the `category` slot. Compatibility never blocks a
    /// selection; an incompatible part shows up in [`Self::warnings`].
    pub fn select(&mut self, category: Category, part: Part) -> Result<(), BuildError> {
        if part.category != category {
            return Err(BuildError::CategoryMismatch {
                slot: category,
                actual: part.category,
                part: part.to_string(),
            });
        }
        self.place(part);
        Ok(())
    }

    /// Select a catalog part into its own category.
    pub fn select_id(&mut self, id: u64) -> Result<(), BuildError> {
        let part = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(BuildError::UnknownPart(id))?;
        self.place(part);
        Ok(())
    }

    /// Open `category` for selection and return its candidate list.
    pub fn open(&mut self, category: Category) -> Candidates<'_> {
        self.current_category = Some(category);
        self.candidates(category)
    }

    /// Select catalog part `id` into the open category.
    pub fn pick(&mut self, id: u64) -> Result<(), BuildError> {
        let category = self.current_category.ok_or(BuildError::NoOpenCategory)?;
        let part = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(BuildError::UnknownPart(id))?;
        self.select(category, part)?;
        self.current_category = None;
        Ok(())
    }

    /// Candidate list for `category` given everything else selected.
    pub fn candidates(&self, category: Category) -> Candidates<'_> {
        let compatible = rules::compatible_candidates(&self.catalog, &self.build, category);
        let suggestions = match self.active_tier {
            Some(tier) => compatible
                .iter()
                .copied()
                .filter(|p| classify(p) == tier)
                .collect(),
            None => Vec::new(),
        };
        Candidates {
            category,
            compatible,
            suggestions,
            tier: self.active_tier,
        }
    }

    pub fn remove(&mut self, category: Category) -> Option<Part> {
        let removed = self.build.remove(category);
        self.recompute();
        removed
    }

    /// Empty every slot and forget the active tier.
    pub fn clear(&mut self) {
        self.build.clear();
        self.active_tier = None;
        self.recompute();
    }

    /// Replace the whole build, e.g. with one decoded from a share code.
    pub fn restore(&mut self, build: Build) {
        self.build = build;
        self.recompute();
    }

    pub fn total_price(&self) -> Decimal {
        self.derived.total_price
    }

    pub fn total_wattage(&self) -> u32 {
        self.derived.total_wattage
    }

    /// Violation per filled slot; slots without a problem are absent.
    pub fn warnings(&self) -> &BTreeMap<Category, Violation> {
        &self.derived.warnings
    }

    /// Fraction of the core slots (everything but peripherals) that are filled.
    pub fn progress(&self) -> f64 {
        let total = Category::core_slots().count();
        self.build.filled_core_slots() as f64 / total as f64
    }

    pub(crate) fn place(&mut self, part: Part) {
        self.build.insert(part);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.derived = Derived {
            total_price: self.build.total_price(),
            total_wattage: total_wattage(&self.build),
            warnings: rules::warnings(&self.build),
        };
    }
}
