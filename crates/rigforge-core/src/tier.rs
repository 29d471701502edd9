//! Price tiers and preset builds.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::part::{Category, Part};
use crate::session::BuildSession;

const MID_TIER_FLOOR: Decimal = dec!(10000);
const HIGH_TIER_FLOOR: Decimal = dec!(25000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Entry,
    Mid,
    High,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Entry, Tier::Mid, Tier::High];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Entry => write!(f, "entry"),
            Tier::Mid => write!(f, "mid"),
            Tier::High => write!(f, "high"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(Tier::Entry),
            "mid" => Ok(Tier::Mid),
            "high" => Ok(Tier::High),
            _ => Err(format!("Unknown tier: {s}")),
        }
    }
}

/// Price-based tier of a part.
pub fn classify(part: &Part) -> Tier {
    if part.price < MID_TIER_FLOOR {
        Tier::Entry
    } else if part.price < HIGH_TIER_FLOOR {
        Tier::Mid
    } else {
        Tier::High
    }
}

/// Auto-build for `tier`.
///
/// Clears the build, then walks [`Category::ALL`] in order and fills each
/// slot with the most expensive part that is compatible with the slots filled
/// before it, preferring parts inside `tier` and falling back to any
/// compatible part. Greedy: an early pick can rule out a better overall build.
pub fn apply_preset(session: &mut BuildSession, tier: Tier) {
    session.clear();
    session.set_active_tier(Some(tier));

    for category in Category::ALL {
        let pick = session.candidates(category).best().cloned();
        match pick {
            Some(part) => {
                log::debug!("Preset {tier}: {category} -> {part}");
                session.place(part);
            }
            None => log::debug!("Preset {tier}: no compatible {category}"),
        }
    }
}

/// Named one-click builds, each aimed at a game's demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePreset {
    Valorant,
    LeagueOfLegends,
    GenshinImpact,
    GtaV,
    RedDeadRedemption2,
    SpaceMarine2,
}

impl GamePreset {
    pub const ALL: [GamePreset; 6] = [
        GamePreset::Valorant,
        GamePreset::LeagueOfLegends,
        GamePreset::GenshinImpact,
        GamePreset::GtaV,
        GamePreset::RedDeadRedemption2,
        GamePreset::SpaceMarine2,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GamePreset::Valorant => "valorant",
            GamePreset::LeagueOfLegends => "lol",
            GamePreset::GenshinImpact => "genshin",
            GamePreset::GtaV => "gtav",
            GamePreset::RedDeadRedemption2 => "rdr2",
            GamePreset::SpaceMarine2 => "spacemarine2",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GamePreset::Valorant => "VALORANT",
            GamePreset::LeagueOfLegends => "League of Legends",
            GamePreset::GenshinImpact => "Genshin Impact",
            GamePreset::GtaV => "Grand Theft Auto V",
            GamePreset::RedDeadRedemption2 => "Red Dead Redemption 2",
            GamePreset::SpaceMarine2 => "Space Marine 2",
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            GamePreset::Valorant | GamePreset::LeagueOfLegends | GamePreset::GenshinImpact => {
                Tier::Entry
            }
            GamePreset::GtaV => Tier::Mid,
            GamePreset::RedDeadRedemption2 | GamePreset::SpaceMarine2 => Tier::High,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.id() == id)
    }

    pub fn apply(self, session: &mut BuildSession) {
        apply_preset(session, self.tier());
    }
}

impl fmt::Display for GamePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for GamePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(&s.trim().to_ascii_lowercase()).ok_or_else(|| {
            let known: Vec<_> = Self::ALL.iter().map(|g| g.id()).collect();
            format!("Unknown preset: {s} (expected one of {})", known.join(", "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::part::RawPart;
    use serde_json::json;
    use std::sync::Arc;

    fn priced(price: &str) -> Part {
        let raw: RawPart = serde_json::from_value(json!({
            "id": 1, "name": "x", "category": "SSD", "price": price, "quantity": 1
        }))
        .unwrap();
        Part::from_raw(raw).unwrap()
    }

    fn session(rows: serde_json::Value) -> BuildSession {
        let rows: Vec<RawPart> = serde_json::from_value(rows).unwrap();
        BuildSession::new(Arc::new(Catalog::new(rows)))
    }

    fn picked(session: &BuildSession, category: Category) -> Option<u64> {
        session.build().get(category).map(|p| p.id)
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(&priced("0")), Tier::Entry);
        assert_eq!(classify(&priced("9999.99")), Tier::Entry);
        assert_eq!(classify(&priced("10000")), Tier::Mid);
        assert_eq!(classify(&priced("24999.99")), Tier::Mid);
        assert_eq!(classify(&priced("25000.00")), Tier::High);
    }

    #[test]
    fn preset_prefers_tier_then_price() {
        let mut session = session(json!([
            {"id": 1, "name": "i3", "category": "CPU", "price": "4000", "quantity": 1},
            {"id": 2, "name": "i5", "category": "CPU", "price": "8000", "quantity": 1},
            {"id": 3, "name": "i9", "category": "CPU", "price": "30000", "quantity": 1},
            {"id": 4, "name": "4090", "category": "GPU", "price": "70000", "quantity": 1}
        ]));

        apply_preset(&mut session, Tier::Entry);
        assert_eq!(session.active_tier(), Some(Tier::Entry));
        assert_eq!(picked(&session, Category::Cpu), Some(2));
        // No entry GPU exists, so the full compatible list is used.
        assert_eq!(picked(&session, Category::Gpu), Some(4));
        assert_eq!(picked(&session, Category::Ram), None);

        apply_preset(&mut session, Tier::High);
        assert_eq!(picked(&session, Category::Cpu), Some(3));
    }

    #[test]
    fn preset_ties_go_to_catalog_order() {
        let mut session = session(json!([
            {"id": 7, "name": "A", "category": "SSD", "price": "2990", "quantity": 1},
            {"id": 8, "name": "B", "category": "SSD", "price": "2990.00", "quantity": 1}
        ]));
        apply_preset(&mut session, Tier::Entry);
        assert_eq!(picked(&session, Category::Ssd), Some(7));
    }

    #[test]
    fn earlier_picks_constrain_later_ones() {
        let mut session = session(json!([
            {"id": 1, "name": "Ryzen 7", "category": "CPU", "price": "12000", "quantity": 1,
             "specs": {"socket": "AM5", "tdp": 250}},
            {"id": 2, "name": "Z790", "category": "Mainboard", "price": "15000", "quantity": 1,
             "specs": {"socket": "LGA1700", "memory_type": "DDR5", "form_factor": "ATX"}},
            {"id": 3, "name": "B650", "category": "Mainboard", "price": "11000", "quantity": 1,
             "specs": {"socket": "AM5", "memory_type": "DDR5", "form_factor": "M-ATX"}},
            {"id": 4, "name": "DDR4 kit", "category": "RAM", "price": "4000", "quantity": 1,
             "specs": {"type": "DDR4"}},
            {"id": 5, "name": "DDR5 kit", "category": "RAM", "price": "3000", "quantity": 1,
             "specs": {"type": "DDR5"}},
            {"id": 6, "name": "450W", "category": "PSU", "price": "12500", "quantity": 1,
             "specs": {"wattage": 450}},
            {"id": 7, "name": "650W", "category": "PSU", "price": "10500", "quantity": 1,
             "specs": {"wattage": 650}},
            {"id": 8, "name": "ITX box", "category": "Case", "price": "13000", "quantity": 1,
             "specs": {"form_factor": "ITX"}},
            {"id": 9, "name": "Tower", "category": "Case", "price": "10000", "quantity": 1,
             "specs": {"form_factor": "ATX"}}
        ]));

        apply_preset(&mut session, Tier::Mid);
        assert_eq!(picked(&session, Category::Cpu), Some(1));
        assert_eq!(picked(&session, Category::Mainboard), Some(3));
        assert_eq!(picked(&session, Category::Ram), Some(5));
        assert_eq!(picked(&session, Category::Psu), Some(7));
        assert_eq!(picked(&session, Category::Case), Some(9));
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn game_presets_map_to_tiers() {
        assert_eq!(GamePreset::from_id("valorant").map(GamePreset::tier), Some(Tier::Entry));
        assert_eq!("GTAV".parse::<GamePreset>().map(GamePreset::tier), Ok(Tier::Mid));
        assert_eq!(GamePreset::SpaceMarine2.tier(), Tier::High);
        assert!("minecraft".parse::<GamePreset>().is_err());
    }
}
