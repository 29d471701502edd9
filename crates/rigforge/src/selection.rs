use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use rigforge_core::{BuildSession, Catalog, GamePreset, Tier, apply_preset, share};

/// Flags that describe a build. Presets and share codes are applied first,
/// then each `--select` on top.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Catalog id of a part to put in its slot (repeatable)
    #[arg(short, long = "select", value_name = "ID")]
    pub select: Vec<u64>,

    /// Start from a shared build code
    #[arg(long, value_name = "CODE", conflicts_with_all = ["preset", "tier"])]
    pub share: Option<String>,

    /// Start from a game preset (valorant, lol, genshin, gtav, rdr2, spacemarine2)
    #[arg(short, long, value_name = "GAME", conflicts_with = "tier")]
    pub preset: Option<GamePreset>,

    /// Start from a price-tier preset (entry, mid, high)
    #[arg(short, long, value_name = "TIER")]
    pub tier: Option<Tier>,
}

impl SelectionArgs {
    pub fn session(&self, catalog: Arc<Catalog>) -> Result<BuildSession> {
        let mut session = BuildSession::new(catalog);

        if let Some(code) = &self.share {
            let build = share::decode(code, session.catalog());
            log::debug!("Share code restored {} parts", build.len());
            session.restore(build);
        }
        if let Some(preset) = self.preset {
            log::debug!("Applying {preset} preset");
            preset.apply(&mut session);
        } else if let Some(tier) = self.tier {
            log::debug!("Applying {tier} tier preset");
            apply_preset(&mut session, tier);
        }
        for &id in &self.select {
            session.select_id(id)?;
        }

        Ok(session)
    }
}
