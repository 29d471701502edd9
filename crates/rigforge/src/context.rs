use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rigforge_api::ShopClient;
use rigforge_core::{Catalog, JsonFileSource};
use rust_decimal::Decimal;

use crate::config::Config;
use crate::format;

/// Everything a subcommand needs besides its own arguments.
pub struct Context {
    pub config: Config,
    catalog_file: Option<PathBuf>,
}

impl Context {
    pub fn new(config: Config, catalog_file: Option<PathBuf>) -> Self {
        Self {
            config,
            catalog_file,
        }
    }

    pub fn client(&self) -> Result<ShopClient> {
        ShopClient::new(&self.config.api.base_url, self.config.api.timeout())
    }

    /// Load the catalog from `--catalog` when given, otherwise from the shop
    /// API. An unreachable API leaves the catalog empty rather than failing.
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        let catalog = match &self.catalog_file {
            Some(path) => Catalog::try_load(&JsonFileSource::new(path))
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
            None => Catalog::load(&self.client()?),
        };
        if catalog.is_empty() {
            eprintln!("{}", "Warning: the catalog is empty".yellow());
        }
        Ok(Arc::new(catalog))
    }

    pub fn money(&self, amount: Decimal) -> String {
        format::money(&self.config.display.currency, amount)
    }
}
