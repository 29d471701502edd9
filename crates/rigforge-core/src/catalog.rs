//! Read-only parts index.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::part::{Category, Part, RawPart};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where catalog rows come from.
pub trait PartSource {
    fn fetch(&self) -> Result<Vec<RawPart>, CatalogError>;
}

/// Decode a listing row by row, skipping rows that don't describe a part.
pub fn parse_rows(rows: Vec<Value>) -> Vec<RawPart> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value(row) {
            Ok(raw) => Some(raw),
            Err(e) => {
                log::debug!("Skipping catalog row {idx}: {e}");
                None
            }
        })
        .collect()
}

impl PartSource for Vec<RawPart> {
    fn fetch(&self) -> Result<Vec<RawPart>, CatalogError> {
        Ok(self.clone())
    }
}

/// A catalog exported to disk as the JSON array the product endpoint returns.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PartSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<RawPart>, CatalogError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(parse_rows(serde_json::from_str(&content)?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    parts: Vec<Part>,
    by_category: HashMap<Category, Vec<usize>>,
}

impl Catalog {
    /// Index catalog rows, dropping rows whose category isn't a build slot.
    pub fn new(rows: Vec<RawPart>) -> Self {
        let parts = rows
            .into_iter()
            .filter_map(|raw| {
                let (id, category) = (raw.id, raw.category.clone());
                let part = Part::from_raw(raw);
                if part.is_none() {
                    log::debug!("Skipping part {id}: unknown category {category:?}");
                }
                part
            })
            .collect();
        Self::from_parts(parts)
    }

    pub fn from_parts(parts: Vec<Part>) -> Self {
        let mut by_category: HashMap<Category, Vec<usize>> = HashMap::new();
        for (idx, part) in parts.iter().enumerate() {
            by_category.entry(part.category).or_default().push(idx);
        }
        Self { parts, by_category }
    }

    /// Fetch once from `source`, surfacing the failure.
    pub fn try_load(source: &dyn PartSource) -> Result<Self, CatalogError> {
        let catalog = Self::new(source.fetch()?);
        log::info!("Loaded {} catalog parts", catalog.len());
        Ok(catalog)
    }

    /// Fetch once from `source`. A failed fetch leaves the index empty, so
    /// every candidate list downstream is simply empty.
    pub fn load(source: &dyn PartSource) -> Self {
        Self::try_load(source).unwrap_or_else(|e| {
            log::warn!("{e}; continuing with an empty catalog");
            Self::default()
        })
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Parts of `category` in catalog order.
    pub fn by_category(&self, category: Category) -> Vec<&Part> {
        self.by_category
            .get(&category)
            .map(|idxs| idxs.iter().map(|&i| &self.parts[i]).collect())
            .unwrap_or_default()
    }

    pub fn filter(&self, predicate: impl Fn(&Part) -> bool) -> Vec<&Part> {
        self.parts.iter().filter(|p| predicate(p)).collect()
    }

    /// Parts at or below their restock threshold.
    pub fn low_stock(&self) -> Vec<&Part> {
        self.filter(Part::is_low_stock)
    }
}
