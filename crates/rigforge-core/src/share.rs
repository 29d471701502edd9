//! Share codes: a build as base64 of `slug:id` pairs, e.g.
//! `cpu:12,gpu:40,case:7`.

use base64::{Engine as _, engine::general_purpose};

use crate::build::Build;
use crate::catalog::Catalog;
use crate::part::Category;

/// Encode `build`, or `None` when there is nothing to share.
pub fn encode(build: &Build) -> Option<String> {
    if build.is_empty() {
        return None;
    }
    let pairs = build
        .iter()
        .map(|(category, part)| format!("{}:{}", category.slug(), part.id))
        .collect::<Vec<_>>()
        .join(",");
    Some(general_purpose::STANDARD.encode(pairs))
}

/// Rebuild a shared build against `catalog`.
///
/// Never fails: an undecodable code yields an empty build, and any pair whose
/// category or part can't be resolved is dropped while the rest are kept.
pub fn decode(code: &str, catalog: &Catalog) -> Build {
    let mut build = Build::new();

    let text = match general_purpose::STANDARD
        .decode(code.trim())
        .map_err(|e| e.to_string())
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()))
    {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Ignoring malformed share code {code:?}: {e}");
            return build;
        }
    };

    for pair in text.split(',').filter(|p| !p.trim().is_empty()) {
        let Some((slug, id)) = pair.split_once(':') else {
            log::debug!("Skipping share entry {pair:?}: expected category:id");
            continue;
        };
        let Some(category) = Category::from_slug(slug.trim()) else {
            log::debug!("Skipping share entry {pair:?}: unknown category");
            continue;
        };
        let Ok(id) = id.trim().parse::<u64>() else {
            log::debug!("Skipping share entry {pair:?}: invalid part id");
            continue;
        };
        match catalog.get(id) {
            Some(part) if part.category == category => {
                build.insert(part.clone());
            }
            Some(part) => {
                log::debug!("Skipping share entry {pair:?}: part is a {}", part.category)
            }
            None => log::debug!("Skipping share entry {pair:?}: part no longer listed"),
        }
    }

    build
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::RawPart;
    use serde_json::json;

    fn catalog() -> Catalog {
        let rows: Vec<RawPart> = serde_json::from_value(json!([
            {"id": 1, "name": "Ryzen 5 7600", "category": "CPU", "price": "7990", "quantity": 3},
            {"id": 2, "name": "B650M", "category": "Mainboard", "price": "5890", "quantity": 3},
            {"id": 5, "name": "DDR5 32GB", "category": "RAM", "price": "3290", "quantity": 3}
        ]))
        .unwrap();
        Catalog::new(rows)
    }

    #[test]
    fn encodes_in_slot_order() {
        let catalog = catalog();
        let build: Build = [catalog.get(2), catalog.get(1)]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        insta::assert_snapshot!(encode(&build).unwrap(), @"Y3B1OjEsbWFpbmJvYXJkOjI=");
        assert_eq!(encode(&Build::new()), None);
    }

    #[test]
    fn round_trips_through_catalog() {
        let catalog = catalog();
        let build: Build = catalog.parts().iter().cloned().collect();
        let code = encode(&build).unwrap();
        assert_eq!(decode(&code, &catalog), build);
    }

    #[test]
    fn missing_part_is_skipped() {
        // cpu:1,mainboard:999,ram:5
        let build = decode("Y3B1OjEsbWFpbmJvYXJkOjk5OSxyYW06NQ==", &catalog());
        assert_eq!(build.len(), 2);
        assert!(build.contains(Category::Cpu));
        assert!(!build.contains(Category::Mainboard));
        assert!(build.contains(Category::Ram));
    }

    #[test]
    fn part_in_wrong_slot_is_skipped() {
        // gpu:1,cpu:2
        let build = decode("Z3B1OjEsY3B1OjI=", &catalog());
        assert!(build.is_empty());
    }

    #[test]
    fn garbage_yields_empty_build() {
        assert!(decode("%%% not base64 %%%", &catalog()).is_empty());
        assert!(decode("", &catalog()).is_empty());
        let junk = general_purpose::STANDARD.encode("cpu,fan:1,ram:x,:,cpu:1");
        let build = decode(&junk, &catalog());
        assert_eq!(build.len(), 1);
        assert!(build.contains(Category::Cpu));
    }
}
