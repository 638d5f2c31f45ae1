use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{FeedError, Result};
use crate::models::{ItemKind, NormalizedItem, RawItem};
use crate::planner::normalize_item;

/// One CSV record, before any validation.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    name: String,
    calories: f64,
    weight: f64,
    weight_unit: String,
    min_protein: f64,
    #[serde(default)]
    max_fiber: Option<f64>,
    min_fat: f64,
    max_moisture: f64,
    #[serde(default)]
    ash: Option<f64>,
    #[serde(default, alias = "type")]
    item_type: Option<String>,
    #[serde(default)]
    max_carbs: Option<f64>,
}

impl CatalogRow {
    fn into_raw(self) -> Result<RawItem> {
        let kind: ItemKind = self.item_type.as_deref().unwrap_or_default().parse()?;
        Ok(RawItem {
            name: self.name.trim().to_string(),
            kind,
            calories: self.calories,
            weight: self.weight,
            weight_unit: self.weight_unit,
            protein: self.min_protein,
            fiber: self.max_fiber.unwrap_or(0.0),
            fat: self.min_fat,
            moisture: self.max_moisture,
            ash: self.ash.unwrap_or(0.0),
            carbs: self.max_carbs,
        })
    }
}

/// A CSV row that could not be turned into an item.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based line in the source file.
    pub line: u64,
    /// Item name, when the row got far enough to have one.
    pub name: String,
    pub reason: String,
}

/// Normalized items plus the rows that were skipped.
///
/// Items are ordered foods first, then treats, each group in file order.
#[derive(Debug, Clone, Default)]
pub struct LoadedCatalog {
    pub items: Vec<NormalizedItem>,
    pub rejected: Vec<RejectedRow>,
}

impl LoadedCatalog {
    pub fn foods(&self) -> impl Iterator<Item = &NormalizedItem> {
        self.items.iter().filter(|i| !i.is_treat())
    }

    pub fn treats(&self) -> impl Iterator<Item = &NormalizedItem> {
        self.items.iter().filter(|i| i.is_treat())
    }

    /// Fail on the first rejected row instead of skipping it.
    pub fn into_strict(self) -> Result<Vec<NormalizedItem>> {
        match self.rejected.into_iter().next() {
            Some(row) => Err(FeedError::InvalidData {
                item: row.name,
                reason: format!("line {}: {}", row.line, row.reason),
            }),
            None => Ok(self.items),
        }
    }
}

/// Load and normalize an item catalog from a CSV file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<LoadedCatalog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        FeedError::InvalidInput(format!("cannot open catalog {}: {}", path.display(), e))
    })?;
    read_catalog(file)
}

/// Read a catalog from any CSV source.
///
/// A missing required column fails the whole read; a bad value only
/// rejects its own row. Names are deduplicated case-insensitively and the
/// last occurrence wins.
pub fn read_catalog<R: Read>(source: R) -> Result<LoadedCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers = reader.headers()?.clone();
    for column in [
        "name",
        "calories",
        "weight",
        "weight_unit",
        "min_protein",
        "min_fat",
        "max_moisture",
    ] {
        if !headers.iter().any(|h| h == column) {
            return Err(FeedError::InvalidInput(format!(
                "catalog is missing required column '{}'",
                column
            )));
        }
    }

    let mut items: Vec<NormalizedItem> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                rejected.push(reject(line, String::new(), e.to_string()));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let name = record
            .get(headers.iter().position(|h| h == "name").unwrap_or(0))
            .unwrap_or_default()
            .to_string();

        let parsed = record
            .deserialize::<CatalogRow>(Some(&headers))
            .map_err(FeedError::from)
            .and_then(CatalogRow::into_raw)
            .and_then(|raw| normalize_item(&raw));

        match parsed {
            Ok(item) => match positions.get(&item.key()) {
                Some(&existing) => {
                    debug!(line, name = item.name(), "duplicate item replaces earlier row");
                    items[existing] = item;
                }
                None => {
                    positions.insert(item.key(), items.len());
                    items.push(item);
                }
            },
            Err(e) => rejected.push(reject(line, name, e.to_string())),
        }
    }

    // Stable, so file order survives within each group.
    items.sort_by_key(|item| item.is_treat());

    Ok(LoadedCatalog { items, rejected })
}

fn reject(line: u64, name: String, reason: String) -> RejectedRow {
    warn!(line, name = %name, reason = %reason, "skipping catalog row");
    RejectedRow { line, name, reason }
}
