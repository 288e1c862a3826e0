//! Catalog ingest from a CSV meal table.
//!
//! The boundary with the catalog source: records arriving here are
//! expected to be well-formed, and anything that is not fails with
//! `MalformedRecord` rather than being silently dropped or defaulted.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::info;

use crate::catalog::{MealCatalog, MealRecord, NutrientValues};
use crate::energy::MealSlot;
use crate::error::Error;

// Expected column headers.
const ID_COL: &str = "id";
const NAME_COL: &str = "name";
const INGREDIENTS_COL: &str = "ingredients";
const CALORIES_COL: &str = "calories";
const PROTEIN_COL: &str = "protein_g";
const CARBS_COL: &str = "carbs_g";
const FAT_COL: &str = "fat_g";
const FIBER_COL: &str = "fiber_g";
const SODIUM_COL: &str = "sodium_mg";
const DIETARY_TAGS_COL: &str = "dietary_tags";
const ALLERGENS_COL: &str = "allergens";
const HEALTH_BENEFITS_COL: &str = "health_benefits";
// Optional columns.
const MEAL_SLOT_COL: &str = "meal_slot";
const PREP_TIME_COL: &str = "prep_time_minutes";

/// List-valued cells (tags, allergens) are semicolon-separated.
fn parse_tag_set(cell: &str) -> BTreeSet<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn required_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("column '{name}' not found in catalog CSV"))
}

fn required_cell<'a>(record: &'a csv::StringRecord, idx: usize, id: &str, col: &str) -> Result<&'a str> {
    let cell = record.get(idx).map(str::trim).unwrap_or("");
    if cell.is_empty() {
        return Err(Error::malformed(id, format!("missing required field '{col}'")).into());
    }
    Ok(cell)
}

fn parse_nutrient(record: &csv::StringRecord, idx: usize, id: &str, col: &str) -> Result<f64> {
    let cell = required_cell(record, idx, id, col)?;
    cell.parse::<f64>()
        .map_err(|_| Error::malformed(id, format!("field '{col}' is not a number: '{cell}'")).into())
}

/// Loads a meal catalog from a CSV file. Column order is free; columns
/// are located by header name. Record validation (non-negative
/// nutrients, unique ids) happens in [`MealCatalog::new`].
pub fn load_catalog_csv(csv_path: &Path) -> Result<MealCatalog> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open catalog CSV at {csv_path:?}"))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();

    let id_idx = required_column(&headers, ID_COL)?;
    let name_idx = required_column(&headers, NAME_COL)?;
    let ingredients_idx = required_column(&headers, INGREDIENTS_COL)?;
    let calories_idx = required_column(&headers, CALORIES_COL)?;
    let protein_idx = required_column(&headers, PROTEIN_COL)?;
    let carbs_idx = required_column(&headers, CARBS_COL)?;
    let fat_idx = required_column(&headers, FAT_COL)?;
    let fiber_idx = required_column(&headers, FIBER_COL)?;
    let sodium_idx = required_column(&headers, SODIUM_COL)?;
    let dietary_tags_idx = required_column(&headers, DIETARY_TAGS_COL)?;
    let allergens_idx = required_column(&headers, ALLERGENS_COL)?;
    let health_benefits_idx = required_column(&headers, HEALTH_BENEFITS_COL)?;

    let meal_slot_idx = headers.iter().position(|h| h == MEAL_SLOT_COL);
    let prep_time_idx = headers.iter().position(|h| h == PREP_TIME_COL);

    let mut meals = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("failed to read record at row index {row_index}"))?;

        let id = required_cell(&record, id_idx, &format!("row {row_index}"), ID_COL)?.to_string();
        let name = required_cell(&record, name_idx, &id, NAME_COL)?.to_string();
        let ingredients =
            required_cell(&record, ingredients_idx, &id, INGREDIENTS_COL)?.to_string();

        let nutrients = NutrientValues {
            calories: parse_nutrient(&record, calories_idx, &id, CALORIES_COL)?,
            protein_g: parse_nutrient(&record, protein_idx, &id, PROTEIN_COL)?,
            carbs_g: parse_nutrient(&record, carbs_idx, &id, CARBS_COL)?,
            fat_g: parse_nutrient(&record, fat_idx, &id, FAT_COL)?,
            fiber_g: parse_nutrient(&record, fiber_idx, &id, FIBER_COL)?,
            sodium_mg: parse_nutrient(&record, sodium_idx, &id, SODIUM_COL)?,
        };

        let meal_slot = match meal_slot_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
        {
            Some(cell) => Some(MealSlot::from_label(cell).ok_or_else(|| {
                Error::malformed(&id, format!("unknown meal slot '{cell}'"))
            })?),
            None => None,
        };

        let prep_time_minutes = match prep_time_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
        {
            Some(cell) => Some(cell.parse::<u32>().map_err(|_| {
                Error::malformed(&id, format!("prep time is not a number: '{cell}'"))
            })?),
            None => None,
        };

        meals.push(MealRecord {
            id,
            name,
            ingredients,
            nutrients,
            dietary_tags: record.get(dietary_tags_idx).map(parse_tag_set).unwrap_or_default(),
            allergens: record.get(allergens_idx).map(parse_tag_set).unwrap_or_default(),
            health_benefits: record
                .get(health_benefits_idx)
                .map(str::trim)
                .unwrap_or("")
                .to_string(),
            meal_slot,
            prep_time_minutes,
        });
    }

    info!("loaded {} meal records from {:?}", meals.len(), csv_path);
    Ok(MealCatalog::new(meals)?)
}
