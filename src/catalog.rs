use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::energy::MealSlot;
use crate::error::{Error, Result};

/// Structured nutrient values for one serving of a meal, or for the
/// scaled contribution of a log entry. All values are non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientValues {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sodium_mg: f64,
}

impl NutrientValues {
    /// Values scaled by a portion multiplier.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
            fiber_g: self.fiber_g * factor,
            sodium_mg: self.sodium_mg * factor,
        }
    }

    /// Adds `other` scaled by `factor` into `self`.
    pub fn accumulate(&mut self, other: &NutrientValues, factor: f64) {
        self.calories += other.calories * factor;
        self.protein_g += other.protein_g * factor;
        self.carbs_g += other.carbs_g * factor;
        self.fat_g += other.fat_g * factor;
        self.fiber_g += other.fiber_g * factor;
        self.sodium_mg += other.sodium_mg * factor;
    }

    fn first_invalid_field(&self) -> Option<(&'static str, f64)> {
        [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
            ("fiber_g", self.fiber_g),
            ("sodium_mg", self.sodium_mg),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v < 0.0)
    }
}

/// A single meal as loaded from the catalog source. Immutable once the
/// catalog is built for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: String,
    pub name: String,
    /// Free-text ingredient list.
    pub ingredients: String,
    pub nutrients: NutrientValues,
    #[serde(default)]
    pub dietary_tags: BTreeSet<String>,
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    /// Free-text health-benefit description.
    #[serde(default)]
    pub health_benefits: String,
    #[serde(default)]
    pub meal_slot: Option<MealSlot>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
}

impl MealRecord {
    /// Combined textual fields fed to the vectorizer: ingredients,
    /// dietary tags, and the health-benefit text.
    pub fn feature_text(&self) -> String {
        let mut text = self.ingredients.clone();
        for tag in &self.dietary_tags {
            text.push(' ');
            text.push_str(tag);
        }
        if !self.health_benefits.is_empty() {
            text.push(' ');
            text.push_str(&self.health_benefits);
        }
        text
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::malformed("<unknown>", "missing id"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::malformed(&self.id, "missing name"));
        }
        if let Some((field, value)) = self.nutrients.first_invalid_field() {
            return Err(Error::malformed(
                &self.id,
                format!("nutrient '{field}' must be non-negative and finite, got {value}"),
            ));
        }
        Ok(())
    }
}

/// Ordered, read-only collection of meals for one session.
///
/// Insertion order is preserved; it is the deterministic tie-break key
/// used by the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCatalog {
    meals: Vec<MealRecord>,
}

impl MealCatalog {
    /// Builds a catalog, rejecting malformed records and duplicate ids.
    pub fn new(meals: Vec<MealRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for meal in &meals {
            meal.validate()?;
            if !seen.insert(meal.id.clone()) {
                return Err(Error::malformed(&meal.id, "duplicate meal id"));
            }
        }
        Ok(Self { meals })
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    pub fn meals(&self) -> &[MealRecord] {
        &self.meals
    }

    pub fn get(&self, index: usize) -> Option<&MealRecord> {
        self.meals.get(index)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&MealRecord> {
        self.meals.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal record builder shared by tests across modules.
    pub fn meal(id: &str, ingredients: &str) -> MealRecord {
        MealRecord {
            id: id.to_string(),
            name: id.to_string(),
            ingredients: ingredients.to_string(),
            nutrients: NutrientValues {
                calories: 300.0,
                protein_g: 20.0,
                carbs_g: 30.0,
                fat_g: 10.0,
                fiber_g: 5.0,
                sodium_mg: 400.0,
            },
            dietary_tags: BTreeSet::new(),
            allergens: BTreeSet::new(),
            health_benefits: String::new(),
            meal_slot: None,
            prep_time_minutes: None,
        }
    }
}
