//! Windowed aggregation of logged meals and comparison against the
//! daily energy target.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{MealRecord, NutrientValues};
use crate::energy::{macro_split, DailyEnergyTarget, MacroSplit};

/// One logged consumption event. The nutrient snapshot is captured at
/// log time, so aggregation never needs the catalog; `meal_id` is kept
/// only as a back-reference for catalog meals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub logged_at: DateTime<Utc>,
    pub meal_id: Option<String>,
    pub name: String,
    pub nutrients: NutrientValues,
    /// Portion multiplier applied to the nutrient snapshot.
    pub portions: f64,
}

impl LogEntry {
    pub fn from_meal(meal: &MealRecord, logged_at: DateTime<Utc>, portions: f64) -> Self {
        Self {
            logged_at,
            meal_id: Some(meal.id.clone()),
            name: meal.name.clone(),
            nutrients: meal.nutrients,
            portions,
        }
    }

    /// Entry for a non-catalog food, e.g. one mapped in from the
    /// food-lookup collaborator.
    pub fn ad_hoc(
        name: impl Into<String>,
        nutrients: NutrientValues,
        logged_at: DateTime<Utc>,
        portions: f64,
    ) -> Self {
        Self {
            logged_at,
            meal_id: None,
            name: name.into(),
            nutrients,
            portions,
        }
    }
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Number of days spanned, rounded up, never below 1. Used for the
    /// daily-average denominator.
    pub fn day_count(&self) -> i64 {
        let seconds = (self.end - self.start).num_seconds();
        if seconds <= 0 {
            return 1;
        }
        (seconds + 86_399) / 86_400
    }
}

/// Totals for one window of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub totals: NutrientValues,
    pub entry_count: usize,
    /// Per-day totals inside the window, keyed and ordered by date.
    pub per_day: BTreeMap<NaiveDate, NutrientValues>,
    pub daily_average: NutrientValues,
    pub macros: MacroSplit,
}

/// Sums nutrient contributions (scaled by portions) for entries inside
/// the window. Entries may arrive in any order; duplicates are summed,
/// never deduplicated, since repeated entries represent genuinely
/// repeated consumption. An empty window yields all-zero totals.
pub fn aggregate(entries: &[LogEntry], window: &TimeWindow) -> WindowSummary {
    let mut totals = NutrientValues::default();
    let mut per_day: BTreeMap<NaiveDate, NutrientValues> = BTreeMap::new();
    let mut entry_count = 0;

    for entry in entries {
        if !window.contains(entry.logged_at) {
            continue;
        }
        totals.accumulate(&entry.nutrients, entry.portions);
        per_day
            .entry(entry.logged_at.date_naive())
            .or_default()
            .accumulate(&entry.nutrients, entry.portions);
        entry_count += 1;
    }

    let days = window.day_count() as f64;
    let daily_average = totals.scaled(1.0 / days);
    let macros = macro_split(totals.protein_g, totals.carbs_g, totals.fat_g);

    WindowSummary {
        totals,
        entry_count,
        per_day,
        daily_average,
        macros,
    }
}

/// Consumed-versus-target comparison for one day's window. `deviation`
/// is signed: positive means over target, negative under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetComparison {
    pub target_kcal: f64,
    pub consumed_kcal: f64,
    pub deviation_kcal: f64,
}

pub fn compare_against_target(
    summary: &WindowSummary,
    target: &DailyEnergyTarget,
) -> TargetComparison {
    TargetComparison {
        target_kcal: target.target_kcal,
        consumed_kcal: summary.totals.calories,
        deviation_kcal: summary.totals.calories - target.target_kcal,
    }
}
