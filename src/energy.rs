//! Energy model: BMR, TDEE, and daily calorie targets.
//!
//! All functions here are pure. The activity multipliers, goal
//! adjustments, meal-slot shares, and Atwater factors are contract
//! constants: changing any of them is a behavior change, not a bug fix.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::{ActivityLevel, Goal, Sex, UserProfile};

/// Calorie adjustment applied on top of TDEE for each goal (kcal/day).
pub const LOSE_ADJUSTMENT_KCAL: f64 = -500.0;
pub const MAINTAIN_ADJUSTMENT_KCAL: f64 = 0.0;
pub const GAIN_ADJUSTMENT_KCAL: f64 = 500.0;

/// Atwater energy factors (kcal per gram).
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Basal Metabolic Rate via the Mifflin-St Jeor equation, in kcal/day.
///
/// male:   10*weight + 6.25*height - 5*age + 5
/// female: 10*weight + 6.25*height - 5*age - 161
pub fn basal_metabolic_rate(
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
) -> Result<f64> {
    for (label, value) in [
        ("weight_kg", weight_kg),
        ("height_cm", height_cm),
        ("age_years", age_years),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidBiometrics(format!(
                "{label} must be a positive finite number, got {value}"
            )));
        }
    }

    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    Ok(match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    })
}

/// Fixed TDEE multiplier for an activity level.
pub fn activity_multiplier(activity: ActivityLevel) -> f64 {
    match activity {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::LightlyActive => 1.375,
        ActivityLevel::ModeratelyActive => 1.55,
        ActivityLevel::VeryActive => 1.725,
        ActivityLevel::ExtremelyActive => 1.9,
    }
}

/// Total Daily Energy Expenditure: BMR scaled by the activity multiplier.
pub fn total_daily_energy_expenditure(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity_multiplier(activity)
}

/// Daily calorie target: TDEE plus the goal adjustment.
pub fn daily_calorie_target(tdee: f64, goal: Goal) -> f64 {
    let adjustment = match goal {
        Goal::Lose => LOSE_ADJUSTMENT_KCAL,
        Goal::Maintain => MAINTAIN_ADJUSTMENT_KCAL,
        Goal::Gain => GAIN_ADJUSTMENT_KCAL,
    };
    tdee + adjustment
}

/// Daily calorie target together with the inputs used to derive it.
///
/// Recomputed whenever the profile's biometrics change; never cached
/// across profile edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEnergyTarget {
    pub bmr: f64,
    pub tdee: f64,
    pub target_kcal: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

impl DailyEnergyTarget {
    pub fn for_profile(profile: &UserProfile) -> Result<Self> {
        let bmr = basal_metabolic_rate(
            profile.sex,
            profile.weight_kg,
            profile.height_cm,
            profile.age_years,
        )?;
        let tdee = total_daily_energy_expenditure(bmr, profile.activity);
        let target_kcal = daily_calorie_target(tdee, profile.goal);
        Ok(Self {
            bmr,
            tdee,
            target_kcal,
            activity: profile.activity,
            goal: profile.goal,
        })
    }
}

/// Position of a meal within the day, carrying its share of the daily
/// calorie target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Share of the daily target allotted to this slot.
    /// Breakfast 25%, lunch 35%, dinner 35%, snack 5%.
    pub fn share(self) -> f64 {
        match self {
            MealSlot::Breakfast => 0.25,
            MealSlot::Lunch => 0.35,
            MealSlot::Dinner => 0.35,
            MealSlot::Snack => 0.05,
        }
    }

    /// Calorie target for this slot given the daily target.
    pub fn calorie_share(self, daily_target_kcal: f64) -> f64 {
        daily_target_kcal * self.share()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealSlot::Breakfast),
            "lunch" => Some(MealSlot::Lunch),
            "dinner" => Some(MealSlot::Dinner),
            "snack" => Some(MealSlot::Snack),
            _ => None,
        }
    }
}

/// Macronutrient calorie percentages derived from gram amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

/// Percentage of calories contributed by each macronutrient, using the
/// Atwater factors. All-zero input yields an all-zero split.
pub fn macro_split(protein_g: f64, carbs_g: f64, fat_g: f64) -> MacroSplit {
    let protein_kcal = protein_g * KCAL_PER_G_PROTEIN;
    let carbs_kcal = carbs_g * KCAL_PER_G_CARBS;
    let fat_kcal = fat_g * KCAL_PER_G_FAT;
    let total = protein_kcal + carbs_kcal + fat_kcal;
    if total == 0.0 {
        return MacroSplit::default();
    }
    MacroSplit {
        protein_pct: protein_kcal / total * 100.0,
        carbs_pct: carbs_kcal / total * 100.0,
        fat_pct: fat_kcal / total * 100.0,
    }
}
