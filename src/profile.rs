use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(Error::InvalidBiometrics(format!("unknown sex '{other}'"))),
        }
    }
}

/// Activity level of the user. The TDEE multiplier attached to each
/// variant lives in [`crate::energy`] and is part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" | "light" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" | "moderate" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extremely_active" | "extreme" => Ok(ActivityLevel::ExtremelyActive),
            other => Err(Error::InvalidActivityLevel(other.to_string())),
        }
    }
}

/// Weight goal of the user. The calorie adjustment attached to each
/// variant lives in [`crate::energy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            other => Err(Error::InvalidGoal(other.to_string())),
        }
    }
}

/// Biometrics and preferences for a single user.
///
/// Owned by the profile store; the core receives it by value and never
/// reads ambient session state. `allergens` and `dietary_restrictions`
/// are hard constraints, `preferred_cuisines` is a soft preference that
/// only shapes the query vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub sex: Sex,
    pub age_years: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    #[serde(default)]
    pub excluded_ingredients: BTreeSet<String>,
    #[serde(default)]
    pub preferred_cuisines: BTreeSet<String>,
}

impl UserProfile {
    /// Checks the biometric invariants: weight, height, and age must be
    /// positive finite numbers.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("weight_kg", self.weight_kg),
            ("height_cm", self.height_cm),
            ("age_years", self.age_years),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidBiometrics(format!(
                    "{label} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_profile() -> UserProfile {
        UserProfile {
            sex: Sex::Female,
            age_years: 30.0,
            height_cm: 165.0,
            weight_kg: 65.0,
            activity: ActivityLevel::Sedentary,
            goal: Goal::Lose,
            dietary_restrictions: BTreeSet::new(),
            allergens: BTreeSet::new(),
            excluded_ingredients: BTreeSet::new(),
            preferred_cuisines: BTreeSet::new(),
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(base_profile().validate().is_ok());
    }

    #[test]
    fn non_positive_biometrics_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut profile = base_profile();
            profile.weight_kg = bad;
            assert!(matches!(
                profile.validate(),
                Err(Error::InvalidBiometrics(_))
            ));
        }
    }

    #[test]
    fn enum_parsing_round_trip() {
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(
            "moderately_active".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::ModeratelyActive
        );
        assert_eq!("gain".parse::<Goal>().unwrap(), Goal::Gain);
    }

    #[test]
    fn unknown_goal_is_invalid_goal() {
        assert!(matches!(
            "bulk".parse::<Goal>(),
            Err(Error::InvalidGoal(g)) if g == "bulk"
        ));
    }

    #[test]
    fn unknown_activity_is_invalid_activity() {
        assert!(matches!(
            "couch".parse::<ActivityLevel>(),
            Err(Error::InvalidActivityLevel(_))
        ));
    }
}
