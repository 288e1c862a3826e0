use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::profile::UserProfile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank catalog meals against the user's preferences
    Recommend {
        /// Path to the meal catalog CSV
        #[arg(long)]
        catalog: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Tags of recently eaten meals, folded into the query
        #[arg(long = "recent")]
        recent_terms: Vec<String>,

        /// Restrict candidates to one slot (breakfast/lunch/dinner/snack)
        #[arg(long)]
        slot: Option<String>,

        /// Number of recommendations to return
        #[arg(short = 'k', long, default_value_t = 5)]
        top: usize,
    },

    /// Compute BMR, TDEE, and the daily calorie target
    Energy {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// List admissible meals preparable within a time budget
    QuickMeals {
        /// Path to the meal catalog CSV
        #[arg(long)]
        catalog: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Maximum preparation time in minutes
        #[arg(long, default_value_t = 15)]
        max_minutes: u32,

        /// Maximum number of meals to list
        #[arg(long, default_value_t = 6)]
        limit: usize,
    },
}

/// User profile fields shared by every subcommand.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// male or female
    #[arg(long)]
    pub sex: String,

    #[arg(long)]
    pub age: f64,

    #[arg(long)]
    pub height_cm: f64,

    #[arg(long)]
    pub weight_kg: f64,

    /// sedentary, lightly_active, moderately_active, very_active,
    /// or extremely_active
    #[arg(long, default_value = "sedentary")]
    pub activity: String,

    /// lose, maintain, or gain
    #[arg(long, default_value = "maintain")]
    pub goal: String,

    /// Required dietary tags, e.g. --restrict vegan (repeatable)
    #[arg(long = "restrict")]
    pub dietary_restrictions: Vec<String>,

    /// Allergen tags to exclude, e.g. --allergen peanut (repeatable)
    #[arg(long = "allergen")]
    pub allergens: Vec<String>,

    /// Ingredient terms to exclude (repeatable)
    #[arg(long = "exclude")]
    pub excluded_ingredients: Vec<String>,

    /// Preferred cuisine tags shaping the query (repeatable)
    #[arg(long = "prefer")]
    pub preferred_cuisines: Vec<String>,
}

impl ProfileArgs {
    pub fn to_profile(&self) -> Result<UserProfile> {
        let profile = UserProfile {
            sex: self.sex.parse()?,
            age_years: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity: self.activity.parse()?,
            goal: self.goal.parse()?,
            dietary_restrictions: self.dietary_restrictions.iter().cloned().collect(),
            allergens: self.allergens.iter().cloned().collect(),
            excluded_ingredients: self.excluded_ingredients.iter().cloned().collect(),
            preferred_cuisines: self.preferred_cuisines.iter().cloned().collect(),
        };
        profile.validate()?;
        Ok(profile)
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
