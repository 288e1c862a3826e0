//! Hard-constraint filtering ahead of similarity scoring.
//!
//! Allergen exclusions are never relaxed, even when they empty the
//! candidate pool; the caller owns any degradation policy.

use std::collections::BTreeSet;

use crate::catalog::{MealCatalog, MealRecord};
use crate::error::{Error, Result};
use crate::profile::UserProfile;

fn lowered(set: &BTreeSet<String>) -> BTreeSet<String> {
    set.iter().map(|s| s.trim().to_lowercase()).collect()
}

/// Whether a single meal passes every hard constraint in the profile.
/// All comparisons are case-insensitive.
pub fn is_admissible(meal: &MealRecord, profile: &UserProfile) -> bool {
    let meal_allergens = lowered(&meal.allergens);
    let user_allergens = lowered(&profile.allergens);
    if meal_allergens.intersection(&user_allergens).next().is_some() {
        return false;
    }

    let meal_tags = lowered(&meal.dietary_tags);
    let required = lowered(&profile.dietary_restrictions);
    if !required.iter().all(|tag| meal_tags.contains(tag)) {
        return false;
    }

    let ingredients = meal.ingredients.to_lowercase();
    if profile
        .excluded_ingredients
        .iter()
        .map(|i| i.trim().to_lowercase())
        .any(|excluded| !excluded.is_empty() && ingredients.contains(&excluded))
    {
        return false;
    }

    true
}

/// Indices of catalog meals passing all hard constraints, in catalog
/// order. Fails with [`Error::NoAdmissibleMeals`] when nothing survives.
pub fn admissible_meals(catalog: &MealCatalog, profile: &UserProfile) -> Result<Vec<usize>> {
    let admissible: Vec<usize> = catalog
        .meals()
        .iter()
        .enumerate()
        .filter(|(_, meal)| is_admissible(meal, profile))
        .map(|(index, _)| index)
        .collect();

    if admissible.is_empty() {
        return Err(Error::NoAdmissibleMeals);
    }
    Ok(admissible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::meal;
    use crate::profile::{ActivityLevel, Goal, Sex};

    fn profile() -> UserProfile {
        UserProfile {
            sex: Sex::Female,
            age_years: 30.0,
            height_cm: 165.0,
            weight_kg: 65.0,
            activity: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
            dietary_restrictions: BTreeSet::new(),
            allergens: BTreeSet::new(),
            excluded_ingredients: BTreeSet::new(),
            preferred_cuisines: BTreeSet::new(),
        }
    }

    fn tagged(id: &str, allergens: &[&str], tags: &[&str]) -> crate::catalog::MealRecord {
        let mut m = meal(id, "base ingredients");
        m.allergens = allergens.iter().map(|s| s.to_string()).collect();
        m.dietary_tags = tags.iter().map(|s| s.to_string()).collect();
        m
    }

    #[test]
    fn allergen_overlap_excludes_meal() {
        // peanut-allergic user, one meal tagged {peanut, soy}, one {soy}.
        let catalog = MealCatalog::new(vec![
            tagged("satay", &["peanut", "soy"], &[]),
            tagged("tofu-bowl", &["soy"], &[]),
        ])
        .unwrap();
        let mut user = profile();
        user.allergens.insert("peanut".to_string());

        let admissible = admissible_meals(&catalog, &user).unwrap();
        assert_eq!(admissible, vec![1]);
    }

    #[test]
    fn declared_restrictions_must_all_be_carried() {
        let catalog = MealCatalog::new(vec![
            tagged("a", &[], &["vegan", "gluten-free"]),
            tagged("b", &[], &["vegan"]),
            tagged("c", &[], &[]),
        ])
        .unwrap();
        let mut user = profile();
        user.dietary_restrictions.insert("vegan".to_string());
        user.dietary_restrictions.insert("gluten-free".to_string());

        assert_eq!(admissible_meals(&catalog, &user).unwrap(), vec![0]);
    }

    #[test]
    fn tag_matching_is_case_insensitive() {
        let catalog = MealCatalog::new(vec![tagged("a", &["Peanut"], &[])]).unwrap();
        let mut user = profile();
        user.allergens.insert("PEANUT".to_string());
        assert!(matches!(
            admissible_meals(&catalog, &user),
            Err(Error::NoAdmissibleMeals)
        ));
    }

    #[test]
    fn excluded_ingredient_matches_ingredient_text() {
        let with_cilantro = meal("a", "rice beans cilantro lime");
        let without = meal("b", "rice beans lime");
        let catalog = MealCatalog::new(vec![with_cilantro, without]).unwrap();
        let mut user = profile();
        user.excluded_ingredients.insert("Cilantro".to_string());

        assert_eq!(admissible_meals(&catalog, &user).unwrap(), vec![1]);
    }

    #[test]
    fn empty_admissible_set_is_an_error_not_a_fallback() {
        let catalog = MealCatalog::new(vec![tagged("a", &["peanut"], &[])]).unwrap();
        let mut user = profile();
        user.allergens.insert("peanut".to_string());
        assert!(matches!(
            admissible_meals(&catalog, &user),
            Err(Error::NoAdmissibleMeals)
        ));
    }

    #[test]
    fn no_constraints_admits_everything() {
        let catalog =
            MealCatalog::new(vec![tagged("a", &["peanut"], &[]), tagged("b", &[], &[])]).unwrap();
        assert_eq!(admissible_meals(&catalog, &profile()).unwrap(), vec![0, 1]);
    }

    #[test]
    fn output_never_intersects_user_allergens() {
        // Randomized catalogs: the admissible set must never contain a
        // meal sharing an allergen with the user.
        use rand::prelude::*;
        let mut rng = StdRng::seed_from_u64(42);
        let pool = ["peanut", "soy", "dairy", "egg", "shellfish", "wheat"];

        for _ in 0..50 {
            let meals: Vec<_> = (0..20)
                .map(|i| {
                    let allergens: Vec<&str> = pool
                        .iter()
                        .copied()
                        .filter(|_| rng.gen_bool(0.3))
                        .collect();
                    tagged(&format!("m{i}"), &allergens, &[])
                })
                .collect();
            let catalog = MealCatalog::new(meals).unwrap();

            let mut user = profile();
            for allergen in pool.iter().filter(|_| rng.gen_bool(0.3)) {
                user.allergens.insert(allergen.to_string());
            }

            match admissible_meals(&catalog, &user) {
                Ok(admissible) => {
                    for index in admissible {
                        let meal = catalog.get(index).unwrap();
                        assert!(meal
                            .allergens
                            .intersection(&user.allergens)
                            .next()
                            .is_none());
                    }
                }
                Err(Error::NoAdmissibleMeals) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }
}
