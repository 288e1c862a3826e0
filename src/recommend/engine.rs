//! Session-scoped recommendation engine.
//!
//! Built once per catalog load: the vocabulary, idf statistics, and one
//! document vector per meal are computed up front and reused read-only by
//! every subsequent call. `&self` everywhere, so one engine can serve
//! concurrent recommendation requests against the same catalog.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{MealCatalog, MealRecord};
use crate::energy::MealSlot;
use crate::error::{Error, Result};
use crate::profile::UserProfile;
use crate::recommend::filter::admissible_meals;
use crate::recommend::ranker::rank;
use crate::recommend::vectorizer::{SparseVector, Vocabulary};

/// One ranked recommendation. Plain data for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMeal {
    /// 1-based rank within the result.
    pub rank: usize,
    pub meal_id: String,
    pub catalog_index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub items: Vec<RankedMeal>,
}

pub struct Recommender {
    catalog: MealCatalog,
    vocabulary: Vocabulary,
    document_vectors: Vec<SparseVector>,
}

impl Recommender {
    /// Vectorizes the catalog. An empty catalog is allowed; it yields an
    /// empty vocabulary and every query scores zero.
    pub fn new(catalog: MealCatalog) -> Self {
        info!("building vocabulary for {} meals", catalog.len());
        let vocabulary = Vocabulary::build(&catalog);
        debug!("vocabulary size: {} terms", vocabulary.len());

        let document_vectors: Vec<SparseVector> = catalog
            .meals()
            .par_iter()
            .map(|meal| vocabulary.document_vector(meal))
            .collect();
        info!("catalog vectorized, engine ready");

        Self {
            catalog,
            vocabulary,
            document_vectors,
        }
    }

    pub fn catalog(&self) -> &MealCatalog {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Top-`k` meals for the user: hard-constraint filter, then cosine
    /// ranking against a query vector built from the preferred cuisines
    /// and `recent_terms` (tags of recently eaten meals). `slot`
    /// optionally restricts candidates to one meal slot.
    pub fn recommend(
        &self,
        profile: &UserProfile,
        recent_terms: &[String],
        slot: Option<MealSlot>,
        k: usize,
    ) -> Result<RecommendationResult> {
        profile.validate()?;
        if k == 0 {
            return Err(Error::InvalidK);
        }

        let mut admissible = admissible_meals(&self.catalog, profile)?;
        if let Some(slot) = slot {
            admissible.retain(|&i| self.catalog.meals()[i].meal_slot == Some(slot));
            if admissible.is_empty() {
                return Err(Error::NoAdmissibleMeals);
            }
        }
        debug!("{} admissible candidates", admissible.len());

        let mut query_terms: Vec<String> = profile.preferred_cuisines.iter().cloned().collect();
        query_terms.extend(recent_terms.iter().cloned());
        let query = self.vocabulary.query_vector(&query_terms);

        let candidates: Vec<(usize, &SparseVector)> = admissible
            .iter()
            .map(|&i| (i, &self.document_vectors[i]))
            .collect();
        let ranked = rank(&candidates, &query, k)?;

        Ok(RecommendationResult {
            items: ranked
                .iter()
                .enumerate()
                .map(|(position, scored)| RankedMeal {
                    rank: position + 1,
                    meal_id: self.catalog.meals()[scored.catalog_index].id.clone(),
                    catalog_index: scored.catalog_index,
                    score: scored.score,
                })
                .collect(),
        })
    }

    /// Admissible meals preparable within `max_minutes`, fastest first,
    /// capped at `limit`. Meals without a known prep time are skipped.
    /// No quick candidates is an empty list, not an error.
    pub fn quick_meals(
        &self,
        profile: &UserProfile,
        max_minutes: u32,
        limit: usize,
    ) -> Result<Vec<&MealRecord>> {
        profile.validate()?;
        let admissible = admissible_meals(&self.catalog, profile)?;

        let mut quick: Vec<(u32, usize)> = admissible
            .into_iter()
            .filter_map(|i| {
                let meal = &self.catalog.meals()[i];
                meal.prep_time_minutes
                    .filter(|&minutes| minutes <= max_minutes)
                    .map(|minutes| (minutes, i))
            })
            .collect();
        quick.sort();
        Ok(quick
            .into_iter()
            .take(limit)
            .map(|(_, i)| &self.catalog.meals()[i])
            .collect())
    }
}
