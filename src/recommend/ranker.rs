//! Cosine-similarity ranking of admissible candidates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recommend::vectorizer::SparseVector;

/// A candidate with its similarity score. `catalog_index` doubles as the
/// deterministic tie-break key (catalog insertion order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub catalog_index: usize,
    pub score: f32,
}

/// Cosine similarity: dot product over the product of L2 norms.
/// Defined as 0 when either vector is the zero vector.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let norms = a.norm() * b.norm();
    if norms == 0.0 {
        return 0.0;
    }
    a.dot(b) / norms
}

fn by_score_then_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.catalog_index.cmp(&b.catalog_index))
}

/// Scores each `(catalog_index, vector)` candidate against the query and
/// returns the top `k`, ordered by score descending with ties broken by
/// catalog insertion order. Read-only and repeatable: identical inputs
/// produce an identical ordering.
pub fn rank(
    candidates: &[(usize, &SparseVector)],
    query: &SparseVector,
    k: usize,
) -> Result<Vec<ScoredCandidate>> {
    if k == 0 {
        return Err(Error::InvalidK);
    }

    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|&(catalog_index, vector)| ScoredCandidate {
            catalog_index,
            score: cosine_similarity(vector, query),
        })
        .collect();

    scored.sort_by(by_score_then_order);
    scored.truncate(k);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::meal;
    use crate::catalog::MealCatalog;
    use crate::recommend::vectorizer::Vocabulary;

    fn vectors(rows: &[(&str, &str)]) -> (Vocabulary, Vec<SparseVector>) {
        let catalog = MealCatalog::new(
            rows
                .iter()
                .map(|(id, ingredients)| meal(id, ingredients))
                .collect(),
        )
        .unwrap();
        let vocab = Vocabulary::build(&catalog);
        let docs = catalog
            .meals()
            .iter()
            .map(|m| vocab.document_vector(m))
            .collect();
        (vocab, docs)
    }

    #[test]
    fn zero_k_is_rejected() {
        let (vocab, docs) = vectors(&[("a", "tofu")]);
        let query = vocab.query_vector(&["tofu"]);
        let candidates: Vec<_> = docs.iter().enumerate().map(|(i, v)| (i, v)).collect();
        assert!(matches!(rank(&candidates, &query, 0), Err(Error::InvalidK)));
    }

    #[test]
    fn exact_match_outranks_disjoint_meal() {
        // Meal a shares nothing with the query, meal b is an exact match.
        let (vocab, docs) = vectors(&[("a", "beef rice"), ("b", "tofu broccoli ginger")]);
        let query = vocab.query_vector(&["tofu", "broccoli", "ginger"]);
        let candidates: Vec<_> = docs.iter().enumerate().map(|(i, v)| (i, v)).collect();

        let ranked = rank(&candidates, &query, 2).unwrap();
        assert_eq!(ranked[0].catalog_index, 1);
        assert!((ranked[0].score - 1.0).abs() < 1e-5);
        assert_eq!(ranked[1].catalog_index, 0);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn scores_stay_within_bounds() {
        let (vocab, docs) = vectors(&[
            ("a", "tofu broccoli rice ginger"),
            ("b", "rice beans corn"),
            ("c", "kale quinoa tofu"),
        ]);
        let query = vocab.query_vector(&["tofu", "rice"]);
        let candidates: Vec<_> = docs.iter().enumerate().map(|(i, v)| (i, v)).collect();
        for c in rank(&candidates, &query, 3).unwrap() {
            assert!((-1.0..=1.0).contains(&c.score), "score {}", c.score);
        }
    }

    #[test]
    fn ties_break_by_catalog_order() {
        // Two identical meals tie exactly; the earlier one must win.
        let (vocab, docs) = vectors(&[("late", "tofu"), ("later", "tofu")]);
        let query = vocab.query_vector(&["tofu"]);
        // Present candidates in reverse to prove sorting ignores input order.
        let candidates: Vec<_> = vec![(1, &docs[1]), (0, &docs[0])];
        let ranked = rank(&candidates, &query, 2).unwrap();
        assert_eq!(ranked[0].catalog_index, 0);
        assert_eq!(ranked[1].catalog_index, 1);
    }

    #[test]
    fn ranking_is_deterministic_across_calls() {
        let (vocab, docs) = vectors(&[
            ("a", "tofu broccoli"),
            ("b", "rice tofu"),
            ("c", "beans kale"),
            ("d", "tofu rice broccoli"),
        ]);
        let query = vocab.query_vector(&["tofu", "rice"]);
        let candidates: Vec<_> = docs.iter().enumerate().map(|(i, v)| (i, v)).collect();

        let first = rank(&candidates, &query, 4).unwrap();
        for _ in 0..10 {
            assert_eq!(rank(&candidates, &query, 4).unwrap(), first);
        }
    }

    #[test]
    fn zero_query_scores_everything_zero() {
        let (vocab, docs) = vectors(&[("a", "tofu"), ("b", "rice")]);
        let query = vocab.query_vector(&["durian"]);
        assert!(query.is_zero());
        let candidates: Vec<_> = docs.iter().enumerate().map(|(i, v)| (i, v)).collect();
        let ranked = rank(&candidates, &query, 2).unwrap();
        assert!(ranked.iter().all(|c| c.score == 0.0));
        // Still ordered by insertion order.
        assert_eq!(ranked[0].catalog_index, 0);
    }

    #[test]
    fn k_larger_than_pool_returns_whole_pool() {
        let (vocab, docs) = vectors(&[("a", "tofu"), ("b", "rice")]);
        let query = vocab.query_vector(&["tofu"]);
        let candidates: Vec<_> = docs.iter().enumerate().map(|(i, v)| (i, v)).collect();
        assert_eq!(rank(&candidates, &query, 10).unwrap().len(), 2);
    }
}
