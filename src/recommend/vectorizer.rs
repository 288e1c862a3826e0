//! TF-IDF feature vectorization over the catalog vocabulary.
//!
//! The vocabulary and idf statistics are computed once per catalog load
//! and reused read-only for every document and query vector afterwards;
//! vectors built from different vocabularies are not comparable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{MealCatalog, MealRecord};

type Float = f32;

/// Lower-cases and splits on non-alphanumeric characters, dropping
/// empty fragments.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sparse term-index -> weight vector, entries sorted by term index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, Float)>,
}

impl SparseVector {
    fn from_weights(mut entries: Vec<(usize, Float)>) -> Self {
        entries.sort_by_key(|(idx, _)| *idx);
        Self { entries }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(usize, Float)] {
        &self.entries
    }

    pub fn norm(&self) -> Float {
        self.entries
            .iter()
            .map(|(_, w)| w * w)
            .sum::<Float>()
            .sqrt()
    }

    /// Dot product via a merge walk over the sorted entries.
    pub fn dot(&self, other: &SparseVector) -> Float {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Scales to unit length. A zero vector stays zero.
    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }
}

/// Term -> index map plus idf statistics for one catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    term_indices: HashMap<String, usize>,
    idf: Vec<Float>,
    document_count: usize,
}

impl Vocabulary {
    /// Scans the catalog once, assigning term indices in first-appearance
    /// order and computing smoothed idf:
    ///
    ///   idf(t) = ln((1 + N) / (1 + df(t))) + 1
    ///
    /// The +1 smoothing keeps terms present in every document at a small
    /// positive weight instead of vanishing.
    pub fn build(catalog: &MealCatalog) -> Self {
        let mut term_indices: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for meal in catalog.meals() {
            let mut seen_in_doc = Vec::new();
            for token in tokenize(&meal.feature_text()) {
                let next_index = term_indices.len();
                let index = *term_indices.entry(token).or_insert(next_index);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if !seen_in_doc.contains(&index) {
                    seen_in_doc.push(index);
                    document_frequency[index] += 1;
                }
            }
        }

        let n = catalog.len();
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n as Float) / (1.0 + df as Float)).ln() + 1.0)
            .collect();

        Self {
            term_indices,
            idf,
            document_count: n,
        }
    }

    pub fn len(&self) -> usize {
        self.term_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_indices.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// TF-IDF vector for one meal, L2-normalized.
    pub fn document_vector(&self, meal: &MealRecord) -> SparseVector {
        self.vector_from_tokens(tokenize(&meal.feature_text()))
    }

    /// TF-IDF vector for a query built from user preference terms, using
    /// the same idf statistics as the document vectors. Terms absent from
    /// the vocabulary are dropped, not an error.
    pub fn query_vector<S: AsRef<str>>(&self, terms: &[S]) -> SparseVector {
        let tokens = terms
            .iter()
            .flat_map(|t| tokenize(t.as_ref()))
            .collect::<Vec<_>>();
        self.vector_from_tokens(tokens)
    }

    fn vector_from_tokens(&self, tokens: Vec<String>) -> SparseVector {
        let mut term_counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            if let Some(&index) = self.term_indices.get(&token) {
                *term_counts.entry(index).or_insert(0) += 1;
            }
        }
        let weights = term_counts
            .into_iter()
            .map(|(index, count)| (index, count as Float * self.idf[index]))
            .collect();
        SparseVector::from_weights(weights).normalized()
    }
}
