//! TF-IDF vectorization of item text
//!
//! Tokens are runs of two or more word characters, lower-cased, with English
//! stop words removed before n-grams are formed. Document frequency pruning,
//! a vocabulary cap by corpus frequency, smoothed IDF and L2-normalised rows.

use niche_core::{NicheCoreError, Result};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::keywords::stopwords::is_english_stop_word;

/// Dense TF-IDF matrix, one row per document
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    /// Terms in column order (alphabetical)
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfIdfMatrix {
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// The `n` highest-weighted terms of `vector` (a row or a centroid).
    /// Equal weights keep column order.
    pub fn top_terms(&self, vector: &[f64], n: usize) -> Vec<String> {
        let mut indices: Vec<usize> = (0..vector.len().min(self.vocabulary.len())).collect();
        indices.sort_by(|&a, &b| {
            vector[b]
                .partial_cmp(&vector[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices
            .into_iter()
            .take(n)
            .map(|i| self.vocabulary[i].clone())
            .collect()
    }
}

/// TF-IDF vectorizer over unigrams and bigrams
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// Vocabulary cap, keeping the most frequent terms across the corpus
    pub max_features: usize,

    /// A term must appear in at least this many documents
    pub min_df: usize,

    /// A term may appear in at most this share of documents
    pub max_df: f64,

    /// Largest n-gram length
    pub max_ngram: usize,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self {
            max_features: 1000,
            min_df: 2,
            max_df: 0.8,
            max_ngram: 2,
        }
    }
}

impl TfIdfVectorizer {
    pub fn new(max_features: usize, min_df: usize, max_df: f64) -> Self {
        Self {
            max_features,
            min_df,
            max_df,
            max_ngram: 2,
        }
    }

    /// Learn the vocabulary from `documents` and return their TF-IDF rows.
    ///
    /// Fails with `VectorizationFailure` when pruning leaves no terms.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<TfIdfMatrix> {
        let n_docs = documents.len();
        if n_docs == 0 {
            return Err(NicheCoreError::VectorizationFailure(
                "no documents to vectorize".into(),
            ));
        }

        let term_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| count_ngrams(&tokenize(doc.as_ref()), self.max_ngram))
            .collect();

        // Document and corpus frequencies, keyed alphabetically
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for counts in &term_counts {
            for (term, count) in counts {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += count;
            }
        }

        let max_doc_count = (self.max_df * n_docs as f64).floor() as usize;
        if max_doc_count < self.min_df {
            return Err(NicheCoreError::VectorizationFailure(format!(
                "max_df allows {} documents, fewer than min_df {}",
                max_doc_count, self.min_df
            )));
        }

        let mut kept: Vec<(&str, usize)> = stats
            .iter()
            .filter(|(_, (df, _))| *df >= self.min_df && *df <= max_doc_count)
            .map(|(term, (_, tf))| (*term, *tf))
            .collect();

        if kept.is_empty() {
            return Err(NicheCoreError::VectorizationFailure(
                "no terms remain after document frequency pruning".into(),
            ));
        }

        if kept.len() > self.max_features {
            // Stable sort keeps alphabetical order among equal frequencies
            kept.sort_by(|a, b| b.1.cmp(&a.1));
            kept.truncate(self.max_features);
            kept.sort_by(|a, b| a.0.cmp(b.0));
        }

        let vocabulary: Vec<String> = kept.iter().map(|(term, _)| term.to_string()).collect();
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = stats.get(term.as_str()).map(|(df, _)| *df).unwrap_or(0);
                ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        let rows: Vec<Vec<f64>> = term_counts
            .iter()
            .map(|counts| {
                let mut row: Vec<f64> = vocabulary
                    .iter()
                    .zip(&idf)
                    .map(|(term, w)| counts.get(term).copied().unwrap_or(0) as f64 * w)
                    .collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        debug!(
            "TF-IDF: documents={}, candidate_terms={}, vocabulary={}",
            n_docs,
            stats.len(),
            vocabulary.len()
        );

        Ok(TfIdfMatrix { vocabulary, rows })
    }
}

/// Lower-cased runs of two or more word characters, stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2 && !is_english_stop_word(t))
        .map(String::from)
        .collect()
}

fn count_ngrams(tokens: &[String], max_ngram: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for n in 1..=max_ngram.max(1) {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|v| *v /= norm);
    }
}
