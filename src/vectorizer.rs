//! TF-IDF vectorizer: vocabulary selection, smoothed IDF, L2-normalized rows.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sparse::{CsrMatrix, SparseVector};
use crate::text::tokenize;

/// Vocabulary cap used by the model builder.
pub const DEFAULT_MAX_FEATURES: usize = 20_000;

/// Errors raised while fitting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VectorizeError {
    /// No documents were supplied.
    #[error("cannot fit a vectorizer on an empty corpus")]
    EmptyCorpus,
    /// Every token was a stop word or too short.
    #[error("empty vocabulary; corpus contains only stop words")]
    EmptyVocabulary,
    /// A zero vocabulary cap was requested.
    #[error("max_features must be at least 1")]
    ZeroMaxFeatures,
}

/// Fitted text-to-sparse-vector transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns vocabulary and IDF weights from `documents` in a single pass.
    ///
    /// When more than `max_features` terms survive stop-word removal, the most
    /// frequent terms across the corpus are kept (ties broken alphabetically).
    /// Column indices follow alphabetical term order.
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Result<Self, VectorizeError> {
        if max_features == 0 {
            return Err(VectorizeError::ZeroMaxFeatures);
        }
        if documents.is_empty() {
            return Err(VectorizeError::EmptyCorpus);
        }

        let mut term_count: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            for (term, count) in count_terms(doc.as_ref()) {
                *term_count.entry(term.clone()).or_insert(0) += count;
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }
        if term_count.is_empty() {
            return Err(VectorizeError::EmptyVocabulary);
        }

        let mut ranked: Vec<(String, usize)> = term_count.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);
        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n_docs = documents.len() as f64;
        let idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        Ok(Self {
            max_features,
            vocabulary,
            idf,
        })
    }

    /// Fits on `documents` and returns the vectorizer with the transformed corpus.
    pub fn fit_transform<S: AsRef<str>>(
        documents: &[S],
        max_features: usize,
    ) -> Result<(Self, CsrMatrix), VectorizeError> {
        let vectorizer = Self::fit(documents, max_features)?;
        let matrix = vectorizer.transform_many(documents);
        Ok((vectorizer, matrix))
    }

    /// Maps one document into the fitted space. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut weights: Vec<(usize, f64)> = count_terms(document)
            .into_iter()
            .filter_map(|(term, count)| {
                let idx = *self.vocabulary.get(&term)?;
                let idf = *self.idf.get(idx)?;
                Some((idx, count as f64 * idf))
            })
            .collect();
        weights.sort_by_key(|(idx, _)| *idx);
        let mut vector = SparseVector::from_sorted(weights);
        vector.l2_normalize();
        vector
    }

    /// Transforms every document into one matrix row, preserving order.
    pub fn transform_many<S: AsRef<str>>(&self, documents: &[S]) -> CsrMatrix {
        CsrMatrix::from_rows(
            self.vocabulary_len(),
            documents.iter().map(|doc| self.transform(doc.as_ref())),
        )
    }

    /// Number of dimensions.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of `term`, if it was kept.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF weight per column.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Whether vocabulary and IDF weights agree after deserialization.
    ///
    /// Column indices must cover `0..len` exactly once each.
    pub fn is_consistent(&self) -> bool {
        let len = self.vocabulary.len();
        let distinct: HashSet<usize> = self.vocabulary.values().copied().collect();
        self.idf.len() == len
            && len <= self.max_features
            && distinct.len() == len
            && distinct.iter().all(|&idx| idx < len)
    }
}

fn count_terms(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}
