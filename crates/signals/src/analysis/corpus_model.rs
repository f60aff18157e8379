//! TF-IDF term weighting over a bounded vocabulary.
//!
//! A `CorpusModel` starts `Unfit`. `fit` selects at most `max_features`
//! terms from a corpus and computes their inverse document frequencies,
//! moving the model to `Fitted`. Projection (`transform`) is only possible
//! in the `Fitted` state; in the `Unfit` state it returns
//! `ModelError::NotFitted` and leaves the model untouched.
//!
//! Weighting:
//! - idf(t) = ln((1 + n) / (1 + df(t))) + 1, with n documents in the fit corpus
//! - weight(d, t) = count(d, t) * idf(t), each row L2-normalized

use super::tokenizer::tokenize;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// Default vocabulary size cap.
pub const DEFAULT_MAX_FEATURES: usize = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Projection requested before the model was fitted.
    #[error("corpus model is not fitted; call fit() first")]
    NotFitted,

    /// The fit corpus contained no usable terms.
    #[error("empty vocabulary: corpus contains only stop words or no words at all")]
    EmptyVocabulary,

    #[error("max_features must be at least 1")]
    InvalidMaxFeatures,
}

/// Configuration for [`CorpusModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusModelConfig {
    /// Upper bound on vocabulary size
    pub max_features: usize,
}

impl Default for CorpusModelConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl CorpusModelConfig {
    #[must_use]
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }
}

/// Dense row-major matrix of term weights: one row per text, one column per
/// vocabulary term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TermMatrix {
    /// Creates a zero-filled matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from row vectors.
    ///
    /// Returns `None` if the rows differ in length.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns row `index`.
    ///
    /// # Panics
    /// Panics if `index >= n_rows()`.
    #[must_use]
    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// Iterates over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    fn row_mut(&mut self, index: usize) -> &mut [f64] {
        &mut self.data[index * self.cols..(index + 1) * self.cols]
    }
}

/// Vocabulary and weights produced by a successful fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedVocabulary {
    /// Selected terms in lexical order; position = column index
    terms: Vec<String>,
    /// Column index per term
    index: HashMap<String, usize>,
    /// Inverse document frequency per column
    idf: Vec<f64>,
    /// Documents in the fit corpus
    n_documents: usize,
}

impl FittedVocabulary {
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Column index of `term`, if it is in the vocabulary.
    #[must_use]
    pub fn column(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }
}

/// Lifecycle of a corpus model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelState {
    #[default]
    Unfit,
    Fitted(FittedVocabulary),
}

/// Bag-of-terms TF-IDF model.
#[derive(Debug, Clone, Default)]
pub struct CorpusModel {
    config: CorpusModelConfig,
    state: ModelState,
}

impl CorpusModel {
    /// Creates an unfit model.
    #[must_use]
    pub fn new(config: CorpusModelConfig) -> Self {
        Self {
            config,
            state: ModelState::Unfit,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CorpusModelConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &ModelState {
        &self.state
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        matches!(self.state, ModelState::Fitted(_))
    }

    /// Fitted vocabulary, if any.
    #[must_use]
    pub fn vocabulary(&self) -> Option<&FittedVocabulary> {
        match &self.state {
            ModelState::Fitted(vocab) => Some(vocab),
            ModelState::Unfit => None,
        }
    }

    /// Fits the model on `corpus`, replacing any previous vocabulary.
    ///
    /// Terms are ranked by total count across the corpus; ties go to the
    /// lexically smaller term. The top `max_features` become the vocabulary,
    /// with columns in lexical order.
    ///
    /// On error the previous state is kept.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidMaxFeatures` if the cap is zero and
    /// `ModelError::EmptyVocabulary` if the corpus yields no terms.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<&FittedVocabulary, ModelError> {
        if self.config.max_features == 0 {
            return Err(ModelError::InvalidMaxFeatures);
        }

        let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for text in corpus {
            let tokens = tokenize(text.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        if term_counts.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        // BTreeMap iteration is lexical, so a stable sort on count keeps ties lexical
        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.config.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n_documents = corpus.len();
        let idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0);
                smoothed_idf(n_documents, df)
            })
            .collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        tracing::debug!(
            "Fitted corpus model on {} documents: {} terms (cap {})",
            n_documents,
            terms.len(),
            self.config.max_features
        );

        self.state = ModelState::Fitted(FittedVocabulary {
            terms,
            index,
            idf,
            n_documents,
        });

        self.vocabulary().ok_or(ModelError::NotFitted)
    }

    /// Projects `texts` into the fitted weight space.
    ///
    /// Terms outside the vocabulary contribute zero; a text with no known
    /// terms becomes an all-zero row.
    ///
    /// # Errors
    /// Returns `ModelError::NotFitted` if `fit` has not succeeded yet.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Result<TermMatrix, ModelError> {
        let ModelState::Fitted(vocab) = &self.state else {
            return Err(ModelError::NotFitted);
        };

        let mut matrix = TermMatrix::zeros(texts.len(), vocab.len());

        for (i, text) in texts.iter().enumerate() {
            let row = matrix.row_mut(i);
            for token in tokenize(text.as_ref()) {
                if let Some(col) = vocab.column(&token) {
                    row[col] += 1.0;
                }
            }
            for (weight, idf) in row.iter_mut().zip(&vocab.idf) {
                *weight *= idf;
            }
            l2_normalize(row);
        }

        Ok(matrix)
    }

    /// Fits on `corpus` and projects the same texts.
    ///
    /// # Errors
    /// Returns any error from [`CorpusModel::fit`].
    pub fn fit_transform<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<TermMatrix, ModelError> {
        self.fit(corpus)?;
        self.transform(corpus)
    }
}

fn smoothed_idf(n_documents: usize, df: usize) -> f64 {
    ((1.0 + n_documents as f64) / (1.0 + df as f64)).ln() + 1.0
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in row.iter_mut() {
            *w /= norm;
        }
    }
}
