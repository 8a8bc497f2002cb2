//! Minimal TF-IDF vector space and cosine similarity over a handful of documents.
//!
//! Weighting follows the usual smoothed scheme: raw term counts, IDF of
//! `ln((1 + n) / (1 + df)) + 1`, and L2-normalised document vectors.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Tokens are runs of two or more word characters.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("empty vocabulary; the documents contain no usable terms")]
    EmptyVocabulary,

    #[error("document {0} has no terms in the shared vocabulary")]
    ZeroVector(usize),

    #[error("document index {0} is out of range")]
    NoSuchDocument(usize),
}

/// Fitted vector space: one L2-normalised weight vector per input document.
#[derive(Debug, Clone)]
pub struct TfIdfSpace {
    vectors: Vec<Vec<f64>>,
}

impl TfIdfSpace {
    pub fn fit(documents: &[&str]) -> Result<Self, SimilarityError> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

        let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
        for term in tokenized.iter().flatten() {
            vocabulary.entry(term.clone()).or_insert(0);
        }
        if vocabulary.is_empty() {
            return Err(SimilarityError::EmptyVocabulary);
        }
        // Sorted term order gives stable column indices.
        for (idx, slot) in vocabulary.values_mut().enumerate() {
            *slot = idx;
        }

        let counts: Vec<HashMap<usize, f64>> = tokenized
            .iter()
            .map(|tokens| {
                let mut tf = HashMap::new();
                for t in tokens {
                    *tf.entry(vocabulary[t]).or_insert(0.0) += 1.0;
                }
                tf
            })
            .collect();

        let mut df = vec![0.0_f64; vocabulary.len()];
        for tf in &counts {
            for &col in tf.keys() {
                df[col] += 1.0;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d)).ln() + 1.0)
            .collect();

        let vectors = counts
            .iter()
            .map(|tf| {
                let mut row = vec![0.0_f64; vocabulary.len()];
                for (&col, &count) in tf {
                    row[col] = count * idf[col];
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Ok(Self { vectors })
    }

    /// Cosine similarity between two fitted documents, in `[0, 1]`.
    pub fn cosine(&self, a: usize, b: usize) -> Result<f64, SimilarityError> {
        let va = self.vectors.get(a).ok_or(SimilarityError::NoSuchDocument(a))?;
        let vb = self.vectors.get(b).ok_or(SimilarityError::NoSuchDocument(b))?;
        if is_zero(va) {
            return Err(SimilarityError::ZeroVector(a));
        }
        if is_zero(vb) {
            return Err(SimilarityError::ZeroVector(b));
        }
        let dot: f64 = va.iter().zip(vb).map(|(x, y)| x * y).sum();
        Ok(dot.clamp(0.0, 1.0))
    }
}

/// Fits a two-document space and compares the first document with the second.
pub fn cosine_similarity(left: &str, right: &str) -> Result<f64, SimilarityError> {
    TfIdfSpace::fit(&[left, right])?.cosine(0, 1)
}

fn tokenize(doc: &str) -> Vec<String> {
    let lower = doc.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|x| *x /= norm);
    }
}

fn is_zero(row: &[f64]) -> bool {
    row.iter().all(|x| *x == 0.0)
}
