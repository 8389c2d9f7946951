//! Filename search ranked by cosine similarity over stem tokens.
//!
//! This is lexical bag-of-words matching, not embedding search; a query only
//! hits files that share literal filename words with it.

use crate::tokenize;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

type TokenVector = BTreeMap<String, u32>;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub path: PathBuf,
    pub score: f64,
}

/// Token-frequency index over filename stems, rebuilt wholesale on each
/// [`build`](Self::build).
#[derive(Debug, Default)]
pub struct FilenameSearchIndex {
    paths: Vec<PathBuf>,
    vectors: Vec<TokenVector>,
}

impl FilenameSearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Replaces the index with vectors derived from each path's stem.
    pub fn build(&mut self, paths: Vec<PathBuf>) {
        self.vectors = paths.iter().map(|p| stem_vector(p)).collect();
        self.paths = paths;
    }

    /// Ranks indexed files against the query, descending by cosine score.
    /// Ties keep insertion order (stable sort). At most `top_k` results,
    /// all with strictly positive scores.
    pub fn query(&self, text: &str, top_k: usize) -> Vec<SearchResult> {
        let query = token_vector(text);
        let mut scored: Vec<(usize, f64)> = self
            .vectors
            .iter()
            .map(|v| cosine(&query, v))
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored
            .into_iter()
            .take(top_k)
            .filter(|(_, score)| *score > 0.0)
            .map(|(i, score)| SearchResult {
                path: self.paths[i].clone(),
                score,
            })
            .collect()
    }
}

fn token_vector(text: &str) -> TokenVector {
    let mut vector = TokenVector::new();
    for token in tokenize::tokens(text) {
        *vector.entry(token).or_insert(0) += 1;
    }
    vector
}

fn stem_vector(path: &Path) -> TokenVector {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    token_vector(stem)
}

fn cosine(a: &TokenVector, b: &TokenVector) -> f64 {
    let dot: u64 = a
        .iter()
        .filter_map(|(token, &va)| b.get(token).map(|&vb| u64::from(va) * u64::from(vb)))
        .sum();
    let norm = |v: &TokenVector| {
        v.values()
            .map(|&x| f64::from(x) * f64::from(x))
            .sum::<f64>()
            .sqrt()
    };
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot as f64 / (na * nb)
}
