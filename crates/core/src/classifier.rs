//! Bag-of-words filename classifier.

use crate::error::{OrganizerError, Result};
use crate::tokenize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

type WordCounts = BTreeMap<String, u32>;

/// A tiny bag-of-words scorer mapping filename tokens to a category label.
///
/// Labels live in a `BTreeMap`, so prediction ties resolve to the lexically
/// first label regardless of training order.
#[derive(Debug, Clone, Default)]
pub struct FilenameClassifier {
    label_word_counts: Option<BTreeMap<String, WordCounts>>,
}

impl FilenameClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exemplar (filename, label) rows used when no training data is supplied.
    pub fn default_training_rows() -> Vec<(&'static str, &'static str)> {
        vec![
            ("resume_final", "documents"),
            ("invoice_january", "documents"),
            ("project_notes_ml", "documents"),
            ("family_trip_photo", "images"),
            ("profile_pic", "images"),
            ("vacation_video", "videos"),
            ("lecture_recording", "videos"),
            ("main_app_py", "code"),
            ("frontend_component", "code"),
            ("backup_archive", "archives"),
            ("dataset_zip", "archives"),
        ]
    }

    pub fn is_trained(&self) -> bool {
        self.label_word_counts.is_some()
    }

    /// Accumulates per-label token counts from (filename, label) rows.
    pub fn train(&mut self, rows: &[(&str, &str)]) {
        let mut bag: BTreeMap<String, WordCounts> = BTreeMap::new();
        for (filename, label) in rows {
            let counts = bag.entry((*label).to_string()).or_default();
            for token in tokenize::tokens(filename) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
        self.label_word_counts = Some(bag);
    }

    /// Trains from the built-in exemplar corpus.
    pub fn train_default(&mut self) {
        self.train(&Self::default_training_rows());
    }

    /// Returns the label whose token counts best cover the filename's
    /// tokens. The winning score must be strictly positive; ties keep the
    /// lexically first label. `None` when untrained or nothing overlaps.
    pub fn predict(&self, filename: &str) -> Option<&str> {
        let bag = self.label_word_counts.as_ref()?;
        let toks = tokenize::tokens(filename);
        let mut best: Option<(&str, u32)> = None;
        for (label, counts) in bag {
            let score: u32 = toks.iter().filter_map(|t| counts.get(t)).sum();
            if score > 0 && best.map_or(true, |(_, s)| score > s) {
                best = Some((label.as_str(), score));
            }
        }
        best.map(|(label, _)| label)
    }

    /// Persists the label → token-count table as JSON. Fails with a state
    /// error if the model was never trained.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bag = self.label_word_counts.as_ref().ok_or(OrganizerError::State)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| OrganizerError::io(parent, e))?;
        }
        let payload = serde_json::to_string_pretty(bag)
            .map_err(|e| OrganizerError::format("classifier model", path, e))?;
        fs::write(path, payload).map_err(|e| OrganizerError::io(path, e))
    }

    /// Loads a model previously written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| OrganizerError::io(path, e))?;
        let bag: BTreeMap<String, WordCounts> = serde_json::from_str(&raw)
            .map_err(|e| OrganizerError::format("classifier model", path, e))?;
        Ok(Self {
            label_word_counts: Some(bag),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained() -> FilenameClassifier {
        let mut c = FilenameClassifier::new();
        c.train_default();
        c
    }

    #[test]
    fn untrained_predicts_nothing() {
        assert_eq!(FilenameClassifier::new().predict("resume_final"), None);
    }

    #[test]
    fn predicts_from_token_overlap() {
        let c = trained();
        assert_eq!(c.predict("vacation_clip"), Some("videos"));
        assert_eq!(c.predict("my resume draft"), Some("documents"));
        assert_eq!(c.predict("no overlap here"), None);
    }

    #[test]
    fn ties_go_to_lexically_first_label() {
        let mut c = FilenameClassifier::new();
        c.train(&[("report", "beta"), ("report", "alpha")]);
        assert_eq!(c.predict("report"), Some("alpha"));
    }

    #[test]
    fn save_untrained_is_a_state_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = FilenameClassifier::new()
            .save(&temp.path().join("model.json"))
            .unwrap_err();
        assert!(matches!(err, OrganizerError::State));
    }

    #[test]
    fn save_load_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("data").join("model.json");
        trained().save(&path).unwrap();

        let loaded = FilenameClassifier::load(&path).unwrap();
        assert_eq!(loaded.predict("lecture_recording"), Some("videos"));
    }

    #[test]
    fn load_malformed_is_a_format_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FilenameClassifier::load(&path).unwrap_err();
        assert!(matches!(err, OrganizerError::Format { .. }));
    }
}
