//! Core file organization pipeline: classify, rename, move, log, index.

use crate::classifier::FilenameClassifier;
use crate::config::OrganizerConfig;
use crate::duplicates;
use crate::error::{OrganizerError, Result};
use crate::rules::CategoryRules;
use crate::search::{FilenameSearchIndex, SearchResult};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the undo log file under the target root.
pub const UNDO_LOG_NAME: &str = "undo_log.json";

/// Category used when neither the rule table nor the classifier matches.
pub const FALLBACK_CATEGORY: &str = "others";

/// One completed move, as recorded in the undo log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationAction {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A file the pass could not move, with the reason.
#[derive(Debug)]
pub struct MoveFailure {
    pub path: PathBuf,
    pub error: OrganizerError,
}

/// Outcome of one organize pass. Per-file failures never abort the pass;
/// they are collected here alongside the successful moves.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub actions: Vec<OrganizationAction>,
    pub failures: Vec<MoveFailure>,
}

/// Orchestrates one source directory into category folders under one target
/// root. Not safe for concurrent passes over the same target root: the undo
/// log is read-then-written with no locking, so callers (e.g. a filesystem
/// watcher) must serialize invocations.
#[derive(Debug)]
pub struct SmartOrganizer {
    config: OrganizerConfig,
    rules: CategoryRules,
    classifier: FilenameClassifier,
    search_index: FilenameSearchIndex,
    excludes: GlobSet,
    undo_log_path: PathBuf,
}

impl SmartOrganizer {
    /// Builds an organizer from explicit configuration. Model and rule-table
    /// load failures are fatal here; without a classifier there is no
    /// fallback classification.
    pub fn new(config: OrganizerConfig) -> Result<Self> {
        let rules = match &config.rules_path {
            Some(path) => CategoryRules::load(path)?,
            None => CategoryRules::default(),
        };

        let classifier = match &config.model_path {
            Some(path) if path.exists() => FilenameClassifier::load(path)?,
            Some(path) => {
                let mut c = FilenameClassifier::new();
                c.train_default();
                c.save(path)?;
                debug!("trained default model and saved to {}", path.display());
                c
            }
            None => {
                let mut c = FilenameClassifier::new();
                c.train_default();
                c
            }
        };

        let excludes = build_globset(&config.exclude)?;
        let undo_log_path = config.target_root.join(UNDO_LOG_NAME);
        Ok(Self {
            config,
            rules,
            classifier,
            search_index: FilenameSearchIndex::new(),
            excludes,
            undo_log_path,
        })
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    pub fn undo_log_path(&self) -> &Path {
        &self.undo_log_path
    }

    /// Extension rule first, classifier fallback on the stem, then
    /// [`FALLBACK_CATEGORY`].
    pub fn classify(&self, path: &Path) -> String {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(category) = self.rules.category_for_extension(&format!(".{ext}")) {
                return category.to_string();
            }
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        self.classifier
            .predict(stem)
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
    }

    /// Normalized destination filename: lowercased stem, spaces to
    /// underscores, runs of underscores collapsed, lowercased extension.
    /// Idempotent: renaming an already-normalized name is a no-op.
    pub fn smart_rename(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_lowercase()
            .replace(' ', "_");
        let stem = stem
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}.{}", ext.to_lowercase()),
            None => stem,
        }
    }

    /// Immediate regular files of the source directory, minus exclude-glob
    /// matches, in directory-iteration order. That order is not guaranteed
    /// stable across platforms.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.config.source_dir)
            .map_err(|e| OrganizerError::io(&self.config.source_dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| OrganizerError::io(&self.config.source_dir, e))?;
            let path = entry.path();
            if path.is_file() && !self.excludes.is_match(&path) {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Moves every source file into its category folder under the target
    /// root, then persists the undo log (overwriting any prior one) and
    /// rebuilds the search index over the destinations.
    ///
    /// The file list is snapshotted up front; files created mid-pass are
    /// picked up by the next pass.
    pub fn organize(&mut self) -> Result<OrganizeReport> {
        fs::create_dir_all(&self.config.target_root).map_err(|e| {
            OrganizerError::Config(format!(
                "cannot create target root {}: {e}",
                self.config.target_root.display()
            ))
        })?;

        let snapshot = self.list_files()?;
        let mut report = OrganizeReport::default();
        for path in snapshot {
            match self.organize_one(&path) {
                Ok(action) => report.actions.push(action),
                Err(error) => {
                    warn!("skipping {}: {}", path.display(), error);
                    report.failures.push(MoveFailure { path, error });
                }
            }
        }

        self.save_undo(&report.actions)?;
        self.search_index
            .build(report.actions.iter().map(|a| a.destination.clone()).collect());
        info!(
            "organized {} file(s), {} failure(s)",
            report.actions.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn organize_one(&self, path: &Path) -> Result<OrganizationAction> {
        let category = self.classify(path);
        let category_dir = self.config.target_root.join(&category);
        fs::create_dir_all(&category_dir).map_err(|e| OrganizerError::io(&category_dir, e))?;

        let destination = free_destination(&category_dir, &self.smart_rename(path));
        move_file(path, &destination)?;
        debug!("moved {} -> {}", path.display(), destination.display());
        Ok(OrganizationAction {
            source: path.to_path_buf(),
            destination,
        })
    }

    fn save_undo(&self, actions: &[OrganizationAction]) -> Result<()> {
        let payload = serde_json::to_string_pretty(actions)
            .map_err(|e| OrganizerError::format("undo log", &self.undo_log_path, e))?;
        fs::write(&self.undo_log_path, payload)
            .map_err(|e| OrganizerError::io(&self.undo_log_path, e))
    }

    /// Replays the last pass in reverse, moving files back to their source
    /// paths and returning the restored count. Destinations that no longer
    /// exist are skipped without error. The log is deleted afterwards
    /// regardless of partial success; a log replays at most once. A missing
    /// log returns 0, a corrupt one is a format error.
    pub fn undo_last(&mut self) -> Result<usize> {
        let raw = match fs::read_to_string(&self.undo_log_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(OrganizerError::io(&self.undo_log_path, e)),
        };
        let actions: Vec<OrganizationAction> = serde_json::from_str(&raw)
            .map_err(|e| OrganizerError::format("undo log", &self.undo_log_path, e))?;

        let mut restored = 0;
        for action in actions.iter().rev() {
            if !action.destination.exists() {
                debug!("undo: {} already gone, skipping", action.destination.display());
                continue;
            }
            if let Some(parent) = action.source.parent() {
                fs::create_dir_all(parent).map_err(|e| OrganizerError::io(parent, e))?;
            }
            match move_file(&action.destination, &action.source) {
                Ok(()) => restored += 1,
                Err(e) => warn!("undo failed for {}: {}", action.destination.display(), e),
            }
        }

        fs::remove_file(&self.undo_log_path)
            .map_err(|e| OrganizerError::io(&self.undo_log_path, e))?;
        info!("restored {restored} file(s)");
        Ok(restored)
    }

    /// Duplicate groups among the current source files, keyed by digest.
    pub fn detect_duplicates(&self) -> Result<BTreeMap<String, Vec<PathBuf>>> {
        Ok(duplicates::detect_duplicates(&self.list_files()?))
    }

    /// Lexical filename search over organized files: bag-of-words cosine on
    /// stems, not an embedding lookup. When the index is empty it is rebuilt
    /// from a recursive walk of the target root, skipping the undo log.
    pub fn semantic_search(&mut self, query: &str, top_k: usize) -> Vec<SearchResult> {
        if self.search_index.is_empty() {
            let files: Vec<PathBuf> = WalkDir::new(&self.config.target_root)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| {
                    path.file_name().and_then(|n| n.to_str()) != Some(UNDO_LOG_NAME)
                })
                .collect();
            debug!("lazily indexing {} organized file(s)", files.len());
            self.search_index.build(files);
        }
        self.search_index.query(query, top_k)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| OrganizerError::Config(format!("bad exclude pattern {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| OrganizerError::Config(e.to_string()))
}

/// First non-existing path for `name` under `dir`, appending `_1`, `_2`, …
/// before the extension. A loop rather than recursion; collision chains can
/// be arbitrarily long.
fn free_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = split_name(name);
    let mut counter = 1u32;
    loop {
        let renamed = if ext.is_empty() {
            format!("{stem}_{counter}")
        } else {
            format!("{stem}_{counter}.{ext}")
        };
        let candidate = dir.join(renamed);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn split_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (name, ""),
    }
}

/// Renames within a filesystem; falls back to copy-then-delete when rename
/// fails (e.g. across filesystems). The source is removed only after the
/// copy succeeds, so a failed move never loses data.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|e| OrganizerError::io(from, e))?;
    fs::remove_file(from).map_err(|e| OrganizerError::io(from, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organizer() -> SmartOrganizer {
        SmartOrganizer::new(OrganizerConfig::new("unused")).unwrap()
    }

    #[test]
    fn smart_rename_normalizes_and_is_idempotent() {
        let org = organizer();
        let once = org.smart_rename(Path::new("My  Holiday Photo.JPG"));
        assert_eq!(once, "my_holiday_photo.jpg");
        let twice = org.smart_rename(Path::new(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn smart_rename_collapses_underscore_runs() {
        let org = organizer();
        assert_eq!(org.smart_rename(Path::new("a__b___c.TXT")), "a_b_c.txt");
        assert_eq!(org.smart_rename(Path::new("_leading trailing_.md")), "leading_trailing.md");
    }

    #[test]
    fn smart_rename_keeps_extensionless_names() {
        let org = organizer();
        assert_eq!(org.smart_rename(Path::new("Vacation Clip")), "vacation_clip");
    }

    #[test]
    fn classify_prefers_extension_rule() {
        let org = organizer();
        assert_eq!(org.classify(Path::new("Resume Final.PDF")), "documents");
        assert_eq!(org.classify(Path::new("script.py")), "code");
    }

    #[test]
    fn classify_falls_back_to_classifier_then_others() {
        let org = organizer();
        // No recognized extension, but "vacation" appears in the corpus.
        assert_eq!(org.classify(Path::new("vacation_clip")), "videos");
        assert_eq!(org.classify(Path::new("qqq.unknownext")), "others");
    }

    #[test]
    fn split_name_handles_missing_and_leading_dots() {
        assert_eq!(split_name("report.txt"), ("report", "txt"));
        assert_eq!(split_name("report"), ("report", ""));
        assert_eq!(split_name(".hidden"), (".hidden", ""));
    }

    #[test]
    fn free_destination_appends_counter_before_extension() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("note.txt"), "x").unwrap();
        std::fs::write(temp.path().join("note_1.txt"), "x").unwrap();
        let free = free_destination(temp.path(), "note.txt");
        assert_eq!(free, temp.path().join("note_2.txt"));
    }
}
