use organizer_core::config::OrganizerConfig;
use organizer_core::error::OrganizerError;
use organizer_core::organizer::SmartOrganizer;
use std::fs;
use std::path::Path;

fn organizer_for(source: &Path, target: &Path) -> SmartOrganizer {
    let mut cfg = OrganizerConfig::new(source);
    cfg.target_root = target.to_path_buf();
    SmartOrganizer::new(cfg).unwrap()
}

#[test]
fn organize_then_search_ranks_moved_files() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("organized");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("Resume Final.PDF"), "resume").unwrap();
    fs::write(source.join("holiday photo.jpg"), "pixels").unwrap();
    fs::write(source.join("invoice jan.pdf"), "invoice").unwrap();

    let mut organizer = organizer_for(&source, &target);
    organizer.organize().unwrap();

    let results = organizer.semantic_search("show my resume", 5);
    assert!(!results.is_empty());
    assert!(results[0].path.ends_with("resume_final.pdf"));
    assert!(results[0].score > 0.0);

    assert!(organizer.semantic_search("zzz", 5).is_empty());
}

#[test]
fn search_lazily_indexes_target_root_and_skips_undo_log() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("organized");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("resume.pdf"), "resume").unwrap();

    organizer_for(&source, &target).organize().unwrap();

    // A fresh organizer has an empty index and must rebuild it from disk.
    let mut fresh = organizer_for(&source, &target);
    let results = fresh.semantic_search("resume", 5);
    assert_eq!(results.len(), 1);
    assert!(results[0].path.ends_with("resume.pdf"));

    // The undo log sits under the target root but is never indexed.
    assert!(fresh.undo_log_path().exists());
    assert!(fresh.semantic_search("undo log", 5).is_empty());
}

#[test]
fn model_is_trained_and_persisted_at_construction() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    fs::create_dir(&source).unwrap();
    let model_path = temp.path().join("data").join("filename_classifier.json");

    let mut cfg = OrganizerConfig::new(&source);
    cfg.target_root = temp.path().join("organized");
    cfg.model_path = Some(model_path.clone());

    let organizer = SmartOrganizer::new(cfg.clone()).unwrap();
    assert!(model_path.exists());
    assert_eq!(organizer.classify(Path::new("vacation_clip")), "videos");

    // A second organizer loads the persisted model instead of retraining.
    let organizer = SmartOrganizer::new(cfg.clone()).unwrap();
    assert_eq!(organizer.classify(Path::new("vacation_clip")), "videos");

    // A corrupt model is fatal to construction.
    fs::write(&model_path, "not json").unwrap();
    let err = SmartOrganizer::new(cfg).unwrap_err();
    assert!(matches!(err, OrganizerError::Format { .. }));
}

#[test]
fn custom_rules_file_overrides_categories() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("organized");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("novel.EPUB"), "book").unwrap();

    let rules_path = temp.path().join("rules.toml");
    fs::write(
        &rules_path,
        r#"
        [[categories]]
        name = "ebooks"
        extensions = [".epub", ".mobi"]
        "#,
    )
    .unwrap();

    let mut cfg = OrganizerConfig::new(&source);
    cfg.target_root = target.clone();
    cfg.rules_path = Some(rules_path);
    let mut organizer = SmartOrganizer::new(cfg).unwrap();

    organizer.organize().unwrap();
    assert!(target.join("ebooks").join("novel.epub").exists());
}
