use davpanel_core::{
    FilterPolicy, OutcomeKind, Selection, SkipReason, SubmissionOutcome, MAX_SKIP_SAMPLES,
};

#[test]
fn submitted_outcome_carries_job_id() {
    let outcome = SubmissionOutcome::submitted("clip.mp4", "2089b05ecca3d829");
    assert!(outcome.success);
    assert_eq!(outcome.kind, OutcomeKind::Submitted);
    assert_eq!(outcome.job_id.as_deref(), Some("2089b05ecca3d829"));
}

#[test]
fn skipped_outcome_states_threshold() {
    let outcome =
        SubmissionOutcome::skipped("clip.mp4", SkipReason::UnderSize { min_size_mb: 300 });
    assert!(!outcome.success);
    assert_eq!(outcome.kind, OutcomeKind::Skipped);
    assert!(outcome.job_id.is_none());
    assert_eq!(
        outcome.message,
        "skipped: clip.mp4 is under the 300MB threshold"
    );
}

#[test]
fn no_eligible_message_lists_at_most_five_samples() {
    let skipped: Vec<(String, SkipReason)> = (0..7)
        .map(|i| (format!("ep{i}.mp4"), SkipReason::UnderSize { min_size_mb: 300 }))
        .collect();
    let outcome = SubmissionOutcome::no_eligible_files(
        "Season 1",
        7,
        &skipped,
        &FilterPolicy::new(true, 300),
    );

    assert_eq!(outcome.filename, "Season 1");
    assert!(!outcome.success);
    assert!(outcome.message.contains("scanned 7 files"));
    assert!(outcome.message.contains("ep4.mp4 (under the 300MB threshold)"));
    assert!(!outcome.message.contains("ep5.mp4"));
    assert!(outcome.message.ends_with(&format!("and {} more", 7 - MAX_SKIP_SAMPLES)));
}

#[test]
fn empty_folder_outcome_reports_scan_count() {
    let outcome = SubmissionOutcome::empty_folder("Empty", 0);
    assert_eq!(outcome.kind, OutcomeKind::Failed);
    assert_eq!(outcome.message, "folder empty or inaccessible; scanned 0 files");
}

#[test]
fn selection_name_falls_back_to_path_segment() {
    let selection = Selection::file("/movies/clip.mp4", 1);
    assert_eq!(selection.display_name(), "clip.mp4");
    assert_eq!(
        Selection::folder("/movies/Action/").display_name(),
        "Action"
    );
    assert_eq!(
        Selection::file("/movies/clip.mp4", 1).named("Renamed.mp4").display_name(),
        "Renamed.mp4"
    );

    let blank = Selection {
        path: Some("   ".to_string()),
        ..Selection::default()
    };
    assert_eq!(blank.path(), None);
    assert_eq!(blank.display_name(), "unknown file");
    assert!(blank.as_entry().is_none());
}
