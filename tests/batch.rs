//! Batch driver tests.

mod common;

use std::path::Path;
use std::sync::Arc;

use common::{Extraction, FakeRunner, extractor, touch_video};
use framepipe::{ExtractionConfig, ExtractionError, batch::batch_output_dir};

#[test]
fn results_follow_input_order() {
    let runner = Arc::new(FakeRunner::new(Extraction::Frames(2)));
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = directory.path().join("v1.mp4");
    let present = touch_video(directory.path(), "v2.mp4");
    let base = directory.path().join("out");

    let extractor = extractor(&runner);
    let results: Vec<_> = extractor
        .extract_batch([&missing, &present], &base, None)
        .collect();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].input_path, missing);
    assert!(matches!(
        results[0].error(),
        Some(ExtractionError::MissingInput { .. })
    ));
    assert_eq!(results[1].input_path, present);
    assert_eq!(results[1].output_path(), Some(base.join("v2").as_path()));
}

#[test]
fn nothing_runs_until_advanced() {
    let runner = Arc::new(FakeRunner::new(Extraction::Frames(1)));
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let first = touch_video(directory.path(), "a.mp4");
    let second = touch_video(directory.path(), "b.mp4");

    let extractor = extractor(&runner);
    let mut batch = extractor.extract_batch(vec![first, second], directory.path().join("out"), None);
    assert!(runner.calls().is_empty());
    assert_eq!(batch.size_hint(), (2, Some(2)));

    let result = batch.next().expect("first result");
    assert!(result.is_success());
    assert_eq!(runner.extraction_calls().len(), 1);

    assert!(batch.next().is_some());
    assert!(batch.next().is_none());
    assert_eq!(runner.extraction_calls().len(), 2);
}

#[test]
fn failures_do_not_stop_the_batch() {
    let runner = Arc::new(FakeRunner::new(Extraction::Fail {
        code: 1,
        stderr: "moov atom not found".to_string(),
    }));
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let videos: Vec<_> = ["a.mp4", "b.avi", "c.mkv"]
        .iter()
        .map(|name| touch_video(directory.path(), name))
        .collect();

    let extractor = extractor(&runner);
    let results: Vec<_> = extractor
        .extract_batch(&videos, directory.path().join("out"), None)
        .collect();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| !result.is_success()));
    assert_eq!(runner.extraction_calls().len(), 3);
}

#[test]
fn config_is_shared_by_every_video() {
    let runner = Arc::new(FakeRunner::new(Extraction::Frames(1)));
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let videos = [
        touch_video(directory.path(), "a.mp4"),
        touch_video(directory.path(), "b.mp4"),
    ];

    let config = ExtractionConfig::new().with_frame_interval(7);
    let extractor = extractor(&runner);
    let results: Vec<_> = extractor
        .extract_batch(&videos, directory.path().join("out"), Some(&config))
        .collect();
    assert!(results.iter().all(|result| result.is_success()));

    for call in runner.extraction_calls() {
        assert!(call.contains(&"select='not(mod(n,7))'".to_string()));
    }
}

#[test]
fn empty_batch_yields_nothing() {
    let runner = Arc::new(FakeRunner::new(Extraction::Frames(1)));
    let extractor = extractor(&runner);
    let videos: Vec<&Path> = Vec::new();

    assert_eq!(extractor.extract_batch(videos, "out", None).count(), 0);
    assert!(runner.calls().is_empty());
}

#[test]
fn repeated_stems_share_a_directory() {
    let runner = Arc::new(FakeRunner::new(Extraction::Frames(1)));
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::create_dir_all(directory.path().join("x")).unwrap();
    std::fs::create_dir_all(directory.path().join("y")).unwrap();
    let first = touch_video(&directory.path().join("x"), "clip.mp4");
    let second = touch_video(&directory.path().join("y"), "clip.mov");
    let base = directory.path().join("out");

    let extractor = extractor(&runner);
    let results: Vec<_> = extractor.extract_batch([&first, &second], &base, None).collect();

    assert_eq!(results[0].output_path(), results[1].output_path());
    assert_eq!(results[0].output_path(), Some(base.join("clip").as_path()));
}

#[test]
fn output_dir_uses_the_stem() {
    let base = Path::new("data/output");
    assert_eq!(
        batch_output_dir(base, Path::new("data/input/holiday.final.mp4")),
        base.join("holiday.final")
    );
}
