//! Benchmarks for metadata parsing, report rendering, and (when a fixture
//! and `ffmpeg` are present) a full extraction.
//!
//! Run with: cargo bench
//!
//! The extraction benchmark requires fixture files from
//! `tests/fixtures/generate_fixtures.sh`.

use std::{hint::black_box, path::Path, path::PathBuf, time::Duration};

use criterion::Criterion;
use framepipe::{
    BatchSummary, ExtractionError, ExtractionResult, FrameExtractor, parse_video_info,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

const FFMPEG_STDERR: &str = "\
ffmpeg version 6.1.1 Copyright (c) 2000-2023 the FFmpeg developers
  built with gcc 13 (GCC)
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'sample_video.mp4':
  Metadata:
    major_brand     : isom
    minor_version   : 512
  Duration: 00:00:05.00, start: 0.000000, bitrate: 1205 kb/s
  Stream #0:0[0x1](und): Video: h264 (High) (avc1 / 0x31637661), yuv420p(progressive), 320x240 [SAR 1:1 DAR 4:3], 1070 kb/s, 30 fps, 30 tbr, 15360 tbn (default)
Stream mapping:
  Stream #0:0 -> #0:0 (h264 (native) -> wrapped_avframe (native))
Output #0, null, to 'pipe:':
frame=  150 fps=0.0 q=-0.0 Lsize=N/A time=00:00:05.00 bitrate=N/A speed= 120x
";

fn benchmark_parse_video_info(criterion: &mut Criterion) {
    criterion.bench_function("parse gateway diagnostics", |bencher| {
        bencher.iter(|| parse_video_info(black_box(FFMPEG_STDERR)));
    });

    let noise = "frame=  150 fps=0.0 q=-0.0 size=N/A time=00:00:05.00\n".repeat(500);
    criterion.bench_function("parse diagnostics without markers", |bencher| {
        bencher.iter(|| parse_video_info(black_box(&noise)));
    });
}

fn benchmark_report(criterion: &mut Criterion) {
    let results: Vec<ExtractionResult> = (0..200)
        .map(|index| ExtractionResult {
            input_path: PathBuf::from(format!("data/input/video_{index:03}.mp4")),
            processing_time: Duration::from_millis(index * 17),
            outcome: if index % 7 == 0 {
                Err(ExtractionError::GatewayFailure {
                    code: Some(1),
                    diagnostics: "Invalid data found when processing input".to_string(),
                })
            } else {
                Ok(PathBuf::from(format!("data/output/video_{index:03}")))
            },
        })
        .collect();

    criterion.bench_function("render report for 200 videos", |bencher| {
        bencher.iter(|| BatchSummary::from_results(black_box(&results)).to_string());
    });
}

fn benchmark_extraction(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }
    let extractor = FrameExtractor::new();
    if !extractor.is_available() {
        eprintln!("Skipping benchmark: ffmpeg not found");
        return;
    }

    let mut group = criterion.benchmark_group("gateway");
    group.sample_size(10);
    group.bench_function("extract every 30th frame", |bencher| {
        bencher.iter(|| {
            let directory = tempfile::tempdir().unwrap();
            let result = extractor.extract(SAMPLE_VIDEO, directory.path(), None);
            assert!(result.is_success());
        });
    });
    group.finish();
}

criterion::criterion_group!(
    benches,
    benchmark_parse_video_info,
    benchmark_report,
    benchmark_extraction,
);
criterion::criterion_main!(benches);
