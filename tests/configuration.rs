//! ExtractionConfig, FrameFormat, and GatewayTimeouts tests.

use std::time::Duration;

use framepipe::{
    DEFAULT_FRAME_INTERVAL, ExtractionConfig, FrameFormat, Gateway, GatewayTimeouts,
};

// ── ExtractionConfig builder ─────────────────────────────────────

#[test]
fn config_defaults() {
    let config = ExtractionConfig::new();
    assert_eq!(config.frame_interval(), DEFAULT_FRAME_INTERVAL);
    assert_eq!(config.frame_interval(), 30);
    assert_eq!(config.start_time(), 0.0);
    assert_eq!(config.end_time(), None);
    assert_eq!(config.frame_format(), FrameFormat::Png);
    assert!(!config.overwrite());
    assert_eq!(config, ExtractionConfig::default());
}

#[test]
fn config_with_frame_interval_clamps_zero() {
    let config = ExtractionConfig::new().with_frame_interval(0);
    // Clamped to 1.
    assert_eq!(config.frame_interval(), 1);
}

#[test]
fn config_with_start_time_clamps_negative() {
    assert_eq!(ExtractionConfig::new().with_start_time(-3.0).start_time(), 0.0);
    assert_eq!(ExtractionConfig::new().with_start_time(f64::NAN).start_time(), 0.0);
    assert_eq!(ExtractionConfig::new().with_start_time(2.5).start_time(), 2.5);
}

#[test]
fn config_window() {
    let config = ExtractionConfig::new().with_start_time(2.0).with_end_time(5.0);
    assert_eq!(config.window_length(), Some(3.0));
    assert!(!config.has_inverted_window());

    let open = config.clone().without_end_time();
    assert_eq!(open.window_length(), None);
    assert!(!open.has_inverted_window());
}

#[test]
fn config_inverted_window_is_kept() {
    let config = ExtractionConfig::new().with_start_time(5.0).with_end_time(5.0);
    assert_eq!(config.end_time(), Some(5.0));
    assert!(config.has_inverted_window());
}

// ── FrameFormat ──────────────────────────────────────────────────

#[test]
fn frame_format_names() {
    assert_eq!(FrameFormat::from_name("png"), Some(FrameFormat::Png));
    assert_eq!(FrameFormat::from_name("JPEG"), Some(FrameFormat::Jpeg));
    assert_eq!(FrameFormat::from_name(".jpg"), Some(FrameFormat::Jpeg));
    assert_eq!(FrameFormat::from_name("gif"), None);
    assert_eq!(FrameFormat::Jpeg.to_string(), "jpg");
}

// ── GatewayTimeouts ──────────────────────────────────────────────

#[test]
fn timeout_defaults() {
    let timeouts = GatewayTimeouts::default();
    assert_eq!(timeouts.availability, Duration::from_secs(10));
    assert_eq!(timeouts.probe, Duration::from_secs(30));
    assert_eq!(timeouts.extraction, Duration::from_secs(300));
}

#[test]
fn timeouts_clamp_zero() {
    let timeouts = GatewayTimeouts::new()
        .with_availability(Duration::ZERO)
        .with_extraction(Duration::from_secs(60));
    assert_eq!(timeouts.availability, Duration::from_millis(1));
    assert_eq!(timeouts.extraction, Duration::from_secs(60));
}

#[test]
fn gateway_carries_timeouts() {
    let timeouts = GatewayTimeouts::new().with_probe(Duration::from_secs(5));
    let gateway = Gateway::new("/opt/ffmpeg/bin/ffmpeg").with_timeouts(timeouts);
    assert_eq!(gateway.timeouts(), timeouts);
    assert_eq!(gateway.program().to_str(), Some("/opt/ffmpeg/bin/ffmpeg"));
    assert_eq!(Gateway::default().program().to_str(), Some("ffmpeg"));
}
