use super::types::{PlaybackInfo, clamp_volume};
use std::time::Duration;

#[test]
fn clamp_volume_keeps_the_slider_range() {
    assert_eq!(clamp_volume(0.5), 0.5);
    assert_eq!(clamp_volume(-0.1), 0.0);
    assert_eq!(clamp_volume(1.5), 1.0);
    assert_eq!(clamp_volume(0.0), 0.0);
    assert_eq!(clamp_volume(1.0), 1.0);
}

#[test]
fn playback_info_starts_idle() {
    let info = PlaybackInfo::default();
    assert!(info.path.is_none());
    assert_eq!(info.elapsed, Duration::ZERO);
    assert!(info.total.is_none());
    assert!(!info.playing);
    assert!(!info.finished);
    assert!(info.error.is_none());
}
