//! Tests for probe-output parsing and target dimension computation.

use vascii::decode::{parse_frame_rate, parse_probe_output, target_dimensions};

#[test]
fn rate_fractions_and_plain_numbers() {
    assert_eq!(parse_frame_rate("30/1"), Some(30.0));
    assert_eq!(parse_frame_rate("30000/1001"), Some(30000.0 / 1001.0));
    assert_eq!(parse_frame_rate("23.976"), Some(23.976));
    assert_eq!(parse_frame_rate("0/0"), None);
    assert_eq!(parse_frame_rate("garbage"), None);
}

#[test]
fn probe_output_with_frame_count() {
    let text = "width=1920\nheight=1080\nr_frame_rate=30/1\nnb_frames=300\nduration=10.000000\n";
    let probed = parse_probe_output(text).unwrap();
    assert_eq!(probed.width, 1920);
    assert_eq!(probed.height, 1080);
    assert_eq!(probed.frame_rate, 30.0);
    assert_eq!(probed.frame_count, 300);
}

#[test]
fn missing_frame_count_is_estimated_from_duration() {
    let text = "width=1280\nheight=720\nr_frame_rate=25/1\nnb_frames=N/A\nduration=4.2\n";
    let probed = parse_probe_output(text).unwrap();
    assert_eq!(probed.frame_count, 105);
}

#[test]
fn unknown_frame_count_falls_back_to_zero() {
    let text = "width=640\nheight=360\nr_frame_rate=30/1\nnb_frames=N/A\nduration=N/A\n";
    let probed = parse_probe_output(text).unwrap();
    assert_eq!(probed.frame_count, 0);
}

#[test]
fn probe_without_video_stream_is_an_error() {
    assert!(parse_probe_output("duration=1.0\n").is_err());
    assert!(parse_probe_output("").is_err());
}

#[test]
fn dimensions_scale_to_fixed_width_with_vertical_squeeze() {
    // 1080/1920 * 480 columns * 0.4 squeeze = 108 rows
    assert_eq!(target_dimensions(1920, 1080, 480, 0.4), (480, 108));
    assert_eq!(target_dimensions(640, 480, 480, 0.4), (480, 144));
}

#[test]
fn extreme_aspect_ratios_keep_at_least_one_row() {
    assert_eq!(target_dimensions(4000, 2, 480, 0.4).1, 1);
}
