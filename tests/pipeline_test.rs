use std::fs;
use std::path::Path;

use image::RgbImage;
use keyframe_rs::integration::{ReplayDetector, VideoJob, sample_videos_parallel};
use keyframe_rs::media::{ImageDirSink, ImageSequenceSource, TimeWindow};
use keyframe_rs::{SamplerConfig, SamplerPipeline};

fn write_video(dir: &Path, frames: usize, recording: &str) {
    fs::create_dir_all(dir).unwrap();
    for i in 0..frames {
        RgbImage::new(8, 6)
            .save(dir.join(format!("frame_{:04}.png", i)))
            .unwrap();
    }
    fs::write(dir.join("detections.jsonl"), recording).unwrap();
}

fn point_record(frame: u64, x: f32, y: f32) -> String {
    format!(
        r#"{{"frame": {}, "detections": [{{"class_id": 0, "confidence": 0.9, "keypoints": [{{"x": {:.1}, "y": {:.1}, "visibility": 2.0}}]}}]}}"#,
        frame, x, y
    )
}

#[test]
fn test_sequence_to_keyframe_directory() {
    let root = tempfile::tempdir().unwrap();
    let video = root.path().join("walk");
    // subject at rest, steps right at frame 3, then leaves the picture
    let recording = [
        point_record(0, 100.0, 100.0),
        point_record(1, 105.0, 100.0),
        point_record(2, 110.0, 100.0),
        point_record(3, 160.0, 100.0),
    ]
    .join("\n");
    write_video(&video, 8, &recording);

    let config = SamplerConfig {
        miss_tolerance: 3,
        ..SamplerConfig::default()
    };
    let detector = ReplayDetector::from_path(video.join("detections.jsonl")).unwrap();
    let mut pipeline = SamplerPipeline::new(detector, config).unwrap();
    let mut source = ImageSequenceSource::open(&video, 30.0).unwrap();
    let out = root.path().join("out");
    let mut sink = ImageDirSink::create(&out, "walk").unwrap();

    let summary = pipeline.run(&mut source, &mut sink).unwrap();

    // keeps: frame 0 (first sighting), 3 (moved 60px), 6 (third miss)
    assert_eq!(summary.frames, 8);
    assert_eq!(summary.keyframes, 3);
    for ordinal in 1..=3 {
        assert!(out.join(format!("walk_{}.jpg", ordinal)).is_file());
    }
    assert_eq!(sink.written().len(), 3);
    assert_eq!(pipeline.state().miss_streak, 1);
}

#[test]
fn test_time_window_keeps_detections_aligned() {
    let root = tempfile::tempdir().unwrap();
    let video = root.path().join("clip");
    // recording covers the whole directory: subject in 0..=4, gone in 5..=9
    let recording = (0..5)
        .map(|i| point_record(i, 50.0, 50.0))
        .collect::<Vec<_>>()
        .join("\n");
    write_video(&video, 10, &recording);

    let config = SamplerConfig {
        miss_tolerance: 3,
        ..SamplerConfig::default()
    };
    let detector = ReplayDetector::from_path(video.join("detections.jsonl")).unwrap();
    let mut pipeline = SamplerPipeline::new(detector, config).unwrap();
    // 10 fps: start at 0.5 s skips source frames 0..=4
    let mut source = ImageSequenceSource::open(&video, 10.0)
        .unwrap()
        .with_window(TimeWindow::new(0.5, None));
    let mut sink: Vec<(u64, u64)> = Vec::new();

    let summary = pipeline.run(&mut source, &mut sink).unwrap();

    // only the heartbeat on the third miss; frame 0's sighting must not leak in
    assert_eq!(summary.frames, 5);
    assert_eq!(sink, vec![(1, 2)]);
}

#[test]
fn test_time_window_limits_sampled_frames() {
    let root = tempfile::tempdir().unwrap();
    let video = root.path().join("walk");
    let recording = (0..10)
        .map(|i| point_record(i, 40.0 * i as f32, 50.0))
        .collect::<Vec<_>>()
        .join("\n");
    write_video(&video, 10, &recording);

    let detector = ReplayDetector::from_path(video.join("detections.jsonl")).unwrap();
    let mut pipeline = SamplerPipeline::with_default_config(detector);
    // 10 fps: keep source frames 2..=4, each 40px from the last
    let mut source = ImageSequenceSource::open(&video, 10.0)
        .unwrap()
        .with_window(TimeWindow::new(0.2, Some(0.4)));
    let mut sink: Vec<(u64, u64)> = Vec::new();

    let summary = pipeline.run(&mut source, &mut sink).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(sink, vec![(1, 0), (2, 1), (3, 2)]);
    assert_eq!(pipeline.state().last_kept_position.x, 160.0);
}

#[test]
fn test_parallel_videos_write_separate_directories() {
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("keyframes");

    let mut jobs = Vec::new();
    for (name, x) in [("left", 40.0), ("right", 400.0)] {
        let video = root.path().join("videos").join(name);
        let recording = (0..4)
            .map(|i| point_record(i, x + 50.0 * i as f32, 80.0))
            .collect::<Vec<_>>()
            .join("\n");
        write_video(&video, 4, &recording);

        jobs.push(VideoJob {
            name: name.to_string(),
            source: ImageSequenceSource::open(&video, 25.0).unwrap(),
            sink: ImageDirSink::create(out.join(name), name).unwrap(),
            detector: ReplayDetector::from_path(video.join("detections.jsonl")).unwrap(),
        });
    }

    let outcomes = sample_videos_parallel(jobs, &SamplerConfig::default()).unwrap();
    for outcome in &outcomes {
        // every frame moves 50px, so every frame is a keyframe
        assert_eq!(outcome.result.as_ref().unwrap().keyframes, 4);
        let written = fs::read_dir(out.join(&outcome.name)).unwrap().count();
        assert_eq!(written, 4);
    }
}
