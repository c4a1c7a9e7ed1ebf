use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};

use keyframe_rs::dataset::{self, DEFAULT_SEED};
use keyframe_rs::integration::{ReplayDetector, VideoJob, sample_videos_parallel};
use keyframe_rs::media::{
    FrameTransform, IMAGE_EXTENSIONS, ImageDirSink, ImageSequenceSource, Rotation, TimeWindow,
    has_extension, stem_of,
};
use keyframe_rs::{ReferenceAnchor, SamplerConfig};

#[derive(Parser)]
#[command(name = "keyframe", version, about = "Keyframe sampling and pose dataset tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Keep the frames where the tracked subject moved, plus heartbeat frames during dropouts
    Sample(SampleArgs),
    /// Convert COCO keypoint JSON to YOLO pose label files
    Convert(ConvertArgs),
    /// Split labelled images into train/val directories
    Split(SplitArgs),
}

#[derive(Args)]
struct SampleArgs {
    /// A directory of frame images, or a directory of such directories (one per video)
    #[arg(short, long)]
    input: PathBuf,
    /// Output directory; keyframes land in <output>/<video>/<video>_<n>.jpg
    #[arg(short, long)]
    output: PathBuf,
    /// Detection recording expected inside every video directory, numbered by
    /// source frame so it stays valid with --start/--end
    #[arg(long, default_value = "detections.jsonl")]
    detections: String,
    /// JSON sampler configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    tracked_class: Option<u32>,
    /// Pixel distance the subject must move for a new keyframe
    #[arg(long)]
    motion_threshold: Option<f32>,
    /// Consecutive missed frames that force a heartbeat keyframe
    #[arg(long)]
    miss_tolerance: Option<u32>,
    /// Keypoint index used as the reference point
    #[arg(long, conflicts_with = "box_center")]
    keypoint: Option<usize>,
    /// Use the bounding-box center as the reference point
    #[arg(long)]
    box_center: bool,
    /// Frame rate of the extracted sequence, used for --start/--end
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
    /// Start time (in seconds)
    #[arg(short, long, default_value_t = 0.0)]
    start: f64,
    /// End time (in seconds)
    #[arg(short, long)]
    end: Option<f64>,
    #[arg(short, long, value_enum, default_value_t = RotateArg::None)]
    rotate: RotateArg,
    /// Resize rate
    #[arg(long, default_value_t = 1.0)]
    resize: f32,
}

#[derive(Clone, Copy, ValueEnum)]
enum RotateArg {
    /// 90 degrees counter-clockwise
    Right,
    /// 90 degrees clockwise
    Left,
    None,
}

impl From<RotateArg> for Rotation {
    fn from(arg: RotateArg) -> Self {
        match arg {
            RotateArg::Right => Rotation::Right,
            RotateArg::Left => Rotation::Left,
            RotateArg::None => Rotation::None,
        }
    }
}

#[derive(Args)]
struct ConvertArgs {
    /// Path to COCO format JSON file
    #[arg(short, long)]
    json_path: PathBuf,
    /// Output directory for YOLO format files
    #[arg(short, long)]
    output_dir: PathBuf,
    #[arg(long, default_value_t = 0)]
    class_id: u32,
}

#[derive(Args)]
struct SplitArgs {
    #[arg(short, long, default_value = "data/images")]
    images_dir: PathBuf,
    #[arg(short, long, default_value = "data/labels")]
    labels_dir: PathBuf,
    #[arg(short, long, default_value = "data/dataset")]
    output_dir: PathBuf,
    #[arg(short, long, default_value_t = 0.9)]
    train_ratio: f64,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Sample(args) => sample(args),
        Command::Convert(args) => {
            let summary =
                dataset::convert_coco_to_yolo(&args.json_path, &args.output_dir, args.class_id)?;
            info!("Convert to YOLO format is done: {} files", summary.label_files);
            Ok(())
        }
        Command::Split(args) => {
            dataset::labels_without_images(&args.images_dir, &args.labels_dir)?;
            dataset::create_dataset(
                &args.images_dir,
                &args.labels_dir,
                &args.output_dir,
                args.train_ratio,
                args.seed,
            )?;
            Ok(())
        }
    }
}

fn sampler_config(args: &SampleArgs) -> Result<SamplerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SamplerConfig::from_json(&text)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => SamplerConfig::default(),
    };

    if let Some(class) = args.tracked_class {
        config.tracked_class_id = class;
    }
    if let Some(threshold) = args.motion_threshold {
        config.motion_threshold = threshold;
    }
    if let Some(tolerance) = args.miss_tolerance {
        config.miss_tolerance = tolerance;
    }
    if let Some(index) = args.keypoint {
        config.reference = ReferenceAnchor::Keypoint(index);
    }
    if args.box_center {
        config.reference = ReferenceAnchor::BoxCenter;
    }

    config.validate()?;
    Ok(config)
}

/// Directories holding one video's frames each.
fn video_dirs(input: &Path) -> Result<Vec<PathBuf>> {
    let entries: Vec<PathBuf> = fs::read_dir(input)
        .with_context(|| format!("reading {}", input.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;

    if entries.iter().any(|p| p.is_file() && has_extension(p, IMAGE_EXTENSIONS)) {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut dirs: Vec<PathBuf> = entries.into_iter().filter(|p| p.is_dir()).collect();
    dirs.sort();
    Ok(dirs)
}

fn sample(args: SampleArgs) -> Result<()> {
    let config = sampler_config(&args)?;
    let window = TimeWindow::new(args.start, args.end);
    let transform = FrameTransform::new(args.rotate.into(), args.resize)?;

    let mut jobs = Vec::new();
    for dir in video_dirs(&args.input)? {
        let name = stem_of(&dir);
        let recording = dir.join(&args.detections);
        let detector = ReplayDetector::from_path(&recording)
            .with_context(|| format!("loading detections {}", recording.display()))?;
        let source = ImageSequenceSource::open(&dir, args.fps)?
            .with_window(window)
            .with_transform(transform)?;
        let sink = ImageDirSink::create(args.output.join(&name), name.clone())?;
        jobs.push(VideoJob {
            name,
            source,
            sink,
            detector,
        });
    }
    if jobs.is_empty() {
        bail!("no frame directories found under {}", args.input.display());
    }

    let outcomes = sample_videos_parallel(jobs, &config)?;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    for outcome in outcomes.iter().filter(|o| o.result.is_err()) {
        error!("{} did not complete", outcome.name);
    }
    if failed > 0 {
        bail!("{} of {} videos failed", failed, outcomes.len());
    }
    Ok(())
}
