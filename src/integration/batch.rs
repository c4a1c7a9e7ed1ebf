//! Parallel sampling across independent videos.

use log::{error, info};
use rayon::prelude::*;

use super::{
    DetectionSource, FrameSink, FrameSource, PipelineError, RunSummary, SamplerPipeline,
};
use crate::sampler::{ConfigError, KeyframeSampler, SamplerConfig};

/// Everything needed to sample one video.
pub struct VideoJob<S, K, D> {
    pub name: String,
    pub source: S,
    pub sink: K,
    pub detector: D,
}

/// Result of one video in a batch.
#[derive(Debug)]
pub struct VideoOutcome<E> {
    pub name: String,
    pub result: Result<RunSummary, PipelineError<E>>,
}

/// Sample every job on the rayon pool.
///
/// Each video gets its own pipeline and state, so no data is shared between
/// workers; frames inside a video are still processed strictly in order.
/// A failing video does not stop the others. Outcomes keep the job order.
pub fn sample_videos_parallel<S, K, D>(
    jobs: Vec<VideoJob<S, K, D>>,
    config: &SamplerConfig,
) -> Result<Vec<VideoOutcome<D::Error>>, ConfigError>
where
    S: FrameSource + Send,
    K: FrameSink + Send,
    D: DetectionSource + Send,
{
    let sampler = KeyframeSampler::new(config.clone())?;

    let outcomes = jobs
        .into_par_iter()
        .map(|job| {
            let VideoJob {
                name,
                mut source,
                mut sink,
                detector,
            } = job;
            info!("Processing {}", name);
            let mut pipeline = SamplerPipeline::from_sampler(detector, sampler.clone());
            let result = pipeline.run(&mut source, &mut sink);
            match &result {
                Ok(summary) => info!(
                    "Finished processing {}: {} keyframes from {} frames",
                    name, summary.keyframes, summary.frames
                ),
                Err(e) => error!("Failed processing {}: {}", name, e),
            }
            VideoOutcome { name, result }
        })
        .collect();

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use image::RgbImage;

    use super::*;
    use crate::integration::{Frame, FrameRecord, ReplayDetector};
    use crate::sampler::Detection;

    type MemoryJob = VideoJob<std::vec::IntoIter<Frame>, Vec<(u64, u64)>, ReplayDetector>;

    fn job(name: &str, points: &[Option<(f32, f32)>]) -> MemoryJob {
        let frames: Vec<Frame> = (0..points.len() as u64)
            .map(|i| Frame::new(i, Duration::ZERO, RgbImage::new(2, 2)))
            .collect();
        let records = points.iter().enumerate().map(|(i, p)| FrameRecord {
            frame: i as u64,
            detections: p
                .map(|(x, y)| vec![Detection::at_point(0, 0.9, x, y)])
                .unwrap_or_default(),
        });
        VideoJob {
            name: name.to_string(),
            source: frames.into_iter(),
            sink: Vec::new(),
            detector: ReplayDetector::from_records(records).unwrap(),
        }
    }

    #[test]
    fn test_each_video_has_its_own_state() {
        let config = SamplerConfig {
            miss_tolerance: 2,
            ..SamplerConfig::default()
        };
        let jobs = vec![
            job("a", &[Some((100.0, 100.0)), Some((101.0, 100.0)), None, None]),
            job("b", &[Some((100.0, 100.0)), None]),
        ];

        let outcomes = sample_videos_parallel(jobs, &config).unwrap();

        assert_eq!(outcomes[0].name, "a");
        assert_eq!(
            outcomes[0].result.as_ref().unwrap(),
            &RunSummary {
                frames: 4,
                keyframes: 2
            }
        );
        // b starts from a fresh origin, so its first frame is a keyframe too
        assert_eq!(outcomes[1].name, "b");
        assert_eq!(outcomes[1].result.as_ref().unwrap().keyframes, 1);
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = SamplerConfig {
            motion_threshold: -3.0,
            ..SamplerConfig::default()
        };
        assert!(sample_videos_parallel(vec![job("a", &[None])], &config).is_err());
    }
}
