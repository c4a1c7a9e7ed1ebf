//! Train/validation partitioning of a labelled image set.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::error::{DatasetError, IoContext};
use crate::media::{find_files, stem_of};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0;

/// Which label files go to which split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub train: Vec<PathBuf>,
    pub val: Vec<PathBuf>,
}

impl SplitPlan {
    /// Shuffle `labels` with `seed` and cut after `floor(len * train_ratio)` entries.
    ///
    /// Labels are sorted before shuffling, so the plan only depends on the set
    /// of labels and the seed, not on directory listing order.
    pub fn new(
        mut labels: Vec<PathBuf>,
        train_ratio: f64,
        seed: u64,
    ) -> Result<Self, DatasetError> {
        if !(0.0..=1.0).contains(&train_ratio) {
            return Err(DatasetError::InvalidTrainRatio(train_ratio));
        }
        labels.sort();
        let mut rng = StdRng::seed_from_u64(seed);
        labels.shuffle(&mut rng);

        let train_size = (labels.len() as f64 * train_ratio) as usize;
        let val = labels.split_off(train_size);
        Ok(Self { train: labels, val })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub train: usize,
    pub val: usize,
}

/// Copy labels and their `<stem>.jpg` images into
/// `output/{images,labels}/{train,val}`.
pub fn create_dataset(
    images_dir: &Path,
    labels_dir: &Path,
    output_dir: &Path,
    train_ratio: f64,
    seed: u64,
) -> Result<SplitSummary, DatasetError> {
    let labels = fs::read_dir(labels_dir)
        .at(labels_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .at(labels_dir)?
        .into_iter()
        .filter(|p| p.is_file())
        .collect();
    let plan = SplitPlan::new(labels, train_ratio, seed)?;

    for (split, labels) in [("train", &plan.train), ("val", &plan.val)] {
        let images_out = output_dir.join("images").join(split);
        let labels_out = output_dir.join("labels").join(split);
        fs::create_dir_all(&images_out).at(&images_out)?;
        fs::create_dir_all(&labels_out).at(&labels_out)?;

        for label in labels {
            let image = images_dir.join(format!("{}.jpg", stem_of(label)));
            copy_into(&image, &images_out)?;
            copy_into(label, &labels_out)?;
        }
    }

    let summary = SplitSummary {
        train: plan.train.len(),
        val: plan.val.len(),
    };
    info!(
        "dataset split into {} train / {} val under {}",
        summary.train,
        summary.val,
        output_dir.display()
    );
    Ok(summary)
}

/// Label files (`.txt`) directly or recursively under `labels_dir` that have no image.
pub fn labels_without_images(
    images_dir: &Path,
    labels_dir: &Path,
) -> Result<Vec<PathBuf>, DatasetError> {
    let labels = find_files(labels_dir, &["txt"]).at(labels_dir)?;
    let missing: Vec<PathBuf> = labels
        .into_iter()
        .filter(|label| !images_dir.join(format!("{}.jpg", stem_of(label))).is_file())
        .collect();
    if !missing.is_empty() {
        warn!("{} labels have no matching image", missing.len());
    }
    Ok(missing)
}

fn copy_into(file: &Path, dir: &Path) -> Result<(), DatasetError> {
    let name = file.file_name().unwrap_or_default();
    fs::copy(file, dir.join(name)).at(file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("l{:02}.txt", i))).collect()
    }

    #[test]
    fn test_plan_sizes() {
        let plan = SplitPlan::new(labels(10), 0.9, DEFAULT_SEED).unwrap();
        assert_eq!(plan.train.len(), 9);
        assert_eq!(plan.val.len(), 1);

        let plan = SplitPlan::new(labels(7), 0.5, DEFAULT_SEED).unwrap();
        assert_eq!((plan.train.len(), plan.val.len()), (3, 4));
    }

    #[test]
    fn test_plan_is_deterministic_and_order_independent() {
        let mut reversed = labels(20);
        reversed.reverse();

        let a = SplitPlan::new(labels(20), 0.8, 42).unwrap();
        let b = SplitPlan::new(reversed, 0.8, 42).unwrap();
        assert_eq!(a, b);

        let mut all: Vec<PathBuf> = a.train.iter().chain(&a.val).cloned().collect();
        all.sort();
        assert_eq!(all, labels(20));
    }

    #[test]
    fn test_rejects_bad_ratio() {
        assert!(matches!(
            SplitPlan::new(labels(3), 1.5, 0),
            Err(DatasetError::InvalidTrainRatio(_))
        ));
    }
}
