mod error;
mod tasks;

use crate::evaluation::CurveFormat;
use crate::streams::generators::GaussianBlobGenerator;
use crate::tasks::{FeatureRanking, HoldoutEvaluator};
use crate::ui::types::choices::TaskChoice;
use std::path::{Path, PathBuf};

pub use error::BuildError;

/// A configured task, ready to run.
#[derive(Debug)]
pub enum Task {
    RankFeatures {
        dataset: PathBuf,
        ranking: FeatureRanking,
    },
    Classify {
        dataset: PathBuf,
        evaluator: HoldoutEvaluator,
        distributions: PathBuf,
        format: CurveFormat,
    },
    Generate {
        output: PathBuf,
        generator: GaussianBlobGenerator,
    },
}

pub fn build_task(choice: TaskChoice) -> Result<Task, BuildError> {
    match choice {
        TaskChoice::RankFeatures(p) => Ok(Task::RankFeatures {
            ranking: FeatureRanking::try_from(&p)?,
            dataset: p.path,
        }),
        TaskChoice::Classify(p) => {
            let evaluator = HoldoutEvaluator::try_from(&p)?;
            let distributions = p
                .distributions_path
                .clone()
                .unwrap_or_else(|| default_distributions_path(&p.path, p.feature, p.format));
            Ok(Task::Classify {
                dataset: p.path,
                evaluator,
                distributions,
                format: p.format,
            })
        }
        TaskChoice::Generate(p) => Ok(Task::Generate {
            generator: GaussianBlobGenerator::try_from(&p)?,
            output: p.output,
        }),
    }
}

/// `<dir>/<stem>_distributions_feature<N>.<ext>` next to the dataset.
pub fn default_distributions_path(dataset: &Path, feature: usize, format: CurveFormat) -> PathBuf {
    let stem = dataset
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    dataset.with_file_name(format!(
        "{stem}_distributions_feature{feature}.{}",
        format.extension()
    ))
}
