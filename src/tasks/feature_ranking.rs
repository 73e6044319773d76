use crate::core::{Dataset, DatasetError, SplitStrategy};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureScore {
    /// 1-indexed feature number.
    pub feature: usize,
    pub fdr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRankingReport {
    pub n_points: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub training_points: usize,
    pub scores: Vec<FeatureScore>,
    pub best: Option<FeatureScore>,
}

/// Normalizes a dataset, takes a training partition and scores every
/// feature by its Fisher Discriminant Ratio on that partition.
#[derive(Debug, Clone)]
pub struct FeatureRanking {
    lower: f64,
    upper: f64,
    split: SplitStrategy,
}

impl FeatureRanking {
    pub fn new(lower: f64, upper: f64, split: SplitStrategy) -> Self {
        Self {
            lower,
            upper,
            split,
        }
    }

    pub fn run(&self, mut dataset: Dataset) -> Result<FeatureRankingReport, DatasetError> {
        let (n_points, n_features, n_classes) =
            (dataset.n_points(), dataset.n_features(), dataset.n_classes());
        info!("ranking {n_features} features over {n_points} points in {n_classes} classes");

        dataset.normalize(self.lower, self.upper);
        let (_, training) = dataset.partition(self.split)?;
        debug!("training partition holds {} points", training.n_points());

        let scores: Vec<FeatureScore> = training
            .rank_features()?
            .into_iter()
            .enumerate()
            .map(|(f, fdr)| FeatureScore {
                feature: f + 1,
                fdr,
            })
            .collect();

        // first maximum wins
        let best = scores.iter().copied().fold(None::<FeatureScore>, |best, s| match best {
            Some(b) if b.fdr >= s.fdr => Some(b),
            _ => Some(s),
        });
        if let Some(b) = best {
            info!("best feature {} with FDR {:.6}", b.feature, b.fdr);
        }

        Ok(FeatureRankingReport {
            n_points,
            n_features,
            n_classes,
            training_points: training.n_points(),
            scores,
            best,
        })
    }
}

impl Default for FeatureRanking {
    fn default() -> Self {
        Self::new(-1.0, 1.0, SplitStrategy::Even)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::{dataset_1d, dataset_text, two_feature_dataset};
    use std::io::Cursor;

    #[test]
    fn ranks_separating_feature_first() {
        let report = FeatureRanking::default().run(two_feature_dataset()).unwrap();
        assert_eq!(report.scores.len(), 2);
        assert_eq!(report.best.unwrap().feature, 1);
        assert_eq!(report.n_points, 8);
        // ceil(4 / 2) per class
        assert_eq!(report.training_points, 4);
    }

    #[test]
    fn three_class_file_prefers_first_feature() {
        let ds = Dataset::from_reader(Cursor::new(dataset_text())).unwrap();
        let report = FeatureRanking::default().run(ds).unwrap();
        assert_eq!(report.n_classes, 3);
        assert_eq!(report.best.unwrap().feature, 1);
        assert!(report.scores[0].fdr > report.scores[1].fdr);
    }

    #[test]
    fn equal_scores_keep_first_feature() {
        let a = crate::core::DataClass::with_points(
            0,
            2,
            vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0], vec![1.0, 1.0]],
        )
        .unwrap();
        let b = crate::core::DataClass::with_points(
            1,
            2,
            vec![vec![2.0, 2.0], vec![3.0, 3.0], vec![2.0, 2.0], vec![3.0, 3.0]],
        )
        .unwrap();
        let ds = Dataset::new(2, vec![a, b]).unwrap();
        let report = FeatureRanking::default().run(ds).unwrap();
        assert_eq!(report.scores[0].fdr, report.scores[1].fdr);
        assert_eq!(report.best.unwrap().feature, 1);
    }

    #[test]
    fn later_equal_maximum_does_not_replace_first() {
        // feature 2 is weaker, feature 3 repeats feature 1
        let class = |id, rows: &[[f64; 2]]| {
            crate::core::DataClass::with_points(
                id,
                3,
                rows.iter().map(|[x, y]| vec![*x, *y, *x]).collect(),
            )
            .unwrap()
        };
        let a = class(1, &[[0.0, 0.0], [1.0, 3.0], [0.5, 1.0], [0.2, 2.0]]);
        let b = class(2, &[[5.0, 1.0], [6.0, 4.0], [5.5, 2.0], [5.2, 3.0]]);
        let ds = Dataset::new(3, vec![a, b]).unwrap();

        let report = FeatureRanking::default().run(ds).unwrap();
        assert_eq!(report.scores[0].fdr, report.scores[2].fdr);
        assert!(report.scores[1].fdr < report.scores[0].fdr);
        let best = report.best.unwrap();
        assert_eq!(best.feature, 1);
        assert_eq!(best.fdr, report.scores[0].fdr);
    }

    #[test]
    fn degenerate_training_partition_is_an_error() {
        // one point per class ends up in training, variance is zero
        let ds = dataset_1d(&[&[1.0, 2.0], &[5.0]]);
        let err = FeatureRanking::default().run(ds).unwrap_err();
        assert!(matches!(err, DatasetError::DegenerateVariance { .. }));
    }
}
