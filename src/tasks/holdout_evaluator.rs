use crate::classifiers::{BayesClassifier, Classifier, GaussianParams};
use crate::core::{Dataset, DatasetError, SplitStrategy};
use crate::evaluation::{
    BasicClassificationEvaluator, BasicEstimator, DensityCurve, Measurement, PerformanceEvaluator,
};
use log::{debug, info};
use serde::Serialize;

/// Outcome for one testing point. Classes are reported by label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointResult {
    pub value: f64,
    pub expected: usize,
    pub predicted: usize,
}

impl PointResult {
    pub fn is_correct(&self) -> bool {
        self.expected == self.predicted
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldoutReport {
    /// 1-indexed feature number.
    pub feature: usize,
    pub training_points: usize,
    pub testing_points: usize,
    pub distributions: Vec<GaussianParams>,
    pub results: Vec<PointResult>,
    pub correct: usize,
    pub recognition_rate: f64,
    pub measurements: Vec<Measurement>,
    /// Counts indexed `[expected][predicted]`, rows and columns in the order
    /// of `distributions`.
    pub confusion: Vec<Vec<u64>>,
    #[serde(skip)]
    pub density_curve: DensityCurve,
}

/// Trains a [`BayesClassifier`] on the extracted half of a normalized dataset
/// and classifies every point left in the remainder.
#[derive(Debug, Clone)]
pub struct HoldoutEvaluator {
    feature: usize,
    lower: f64,
    upper: f64,
    split: SplitStrategy,
    sweep_steps: usize,
}

impl HoldoutEvaluator {
    /// `feature` is 0-indexed.
    pub fn new(feature: usize, lower: f64, upper: f64, split: SplitStrategy) -> Self {
        Self {
            feature,
            lower,
            upper,
            split,
            sweep_steps: 200,
        }
    }

    pub fn with_sweep_steps(mut self, steps: usize) -> Self {
        self.sweep_steps = steps;
        self
    }

    pub fn run(&self, mut dataset: Dataset) -> Result<HoldoutReport, DatasetError> {
        if self.feature >= dataset.n_features() {
            return Err(DatasetError::FeatureOutOfRange {
                feature: self.feature,
                n_features: dataset.n_features(),
            });
        }

        dataset.normalize(self.lower, self.upper);
        let (testing, training) = dataset.partition(self.split)?;
        info!(
            "training on {} points, testing on {} points, feature {}",
            training.n_points(),
            testing.n_points(),
            self.feature + 1
        );

        let classifier = BayesClassifier::new(&training, self.feature, self.lower, self.upper)?;
        let mut evaluator = BasicClassificationEvaluator::<BasicEstimator>::new(
            classifier.number_of_classes(),
            true,
            true,
        )
        .with_class_labels(classifier.params().iter().map(|p| p.class_id).collect());

        let mut results = Vec::with_capacity(testing.n_points());
        for (position, class) in testing.classes().iter().enumerate() {
            for value in class.feature_values(self.feature) {
                let votes = classifier.get_votes_for_value(value);
                let predicted = classifier.classify(value);
                evaluator.add_result(position, &votes);
                let result = PointResult {
                    value,
                    expected: class.id(),
                    predicted: classifier.class_id(predicted).unwrap_or(predicted),
                };
                debug!("{result:?}");
                results.push(result);
            }
        }

        let correct = results.iter().filter(|r| r.is_correct()).count();
        let recognition_rate = if results.is_empty() {
            f64::NAN
        } else {
            correct as f64 / results.len() as f64
        };
        info!("recognition rate {recognition_rate:.6} ({correct}/{})", results.len());

        Ok(HoldoutReport {
            feature: self.feature + 1,
            training_points: training.n_points(),
            testing_points: testing.n_points(),
            distributions: classifier.params().to_vec(),
            results,
            correct,
            recognition_rate,
            measurements: evaluator.performance(),
            confusion: evaluator.confusion_matrix().to_vec(),
            density_curve: classifier.density_curve(self.sweep_steps),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::{dataset_1d, dataset_text};
    use std::io::Cursor;

    fn three_class() -> Dataset {
        Dataset::from_reader(Cursor::new(dataset_text())).unwrap()
    }

    #[test]
    fn separable_feature_scores_perfectly() {
        let report = HoldoutEvaluator::new(0, -1.0, 1.0, SplitStrategy::Proportional)
            .run(three_class())
            .unwrap();
        assert_eq!(report.feature, 1);
        assert_eq!(report.training_points, 6);
        assert_eq!(report.testing_points, 6);
        assert_eq!(report.results.len(), 6);
        assert_eq!(report.correct, 6);
        assert_eq!(report.recognition_rate, 1.0);
        let acc = report
            .measurements
            .iter()
            .find(|m| m.name == "accuracy")
            .unwrap()
            .value;
        assert_eq!(acc, report.recognition_rate);
    }

    #[test]
    fn results_report_labels_not_positions() {
        let report = HoldoutEvaluator::new(0, -1.0, 1.0, SplitStrategy::Proportional)
            .run(three_class())
            .unwrap();
        let labels: Vec<usize> = report.results.iter().map(|r| r.expected).collect();
        assert_eq!(labels, vec![1, 1, 2, 2, 3, 3]);
        assert!(report.results.iter().all(PointResult::is_correct));
        assert_eq!(report.distributions[2].class_id, 3);
    }

    #[test]
    fn report_keys_classes_by_label() {
        let report = HoldoutEvaluator::new(0, -1.0, 1.0, SplitStrategy::Proportional)
            .run(three_class())
            .unwrap();
        let names: Vec<&str> = report.measurements.iter().map(|m| m.name.as_str()).collect();
        for id in [1, 2, 3] {
            assert!(names.contains(&format!("recall_class_{id}").as_str()));
        }
        assert!(!names.contains(&"recall_class_0"));
        assert_eq!(report.confusion, vec![vec![2, 0, 0], vec![0, 2, 0], vec![0, 0, 2]]);
    }

    #[test]
    fn even_split_sizes_testing_by_remainder() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[10.0, 11.0, 12.0, 13.0]]);
        let report = HoldoutEvaluator::new(0, -1.0, 1.0, SplitStrategy::Even)
            .run(ds)
            .unwrap();
        assert_eq!(report.training_points, 4);
        assert_eq!(report.testing_points, 6);
    }

    #[test]
    fn curve_uses_sweep_steps() {
        let report = HoldoutEvaluator::new(0, -1.0, 1.0, SplitStrategy::Proportional)
            .with_sweep_steps(10)
            .run(three_class())
            .unwrap();
        assert_eq!(report.density_curve.len(), 11);
        assert_eq!(report.density_curve.labels().len(), 3);
    }

    #[test]
    fn feature_out_of_range_is_rejected() {
        let err = HoldoutEvaluator::new(5, -1.0, 1.0, SplitStrategy::Proportional)
            .run(three_class())
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::FeatureOutOfRange {
                feature: 5,
                n_features: 2
            }
        ));
    }

    #[test]
    fn zero_variance_training_class_is_rejected() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0, 4.0], &[7.0, 7.0, 7.0, 7.0]]);
        let err = HoldoutEvaluator::new(0, -1.0, 1.0, SplitStrategy::Proportional)
            .run(ds)
            .unwrap_err();
        assert!(matches!(err, DatasetError::DegenerateVariance { .. }));
    }
}
