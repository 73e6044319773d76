use crate::classifiers::Classifier;
use crate::core::{Dataset, DatasetError};
use crate::evaluation::{DensityCurve, DensityRow};
use crate::utils::math::{gaussian_density, gaussian_log_density};
use log::debug;
use serde::Serialize;

/// Fitted normal distribution of one class on the classifier's feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussianParams {
    pub class_id: usize,
    pub mean: f64,
    pub variance: f64,
}

impl GaussianParams {
    #[inline]
    pub fn density(&self, value: f64) -> f64 {
        gaussian_density(value, self.mean, self.variance)
    }

    #[inline]
    pub fn log_density(&self, value: f64) -> f64 {
        gaussian_log_density(value, self.mean, self.variance)
    }
}

/// Maximum-likelihood classifier on one feature with Gaussian class densities.
///
/// Priors are treated as equal. Parameters are stored in the class order of
/// the training dataset, so [`Classifier::classify`] returns a class
/// position; use [`BayesClassifier::class_id`] to get the label back.
#[derive(Debug, Clone, PartialEq)]
pub struct BayesClassifier {
    feature: usize,
    params: Vec<GaussianParams>,
    lower: f64,
    upper: f64,
}

impl BayesClassifier {
    /// Fits mean and population variance of `feature` for every class.
    ///
    /// `lower` and `upper` are the bounds the data was normalized to; they
    /// set the range of [`BayesClassifier::density_curve`].
    pub fn new(
        training: &Dataset,
        feature: usize,
        lower: f64,
        upper: f64,
    ) -> Result<Self, DatasetError> {
        if feature >= training.n_features() {
            return Err(DatasetError::FeatureOutOfRange {
                feature,
                n_features: training.n_features(),
            });
        }
        if training.n_classes() == 0 {
            return Err(DatasetError::EmptyDataset);
        }

        let params = training
            .classes()
            .iter()
            .map(|c| {
                let est = c.feature_estimator(feature);
                let (Some(mean), Some(variance)) = (est.mean(), est.variance()) else {
                    return Err(DatasetError::EmptyClass { class_id: c.id() });
                };
                if variance <= 0.0 {
                    return Err(DatasetError::DegenerateVariance {
                        class_id: c.id(),
                        feature,
                    });
                }
                debug!(
                    "class {}: mean={mean:.6} variance={variance:.6} (n={})",
                    c.id(),
                    c.n_points()
                );
                Ok(GaussianParams {
                    class_id: c.id(),
                    mean,
                    variance,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            feature,
            params,
            lower,
            upper,
        })
    }

    pub fn feature(&self) -> usize {
        self.feature
    }

    pub fn params(&self) -> &[GaussianParams] {
        &self.params
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// Label of the class at `position`.
    pub fn class_id(&self, position: usize) -> Option<usize> {
        self.params.get(position).map(|p| p.class_id)
    }

    /// Density of `value` under every class, in class position order.
    pub fn densities(&self, value: f64) -> Vec<f64> {
        self.params.iter().map(|p| p.density(value)).collect()
    }

    /// Log-likelihood of `value` under every class. These are the votes the
    /// classifier decides on.
    pub fn log_densities(&self, value: f64) -> Vec<f64> {
        self.params.iter().map(|p| p.log_density(value)).collect()
    }

    /// Samples every class density at `steps + 1` evenly spaced values
    /// spanning the normalization bounds.
    pub fn density_curve(&self, steps: usize) -> DensityCurve {
        let steps = steps.max(1);
        let width = (self.upper - self.lower) / steps as f64;
        let labels = self
            .params
            .iter()
            .map(|p| format!("class_{}", p.class_id))
            .collect();

        let mut curve = DensityCurve::new(labels);
        for i in 0..=steps {
            let value = if i == steps {
                self.upper
            } else {
                self.lower + width * i as f64
            };
            curve.push(DensityRow {
                value,
                densities: self.densities(value),
            });
        }
        curve
    }
}

impl Classifier for BayesClassifier {
    fn get_votes_for_value(&self, value: f64) -> Vec<f64> {
        self.log_densities(value)
    }

    fn number_of_classes(&self) -> usize {
        self.params.len()
    }
}
