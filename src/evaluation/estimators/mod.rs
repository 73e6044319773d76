mod basic_estimator;

pub use basic_estimator::BasicEstimator;

/// Scalar estimate that is fed one observation at a time.
pub trait Estimator {
    /// Folds in one observation. NaN marks "not applicable" and is skipped.
    fn add(&mut self, v: f64);

    fn estimation(&self) -> f64;
}
