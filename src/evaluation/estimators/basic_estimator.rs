use crate::evaluation::estimators::Estimator;

/// Running mean, `sum / count`; NaN until something was added.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BasicEstimator {
    count: f64,
    sum: f64,
}

impl Estimator for BasicEstimator {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.count += 1.0;
        self.sum += v;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.count > 0.0 {
            self.sum / self.count
        } else {
            f64::NAN
        }
    }
}
