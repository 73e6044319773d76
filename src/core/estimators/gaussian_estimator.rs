/// Running mean and population variance of a sample (Welford).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaussianEstimator {
    count: usize,
    mean: f64,
    var_sum: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut est = Self::new();
        for v in values {
            est.add_observation(v);
        }
        est
    }

    pub fn add_observation(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;
        let last_mean = self.mean;
        self.mean += (value - last_mean) / self.count as f64;
        self.var_sum += (value - last_mean) * (value - self.mean);
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Population variance: the sum of squares is divided by `n`.
    pub fn variance(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.var_sum / self.count as f64).max(0.0))
    }
}
