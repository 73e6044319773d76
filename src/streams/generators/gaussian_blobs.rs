use std::io::{Error, ErrorKind};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::core::{DataClass, Dataset, DatasetError};

/// Synthetic labeled data: one normal blob per class, labels starting at 1.
///
/// The mean of class `c` on feature `f` is `c * separation / (f + 1)`, so
/// separability falls off with the feature index and feature 0 ranks best.
#[derive(Debug)]
pub struct GaussianBlobGenerator {
    rng: StdRng,
    points_per_class: usize,
    /// `blobs[c][f]` draws feature `f` of class `c`.
    blobs: Vec<Vec<Normal<f64>>>,
}

impl GaussianBlobGenerator {
    pub fn new(
        n_classes: usize,
        n_features: usize,
        points_per_class: usize,
        separation: f64,
        spread: f64,
        seed: u64,
    ) -> Result<Self, Error> {
        if n_classes == 0 || n_features == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "need at least one class and one feature",
            ));
        }
        if spread == 0.0 || spread.is_infinite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "spread must be a positive finite number",
            ));
        }
        if !separation.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "separation must be finite",
            ));
        }

        let blobs = (0..n_classes)
            .map(|c| {
                (0..n_features)
                    .map(|f| {
                        let mean = c as f64 * separation / (f + 1) as f64;
                        Normal::new(mean, spread).map_err(|e| {
                            Error::new(ErrorKind::InvalidInput, format!("spread {spread}: {e}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            points_per_class,
            blobs,
        })
    }

    pub fn generate(&mut self) -> Result<Dataset, DatasetError> {
        let n_features = self.blobs.first().map_or(0, Vec::len);
        let mut classes = Vec::with_capacity(self.blobs.len());
        for (c, blob) in self.blobs.iter().enumerate() {
            let mut class = DataClass::new(c + 1, n_features);
            for _ in 0..self.points_per_class {
                let point: Vec<f64> = blob.iter().map(|d| d.sample(&mut self.rng)).collect();
                class.add_data_point(point)?;
            }
            classes.push(class);
        }
        Dataset::new(n_features, classes)
    }
}
