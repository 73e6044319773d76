use crate::core::error::DatasetError;
use crate::core::estimators::GaussianEstimator;
use std::io::{self, Write};

/// All points sharing one class label.
///
/// Every point holds exactly `n_features` values; the length is fixed when
/// the class is created.
#[derive(Debug, Clone, PartialEq)]
pub struct DataClass {
    id: usize,
    n_features: usize,
    points: Vec<Vec<f64>>,
}

impl DataClass {
    pub fn new(id: usize, n_features: usize) -> Self {
        Self {
            id,
            n_features,
            points: Vec::new(),
        }
    }

    /// Builds a class from existing points, checking every length.
    pub fn with_points(
        id: usize,
        n_features: usize,
        points: Vec<Vec<f64>>,
    ) -> Result<Self, DatasetError> {
        let mut class = Self::new(id, n_features);
        for p in points {
            class.add_data_point(p)?;
        }
        Ok(class)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn add_data_point(&mut self, point: Vec<f64>) -> Result<(), DatasetError> {
        if point.len() != self.n_features {
            return Err(DatasetError::PointLength {
                expected: self.n_features,
                found: point.len(),
            });
        }
        self.points.push(point);
        Ok(())
    }

    /// Value of `feature` for the point at `index`.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn point(&self, index: usize, feature: usize) -> f64 {
        self.points[index][feature]
    }

    pub fn feature_values(&self, feature: usize) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(move |p| p[feature])
    }

    pub fn feature_min(&self, feature: usize) -> Option<f64> {
        self.feature_values(feature).reduce(f64::min)
    }

    pub fn feature_max(&self, feature: usize) -> Option<f64> {
        self.feature_values(feature).reduce(f64::max)
    }

    pub fn feature_estimator(&self, feature: usize) -> GaussianEstimator {
        GaussianEstimator::from_values(self.feature_values(feature))
    }

    pub fn feature_mean(&self, feature: usize) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.feature_values(feature).sum();
        Some(sum / self.points.len() as f64)
    }

    /// Population variance (divides by `n`).
    pub fn feature_variance(&self, feature: usize) -> Option<f64> {
        self.feature_estimator(feature).variance()
    }

    /// Rescales `feature` of every point from `[min, max]` onto `[a, b]`.
    ///
    /// `min` and `max` come from the caller so that a whole dataset shares
    /// the same map. A zero-width range sends every value to `a`.
    pub fn normalize_feature(&mut self, a: f64, b: f64, min: f64, max: f64, feature: usize) {
        // halved so that `max - min` stays finite for any finite pair
        let half_range = max / 2.0 - min / 2.0;
        for p in &mut self.points {
            p[feature] = if half_range == 0.0 {
                a
            } else {
                let t = (p[feature] / 2.0 - min / 2.0) / half_range;
                a + t * (b - a)
            };
        }
    }

    /// Removes the last `n` points and returns them as a class with the same id.
    pub fn split_even(&mut self, n: usize) -> Result<DataClass, DatasetError> {
        if n > self.points.len() {
            return Err(DatasetError::SplitTooLarge {
                class_id: self.id,
                requested: n,
                available: self.points.len(),
            });
        }
        let at = self.points.len() - n;
        Ok(DataClass {
            id: self.id,
            n_features: self.n_features,
            points: self.points.split_off(at),
        })
    }

    /// Removes the last `floor(n / 2)` points; `ceil(n / 2)` stay behind.
    pub fn split(&mut self) -> DataClass {
        let at = self.points.len() - self.points.len() / 2;
        DataClass {
            id: self.id,
            n_features: self.n_features,
            points: self.points.split_off(at),
        }
    }

    /// One line per point: the features joined by `delimiter`, then the id.
    pub fn write<W: Write>(&self, out: &mut W, delimiter: &str) -> io::Result<()> {
        for p in &self.points {
            for v in p {
                write!(out, "{v}{delimiter}")?;
            }
            writeln!(out, "{}", self.id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPS: f64 = 1e-12;

    fn class_of(id: usize, values: &[f64]) -> DataClass {
        DataClass::with_points(id, 1, values.iter().map(|v| vec![*v]).collect()).unwrap()
    }

    #[test]
    fn rejects_point_of_wrong_length() {
        let mut c = DataClass::new(0, 2);
        assert!(c.add_data_point(vec![1.0, 2.0]).is_ok());
        let err = c.add_data_point(vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::PointLength {
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(c.n_points(), 1);
    }

    #[test]
    fn point_reads_feature_value() {
        let c = DataClass::with_points(3, 2, vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(c.point(1, 0), 3.0);
        assert_eq!(c.point(0, 1), 2.0);
    }

    #[test]
    #[should_panic]
    fn point_out_of_range_panics() {
        let c = class_of(0, &[1.0]);
        c.point(1, 0);
    }

    #[test]
    fn min_max_mean_variance() {
        let c = class_of(0, &[1.0, 2.0, 3.0]);
        assert_eq!(c.feature_min(0), Some(1.0));
        assert_eq!(c.feature_max(0), Some(3.0));
        assert!((c.feature_mean(0).unwrap() - 2.0).abs() < EPS);
        assert!((c.feature_variance(0).unwrap() - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn statistics_of_empty_class_are_none() {
        let c = DataClass::new(1, 1);
        assert!(c.feature_min(0).is_none());
        assert!(c.feature_max(0).is_none());
        assert!(c.feature_mean(0).is_none());
        assert!(c.feature_variance(0).is_none());
    }

    #[test]
    fn normalize_uses_supplied_bounds() {
        let mut c = class_of(0, &[2.0, 4.0]);
        c.normalize_feature(-1.0, 1.0, 0.0, 8.0, 0);
        assert!((c.point(0, 0) + 0.5).abs() < EPS);
        assert!((c.point(1, 0) - 0.0).abs() < EPS);
    }

    #[test]
    fn normalize_zero_range_maps_to_lower_bound() {
        let mut c = class_of(0, &[5.0, 5.0]);
        c.normalize_feature(-1.0, 1.0, 5.0, 5.0, 0);
        assert!(c.feature_values(0).all(|v| v == -1.0));
    }

    #[test]
    fn normalize_touches_only_one_feature() {
        let mut c = DataClass::with_points(0, 2, vec![vec![0.0, 10.0], vec![4.0, 20.0]]).unwrap();
        c.normalize_feature(0.0, 1.0, 0.0, 4.0, 0);
        assert_eq!(c.point(1, 0), 1.0);
        assert_eq!(c.point(1, 1), 20.0);
    }

    #[test]
    fn split_even_takes_tail() {
        let mut c = class_of(7, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let tail = c.split_even(2).unwrap();
        assert_eq!(tail.id(), 7);
        assert_eq!(tail.feature_values(0).collect::<Vec<_>>(), vec![4.0, 5.0]);
        assert_eq!(c.feature_values(0).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn split_even_all_and_none() {
        let mut c = class_of(0, &[1.0, 2.0]);
        assert_eq!(c.split_even(0).unwrap().n_points(), 0);
        assert_eq!(c.split_even(2).unwrap().n_points(), 2);
        assert!(c.is_empty());
    }

    #[test]
    fn split_even_too_many_leaves_class_untouched() {
        let mut c = class_of(4, &[1.0, 2.0]);
        let err = c.split_even(3).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::SplitTooLarge {
                class_id: 4,
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(c.n_points(), 2);
    }

    #[test]
    fn split_odd_keeps_ceil_half() {
        let mut c = class_of(0, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let removed = c.split();
        assert_eq!(removed.n_points(), 2);
        assert_eq!(c.n_points(), 3);
        assert_eq!(removed.feature_values(0).collect::<Vec<_>>(), vec![4.0, 5.0]);
    }

    #[test]
    fn split_even_count_halves_exactly() {
        let mut c = class_of(0, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(c.split().n_points(), 2);
        assert_eq!(c.n_points(), 2);

        let mut single = class_of(0, &[1.0]);
        assert_eq!(single.split().n_points(), 0);
        assert_eq!(single.n_points(), 1);
    }

    #[test]
    fn write_appends_class_id() {
        let c = DataClass::with_points(2, 2, vec![vec![1.5, -2.0], vec![0.25, 3.0]]).unwrap();
        let mut buf = Vec::new();
        c.write(&mut buf, "\t").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1.5\t-2\t2\n0.25\t3\t2\n");
    }
}
