use crate::core::data_class::DataClass;
use crate::core::error::DatasetError;
use crate::utils::file_parsing::{
    parse_class_label, parse_feature_value, parse_header_line, split_line_into_tokens,
};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Bounds used to normalize one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBounds {
    pub min: f64,
    pub max: f64,
}

/// How a dataset is halved into a remainder and an extracted partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SplitStrategy {
    /// Every class gives `ceil(min_class_size / 2)` points.
    #[default]
    Even,
    /// Every class gives `floor(n / 2)` of its own points.
    Proportional,
}

/// Labeled points grouped by class.
///
/// Classes are kept in order of first appearance in the source, so the
/// position of a class is not necessarily its label. Use [`Dataset::class`]
/// for positional access and [`Dataset::class_by_id`] to look up a label.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    n_features: usize,
    classes: Vec<DataClass>,
}

impl Dataset {
    /// Wraps already built classes. Every class must have `n_features` features.
    pub fn new(n_features: usize, classes: Vec<DataClass>) -> Result<Self, DatasetError> {
        if let Some(c) = classes.iter().find(|c| c.n_features() != n_features) {
            return Err(DatasetError::PointLength {
                expected: n_features,
                found: c.n_features(),
            });
        }
        Ok(Self {
            n_features,
            classes,
        })
    }

    /// Parses a dataset file.
    ///
    /// The first line reads `<points> <features> <classes>`, every following
    /// line `<feature_1> ... <feature_N> <classID>`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file =
            File::open(path).map_err(|_| DatasetError::FileNotFound(path.to_path_buf()))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DatasetError> {
        let mut lines = reader.lines();

        let header_line = match lines.next() {
            Some(line) => line?,
            None => String::new(),
        };
        let header = parse_header_line(&header_line)
            .ok_or_else(|| DatasetError::HeaderFormat(header_line.clone()))?;

        let mut classes: Vec<DataClass> = Vec::new();
        for (i, line) in lines.enumerate() {
            let line = line?;
            let line_no = i + 2;
            let tokens = split_line_into_tokens(&line);
            let Some((label, features)) = tokens.split_last() else {
                continue;
            };
            if features.len() != header.n_features {
                return Err(DatasetError::FeaturePointCount {
                    line: line_no,
                    expected: header.n_features,
                    found: features.len(),
                });
            }

            let class_id =
                parse_class_label(label).ok_or_else(|| DatasetError::InvalidClassLabel {
                    line: line_no,
                    token: label.to_string(),
                })?;
            let point = features
                .iter()
                .map(|t| {
                    parse_feature_value(t).ok_or_else(|| DatasetError::InvalidValue {
                        line: line_no,
                        token: t.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;

            let position = match classes.iter().position(|c| c.id() == class_id) {
                Some(p) => p,
                None => {
                    classes.push(DataClass::new(class_id, header.n_features));
                    classes.len() - 1
                }
            };
            classes[position].add_data_point(point)?;
        }

        if classes.len() != header.n_classes {
            return Err(DatasetError::ClassCountMismatch {
                expected: header.n_classes,
                found: classes.len(),
            });
        }

        let dataset = Self {
            n_features: header.n_features,
            classes,
        };
        if dataset.n_points() != header.n_points {
            warn!(
                "header declares {} points but {} were read",
                header.n_points,
                dataset.n_points()
            );
        }
        Ok(dataset)
    }

    pub fn n_points(&self) -> usize {
        self.classes.iter().map(DataClass::n_points).sum()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[DataClass] {
        &self.classes
    }

    /// Class stored at `position`.
    ///
    /// # Panics
    /// If `position >= n_classes()`.
    pub fn class(&self, position: usize) -> &DataClass {
        &self.classes[position]
    }

    pub fn class_by_id(&self, id: usize) -> Option<&DataClass> {
        self.classes.iter().find(|c| c.id() == id)
    }

    pub fn position_of(&self, id: usize) -> Option<usize> {
        self.classes.iter().position(|c| c.id() == id)
    }

    pub fn min_points_in_class(&self) -> Option<usize> {
        self.classes.iter().map(DataClass::n_points).min()
    }

    /// Global min and max of `feature` over every class.
    pub fn feature_bounds(&self, feature: usize) -> Option<FeatureBounds> {
        let min = self
            .classes
            .iter()
            .filter_map(|c| c.feature_min(feature))
            .reduce(f64::min)?;
        let max = self
            .classes
            .iter()
            .filter_map(|c| c.feature_max(feature))
            .reduce(f64::max)?;
        Some(FeatureBounds { min, max })
    }

    /// Rescales every feature onto `[a, b]` using dataset-wide bounds.
    ///
    /// All bounds are computed before any value changes. Returns the bounds
    /// applied to each feature (`None` for a dataset without points).
    pub fn normalize(&mut self, a: f64, b: f64) -> Vec<Option<FeatureBounds>> {
        let bounds: Vec<Option<FeatureBounds>> = (0..self.n_features)
            .map(|f| self.feature_bounds(f))
            .collect();

        for (f, b_f) in bounds.iter().enumerate() {
            let Some(FeatureBounds { min, max }) = *b_f else {
                continue;
            };
            debug!("normalizing feature {f} from [{min}, {max}] to [{a}, {b}]");
            for class in &mut self.classes {
                class.normalize_feature(a, b, min, max, f);
            }
        }
        bounds
    }

    /// Balanced split: every class gives `ceil(min_class_size / 2)` points.
    ///
    /// Returns `(remainder, extracted)`. The extracted dataset holds the same
    /// number of points for every class.
    pub fn split_even(mut self) -> Result<(Dataset, Dataset), DatasetError> {
        let k = self.min_points_in_class().unwrap_or(0).div_ceil(2);
        debug!("even split: {k} points per class");

        let extracted = self
            .classes
            .iter_mut()
            .map(|c| c.split_even(k))
            .collect::<Result<Vec<_>, _>>()?;

        let extracted = Dataset {
            n_features: self.n_features,
            classes: extracted,
        };
        Ok((self, extracted))
    }

    /// Proportional split: every class gives `floor(n / 2)` of its points.
    ///
    /// Returns `(remainder, extracted)`.
    pub fn split(mut self) -> (Dataset, Dataset) {
        let extracted: Vec<DataClass> = self.classes.iter_mut().map(DataClass::split).collect();
        let extracted = Dataset {
            n_features: self.n_features,
            classes: extracted,
        };
        debug!(
            "proportional split: {} kept, {} extracted",
            self.n_points(),
            extracted.n_points()
        );
        (self, extracted)
    }

    /// Splits with the given strategy. Returns `(remainder, extracted)`.
    pub fn partition(self, strategy: SplitStrategy) -> Result<(Dataset, Dataset), DatasetError> {
        match strategy {
            SplitStrategy::Even => self.split_even(),
            SplitStrategy::Proportional => Ok(self.split()),
        }
    }

    /// Fisher Discriminant Ratio of `feature`.
    ///
    /// Sums `(mean_i - mean_j)^2 / (var_i + var_j)` over every ordered pair of
    /// distinct classes, so each unordered pair contributes twice.
    pub fn fdr_for_feature(&self, feature: usize) -> Result<f64, DatasetError> {
        if feature >= self.n_features {
            return Err(DatasetError::FeatureOutOfRange {
                feature,
                n_features: self.n_features,
            });
        }

        let moments = self
            .classes
            .iter()
            .map(|c| {
                let est = c.feature_estimator(feature);
                match (est.mean(), est.variance()) {
                    (Some(m), Some(v)) => Ok((c.id(), m, v)),
                    _ => Err(DatasetError::EmptyClass { class_id: c.id() }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut sum = 0.0;
        for (i, &(id_i, mean_i, var_i)) in moments.iter().enumerate() {
            for (j, &(id_j, mean_j, var_j)) in moments.iter().enumerate() {
                if i == j {
                    continue;
                }
                let den = var_i + var_j;
                if den <= 0.0 {
                    let class_id = if var_i <= 0.0 { id_i } else { id_j };
                    return Err(DatasetError::DegenerateVariance { class_id, feature });
                }
                sum += (mean_i - mean_j).powi(2) / den;
            }
        }
        Ok(sum)
    }

    /// FDR of every feature, in feature order.
    pub fn rank_features(&self) -> Result<Vec<f64>, DatasetError> {
        (0..self.n_features)
            .map(|f| self.fdr_for_feature(f))
            .collect()
    }

    /// Writes the header line followed by every class.
    ///
    /// Classes without points have no rows to carry their label, so they are
    /// left out of the class count and the output parses back.
    pub fn write<W: Write>(&self, out: &mut W, delimiter: &str) -> io::Result<()> {
        let written = self.classes.iter().filter(|c| !c.is_empty()).count();
        if written != self.n_classes() {
            debug!("skipping {} empty classes", self.n_classes() - written);
        }
        writeln!(
            out,
            "{}{d}{}{d}{}",
            self.n_points(),
            self.n_features,
            written,
            d = delimiter
        )?;
        for class in self.classes.iter().filter(|c| !c.is_empty()) {
            class.write(out, delimiter)?;
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P, delimiter: &str) -> io::Result<()> {
        let mut w = io::BufWriter::new(File::create(path)?);
        self.write(&mut w, delimiter)?;
        w.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::{dataset_1d, two_feature_dataset};
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    const EPS: f64 = 1e-9;

    fn parse(text: &str) -> Result<Dataset, DatasetError> {
        Dataset::from_reader(Cursor::new(text))
    }

    #[test]
    fn parses_counts_from_well_formed_input() {
        let ds = parse("6 2 3\n1 2 0\n3 4 0\n5 6 1\n7 8 1\n9 10 2\n11 12 2\n").unwrap();
        assert_eq!(ds.n_points(), 6);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.n_classes(), 3);
        assert_eq!(ds.class_by_id(1).unwrap().point(1, 1), 8.0);
    }

    #[test]
    fn classes_follow_first_appearance() {
        let ds = parse("4 1 2\n1.0 3\n2.0 1\n3.0 3\n4.0 1\n").unwrap();
        assert_eq!(ds.class(0).id(), 3);
        assert_eq!(ds.class(1).id(), 1);
        assert_eq!(ds.position_of(1), Some(1));
        assert!(ds.class_by_id(2).is_none());
    }

    #[test]
    fn skips_blank_lines_and_accepts_tabs() {
        let ds = parse("2 2 1\n\n1.5\t2.5\t1\n   \n3.5 4.5 1\n").unwrap();
        assert_eq!(ds.n_points(), 2);
    }

    #[test]
    fn bad_header_is_rejected() {
        let err = parse("points features classes\n1 0\n").unwrap_err();
        assert!(matches!(err, DatasetError::HeaderFormat(_)));
        assert!(matches!(parse("").unwrap_err(), DatasetError::HeaderFormat(_)));
    }

    #[test]
    fn row_with_wrong_feature_count_is_rejected() {
        let err = parse("2 2 1\n1 2 0\n1 0\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::FeaturePointCount {
                line: 3,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn class_count_mismatch_is_rejected() {
        let err = parse("2 1 3\n1 0\n2 1\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ClassCountMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn huge_header_counts_fail_cleanly() {
        let err = parse("1 1 18446744073709551615\n1.0 0\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ClassCountMismatch {
                expected: usize::MAX,
                found: 1
            }
        ));

        let err = parse("1 18446744073709551615 1\n1.0 0\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::FeaturePointCount {
                line: 2,
                expected: usize::MAX,
                found: 1
            }
        ));
    }

    #[test]
    fn bad_value_and_label_are_rejected() {
        assert!(matches!(
            parse("1 1 1\nabc 0\n").unwrap_err(),
            DatasetError::InvalidValue { line: 2, .. }
        ));
        assert!(matches!(
            parse("1 1 1\n1.0 -2\n").unwrap_err(),
            DatasetError::InvalidClassLabel { line: 2, .. }
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Dataset::from_path("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, DatasetError::FileNotFound(_)));
    }

    #[test]
    fn explicit_constructor_checks_feature_count() {
        let c = DataClass::new(0, 3);
        assert!(Dataset::new(2, vec![c]).is_err());
    }

    #[test]
    fn normalize_hits_both_bounds_and_stays_inside() {
        let mut ds = two_feature_dataset();
        ds.normalize(-1.0, 1.0);
        for f in 0..ds.n_features() {
            let b = ds.feature_bounds(f).unwrap();
            assert!((b.min + 1.0).abs() < EPS);
            assert!((b.max - 1.0).abs() < EPS);
        }
        for c in ds.classes() {
            for p in c.points() {
                assert!(p.iter().all(|v| (-1.0 - EPS..=1.0 + EPS).contains(v)));
            }
        }
    }

    #[test]
    fn normalize_uses_global_bounds_across_classes() {
        let mut ds = dataset_1d(&[&[0.0, 1.0], &[3.0, 4.0]]);
        let bounds = ds.normalize(0.0, 1.0);
        assert_eq!(bounds, vec![Some(FeatureBounds { min: 0.0, max: 4.0 })]);
        assert!((ds.class(0).point(1, 0) - 0.25).abs() < EPS);
        assert!((ds.class(1).point(0, 0) - 0.75).abs() < EPS);
    }

    #[test]
    fn normalize_extreme_finite_values_stays_finite() {
        let mut ds = dataset_1d(&[&[-1e308, 0.0], &[1e308, 5.0]]);
        ds.normalize(-1.0, 1.0);
        let values: Vec<f64> = ds.classes().iter().flat_map(|c| c.feature_values(0)).collect();
        assert!(values.iter().all(|v| v.is_finite()));
        assert_eq!(values[0], -1.0);
        assert_eq!(values[2], 1.0);
        assert!(values[1].abs() < EPS);
        assert!(values[3].abs() < EPS);
    }

    #[test]
    fn normalize_constant_feature_maps_to_lower_bound() {
        let mut ds = dataset_1d(&[&[2.0, 2.0], &[2.0]]);
        ds.normalize(-1.0, 1.0);
        assert!(ds.classes().iter().all(|c| c.feature_values(0).all(|v| v == -1.0)));
    }

    #[test]
    fn split_even_balances_extracted_part() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], &[1.0, 2.0, 3.0]]);
        let (rest, extracted) = ds.split_even().unwrap();
        // ceil(3 / 2) == 2
        assert_eq!(extracted.class(0).n_points(), 2);
        assert_eq!(extracted.class(1).n_points(), 2);
        assert_eq!(extracted.n_points(), 4);
        assert_eq!(rest.class(0).n_points(), 5);
        assert_eq!(rest.class(1).n_points(), 1);
        assert_eq!(rest.n_points(), 6);
        assert_eq!(extracted.class(1).id(), rest.class(1).id());
    }

    #[test]
    fn repeated_split_even_shrinks_remainder() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]]);
        let (rest, first) = ds.split_even().unwrap();
        assert_eq!(first.n_points(), 4);
        let (rest, second) = rest.split_even().unwrap();
        assert_eq!(second.n_points(), 2);
        assert_eq!(rest.n_points(), 2);
    }

    #[test]
    fn split_even_of_empty_dataset_is_empty() {
        let ds = Dataset::new(1, vec![]).unwrap();
        let (rest, extracted) = ds.split_even().unwrap();
        assert_eq!(rest.n_points(), 0);
        assert_eq!(extracted.n_classes(), 0);
    }

    #[test]
    fn proportional_split_halves_each_class() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0]]);
        let (rest, extracted) = ds.split();
        assert_eq!(extracted.class(0).n_points(), 2);
        assert_eq!(rest.class(0).n_points(), 3);
        assert_eq!(extracted.class(1).n_points(), 2);
        assert_eq!(rest.class(1).n_points(), 2);
        assert_eq!(rest.n_points() + extracted.n_points(), 9);
    }

    #[test]
    fn partition_dispatches_on_strategy() {
        let make = || dataset_1d(&[&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[1.0, 2.0]]);
        let (_, even) = make().partition(SplitStrategy::Even).unwrap();
        assert_eq!(even.n_points(), 2);
        let (_, prop) = make().partition(SplitStrategy::Proportional).unwrap();
        assert_eq!(prop.n_points(), 4);
    }

    #[test]
    fn fdr_example_is_about_54() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0]]);
        let fdr = ds.fdr_for_feature(0).unwrap();
        assert!((fdr - 54.0).abs() < 1e-9, "fdr={fdr}");
    }

    #[test]
    fn fdr_is_zero_for_identical_classes() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]]);
        assert_eq!(ds.fdr_for_feature(0).unwrap(), 0.0);
    }

    #[test]
    fn fdr_counts_each_pair_twice() {
        let ds = dataset_1d(&[&[0.0, 2.0], &[4.0, 6.0], &[8.0, 10.0]]);
        // variances all 1: pairs (0,1)=16/2, (0,2)=64/2, (1,2)=16/2, each twice
        let fdr = ds.fdr_for_feature(0).unwrap();
        assert!((fdr - 96.0).abs() < 1e-9);
    }

    #[test]
    fn fdr_rejects_zero_variance_pair() {
        let ds = dataset_1d(&[&[1.0, 1.0], &[2.0, 2.0]]);
        assert!(matches!(
            ds.fdr_for_feature(0).unwrap_err(),
            DatasetError::DegenerateVariance { feature: 0, .. }
        ));
    }

    #[test]
    fn fdr_rejects_empty_class_and_bad_feature() {
        let ds = Dataset::new(1, vec![DataClass::new(5, 1)]).unwrap();
        assert!(matches!(
            ds.fdr_for_feature(0).unwrap_err(),
            DatasetError::EmptyClass { class_id: 5 }
        ));
        assert!(matches!(
            ds.fdr_for_feature(1).unwrap_err(),
            DatasetError::FeatureOutOfRange { .. }
        ));
    }

    #[test]
    fn rank_features_prefers_separating_feature() {
        let scores = two_feature_dataset().rank_features().unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn write_then_parse_round_trips() {
        let mut ds = two_feature_dataset();
        ds.normalize(-1.0, 1.0);

        let tf = NamedTempFile::new().unwrap();
        ds.write_to_path(tf.path(), " ").unwrap();
        let back = Dataset::from_path(tf.path()).unwrap();

        assert_eq!(back, ds);
    }

    #[test]
    fn written_partition_with_empty_class_parses_back() {
        let ds = dataset_1d(&[&[1.0, 2.0, 3.0], &[9.0]]);
        let (_, extracted) = ds.split();
        assert_eq!(extracted.n_classes(), 2);
        assert!(extracted.class(1).is_empty());

        let mut buf = Vec::new();
        extracted.write(&mut buf, " ").unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "1 1 1\n3 0\n");

        let back = Dataset::from_reader(Cursor::new(buf)).unwrap();
        assert_eq!(back.n_classes(), 1);
        assert_eq!(back.n_points(), 1);
        assert_eq!(back.class(0).id(), 0);
    }

    #[test]
    fn write_emits_header_first() {
        let ds = dataset_1d(&[&[1.0], &[2.5]]);
        let mut buf = Vec::new();
        ds.write(&mut buf, ",").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2,1,2\n1,0\n2.5,1\n");
    }
}
