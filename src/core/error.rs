use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unable to find input file: {} to create dataset", .0.display())]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(
        "unexpected file format: first line should read \
         <number of points> <number of features> <number of classes>, got {0:?}"
    )]
    HeaderFormat(String),

    #[error("did not find correct number of classes: expected {expected}, found {found}")]
    ClassCountMismatch { expected: usize, found: usize },

    #[error("invalid number of feature points on line {line}: expected {expected}, found {found}")]
    FeaturePointCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("point has {found} features, class expects {expected}")]
    PointLength { expected: usize, found: usize },

    #[error("invalid value {token:?} on line {line}")]
    InvalidValue { line: usize, token: String },

    #[error("invalid class label {token:?} on line {line}: expected a non-negative integer")]
    InvalidClassLabel { line: usize, token: String },

    #[error("zero variance for feature {feature} (class {class_id})")]
    DegenerateVariance { class_id: usize, feature: usize },

    #[error("class {class_id} has no points")]
    EmptyClass { class_id: usize },

    #[error("cannot split {requested} points from class {class_id} holding {available}")]
    SplitTooLarge {
        class_id: usize,
        requested: usize,
        available: usize,
    },

    #[error("feature {feature} out of range: dataset has {n_features} features")]
    FeatureOutOfRange { feature: usize, n_features: usize },

    #[error("dataset has no classes")]
    EmptyDataset,
}
