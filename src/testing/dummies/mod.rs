mod datasets;

pub use datasets::{dataset_1d, dataset_text, two_feature_dataset};
