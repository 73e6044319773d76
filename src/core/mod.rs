mod data_class;
mod dataset;
pub mod error;
pub mod estimators;

pub use data_class::DataClass;
pub use dataset::{Dataset, FeatureBounds, SplitStrategy};
pub use error::DatasetError;
