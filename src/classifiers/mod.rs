pub mod bayes;
pub mod classifier;

pub use bayes::{BayesClassifier, GaussianParams};
pub use classifier::Classifier;
