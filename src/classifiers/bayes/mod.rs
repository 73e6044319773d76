pub mod bayes_classifier;

pub use bayes_classifier::{BayesClassifier, GaussianParams};
