mod feature_ranking;
mod holdout_evaluator;

pub use feature_ranking::{FeatureRanking, FeatureRankingReport, FeatureScore};
pub use holdout_evaluator::{HoldoutEvaluator, HoldoutReport, PointResult};
