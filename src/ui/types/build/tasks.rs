use crate::streams::generators::GaussianBlobGenerator;
use crate::tasks::{FeatureRanking, HoldoutEvaluator};
use crate::ui::types::{build::BuildError, choices::*};
use std::convert::TryFrom;

fn check_bounds(lower: f64, upper: f64) -> Result<(), BuildError> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(BuildError::InvalidParameter(
            "normalize bounds must be finite".into(),
        ));
    }
    if lower > upper {
        return Err(BuildError::InvalidParameter(format!(
            "normalize_min ({lower}) is greater than normalize_max ({upper})"
        )));
    }
    Ok(())
}

impl TryFrom<&RankParams> for FeatureRanking {
    type Error = BuildError;

    fn try_from(p: &RankParams) -> Result<Self, Self::Error> {
        check_bounds(p.normalize_min, p.normalize_max)?;
        Ok(FeatureRanking::new(p.normalize_min, p.normalize_max, p.split))
    }
}

impl TryFrom<&ClassifyParams> for HoldoutEvaluator {
    type Error = BuildError;

    fn try_from(p: &ClassifyParams) -> Result<Self, Self::Error> {
        check_bounds(p.normalize_min, p.normalize_max)?;
        let feature = p
            .feature
            .checked_sub(1)
            .ok_or_else(|| BuildError::InvalidParameter("feature is 1-indexed".into()))?;
        if p.sweep_steps == 0 {
            return Err(BuildError::InvalidParameter(
                "sweep_steps must be at least 1".into(),
            ));
        }
        Ok(
            HoldoutEvaluator::new(feature, p.normalize_min, p.normalize_max, p.split)
                .with_sweep_steps(p.sweep_steps),
        )
    }
}

impl TryFrom<&GenerateParams> for GaussianBlobGenerator {
    type Error = BuildError;

    fn try_from(p: &GenerateParams) -> Result<Self, Self::Error> {
        GaussianBlobGenerator::new(
            p.classes,
            p.features,
            p.points_per_class,
            p.separation,
            p.spread,
            p.seed,
        )
        .map_err(BuildError::from)
    }
}
