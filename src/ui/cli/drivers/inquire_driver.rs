use crate::ui::cli::drivers::PromptDriver;
use anyhow::Result;
use inquire::{Confirm, CustomType, Text, validator::Validation};
use std::fmt::Display;

/// Terminal driver backed by `inquire`.
pub struct InquireDriver;

fn check_range<T: PartialOrd + Display>(x: &T, min: &Option<T>, max: &Option<T>) -> Validation {
    match (min, max) {
        (Some(lo), Some(hi)) if x < lo || x > hi => {
            Validation::Invalid(format!("Must be between {lo} and {hi}").into())
        }
        (Some(lo), None) if x < lo => Validation::Invalid(format!("Must be ≥ {lo}").into()),
        (None, Some(hi)) if x > hi => Validation::Invalid(format!("Must be ≤ {hi}").into()),
        _ => Validation::Valid,
    }
}

impl PromptDriver for InquireDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        Ok(Text::new(title)
            .with_initial_value(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        Ok(CustomType::<u64>::new(title)
            .with_default(default)
            .with_help_message(help)
            .with_validator(move |x: &u64| Ok(check_range(x, &min, &max)))
            .prompt()?)
    }

    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64> {
        Ok(CustomType::<f64>::new(title)
            .with_default(default)
            .with_help_message(help)
            .with_validator(move |x: &f64| {
                if !x.is_finite() {
                    return Ok(Validation::Invalid("Must be a finite number".into()));
                }
                Ok(check_range(x, &min, &max))
            })
            .prompt()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid(v: Validation) -> bool {
        matches!(v, Validation::Valid)
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(is_valid(check_range(&1u64, &Some(1), &Some(7))));
        assert!(is_valid(check_range(&7u64, &Some(1), &Some(7))));
        assert!(!is_valid(check_range(&0u64, &Some(1), &Some(7))));
        assert!(!is_valid(check_range(&8u64, &Some(1), &Some(7))));
    }

    #[test]
    fn one_sided_bounds() {
        assert!(!is_valid(check_range(&-0.5, &Some(0.0), &None)));
        assert!(is_valid(check_range(&3.0, &Some(0.0), &None)));
        assert!(!is_valid(check_range(&3.0, &None, &Some(2.0))));
        assert!(is_valid(check_range(&3.0, &None, &None)));
    }
}
