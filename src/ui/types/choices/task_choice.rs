use crate::core::SplitStrategy;
use crate::evaluation::CurveFormat;
use crate::ui::cli::drivers::PromptDriver;
use crate::ui::cli::wizard::prompt_path_until_ok;
use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_normalize_min() -> f64 {
    -1.0
}
fn default_normalize_max() -> f64 {
    1.0
}
fn default_feature() -> usize {
    1
}
fn default_sweep_steps() -> usize {
    200
}
fn default_proportional() -> SplitStrategy {
    SplitStrategy::Proportional
}
fn default_seed() -> u64 {
    42
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RankParams {
    #[schemars(
        with = "String",
        title = "Dataset Path",
        description = "Whitespace separated dataset file",
        extend("format" = "path", "x-must-exist" = true)
    )]
    pub path: PathBuf,

    #[serde(default = "default_normalize_min")]
    #[schemars(title = "Normalize Min", description = "Lower bound of the normalized range")]
    pub normalize_min: f64,

    #[serde(default = "default_normalize_max")]
    #[schemars(title = "Normalize Max", description = "Upper bound of the normalized range")]
    pub normalize_max: f64,

    #[serde(default)]
    #[schemars(
        title = "Split",
        description = "How the training partition is taken from the dataset"
    )]
    pub split: SplitStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassifyParams {
    #[schemars(
        with = "String",
        title = "Dataset Path",
        description = "Whitespace separated dataset file",
        extend("format" = "path", "x-must-exist" = true)
    )]
    pub path: PathBuf,

    #[serde(default = "default_feature")]
    #[schemars(
        title = "Feature",
        description = "1-indexed feature the classifier uses",
        range(min = 1)
    )]
    pub feature: usize,

    #[serde(default = "default_normalize_min")]
    #[schemars(title = "Normalize Min", description = "Lower bound of the normalized range")]
    pub normalize_min: f64,

    #[serde(default = "default_normalize_max")]
    #[schemars(title = "Normalize Max", description = "Upper bound of the normalized range")]
    pub normalize_max: f64,

    #[serde(default = "default_proportional")]
    #[schemars(
        title = "Split",
        description = "How the training partition is taken from the dataset"
    )]
    pub split: SplitStrategy,

    #[serde(default)]
    #[schemars(
        with = "Option<String>",
        title = "Distributions Path",
        description = "Where to export the class density curves (None = derived from the dataset name)"
    )]
    pub distributions_path: Option<PathBuf>,

    #[serde(default)]
    #[schemars(title = "Export Format", description = "Format of the density curve export")]
    pub format: CurveFormat,

    #[serde(default = "default_sweep_steps")]
    #[schemars(
        title = "Sweep Steps",
        description = "Number of intervals the normalized range is sampled in",
        range(min = 1)
    )]
    pub sweep_steps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateParams {
    #[schemars(
        with = "String",
        title = "Output Path",
        description = "File the dataset is written to",
        extend("format" = "path")
    )]
    pub output: PathBuf,

    #[schemars(title = "Classes", range(min = 1))]
    pub classes: usize,

    #[schemars(title = "Features", range(min = 1))]
    pub features: usize,

    #[schemars(title = "Points Per Class", range(min = 0))]
    pub points_per_class: usize,

    #[schemars(
        title = "Separation",
        description = "Distance between neighbouring class means on feature 1"
    )]
    pub separation: f64,

    #[schemars(title = "Spread", description = "Standard deviation of every blob")]
    pub spread: f64,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed")]
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Rank Features",
        detailed_message = "Score every feature by its Fisher Discriminant Ratio."
    ))]
    RankFeatures(RankParams),

    #[strum_discriminants(strum(
        message = "Classify",
        detailed_message = "Train a Gaussian Bayes classifier on one feature and test it."
    ))]
    Classify(ClassifyParams),

    #[strum_discriminants(strum(
        message = "Generate",
        detailed_message = "Write a synthetic dataset of Gaussian blobs."
    ))]
    Generate(GenerateParams),
}

impl UIChoice for TaskChoice {
    type Kind = TaskKind;

    fn schema() -> Schema {
        schema_for!(TaskChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a task:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            TaskKind::RankFeatures => json!({
                "path": "",
                "normalize_min": default_normalize_min(),
                "normalize_max": default_normalize_max(),
                "split": SplitStrategy::Even,
            }),
            TaskKind::Classify => json!({
                "path": "",
                "feature": default_feature(),
                "normalize_min": default_normalize_min(),
                "normalize_max": default_normalize_max(),
                "split": SplitStrategy::Proportional,
                "distributions_path": null,
                "format": CurveFormat::Csv,
                "sweep_steps": default_sweep_steps(),
            }),
            TaskKind::Generate => json!({
                "output": "dataset.txt",
                "classes": 3,
                "features": 7,
                "points_per_class": 70,
                "separation": 2.0,
                "spread": 1.0,
                "seed": default_seed(),
            }),
        }
    }

    fn prompt_params<D: PromptDriver>(
        driver: &D,
        kind: Self::Kind,
        mut params: Map<String, Value>,
    ) -> anyhow::Result<Map<String, Value>> {
        let f64_of = |m: &Map<String, Value>, k: &str| m.get(k).and_then(Value::as_f64).unwrap_or(0.0);
        let u64_of = |m: &Map<String, Value>, k: &str| m.get(k).and_then(Value::as_u64).unwrap_or(0);

        match kind {
            TaskKind::RankFeatures | TaskKind::Classify => {
                let path = prompt_path_until_ok(
                    driver,
                    "Dataset Path",
                    "Whitespace separated dataset file",
                    "",
                    true,
                )?;
                params.insert("path".into(), json!(path));

                if kind == TaskKind::Classify {
                    let feature = driver.ask_u64(
                        "Feature",
                        "1-indexed feature the classifier uses",
                        u64_of(&params, "feature"),
                        Some(1),
                        None,
                    )?;
                    params.insert("feature".into(), json!(feature));
                }

                let lo = driver.ask_f64(
                    "Normalize Min",
                    "Lower bound of the normalized range",
                    f64_of(&params, "normalize_min"),
                    None,
                    None,
                )?;
                let hi = driver.ask_f64(
                    "Normalize Max",
                    "Upper bound of the normalized range",
                    f64_of(&params, "normalize_max"),
                    Some(lo),
                    None,
                )?;
                params.insert("normalize_min".into(), json!(lo));
                params.insert("normalize_max".into(), json!(hi));

                let even_default = params.get("split").and_then(Value::as_str) == Some("even");
                let even = driver.ask_bool(
                    "Even Split",
                    "Take the same number of training points from every class",
                    even_default,
                )?;
                let split = if even {
                    SplitStrategy::Even
                } else {
                    SplitStrategy::Proportional
                };
                params.insert("split".into(), json!(split));
            }
            TaskKind::Generate => {
                let output = driver.ask_string(
                    "Output Path",
                    "File the dataset is written to",
                    params.get("output").and_then(Value::as_str).unwrap_or(""),
                )?;
                params.insert("output".into(), json!(output.trim()));

                for (key, title, min) in [
                    ("classes", "Classes", 1),
                    ("features", "Features", 1),
                    ("points_per_class", "Points Per Class", 0),
                    ("seed", "Seed", 0),
                ] {
                    let v = driver.ask_u64(title, "", u64_of(&params, key), Some(min), None)?;
                    params.insert(key.into(), json!(v));
                }
                let separation = driver.ask_f64(
                    "Separation",
                    "Distance between neighbouring class means on feature 1",
                    f64_of(&params, "separation"),
                    None,
                    None,
                )?;
                let spread = driver.ask_f64(
                    "Spread",
                    "Standard deviation of every blob",
                    f64_of(&params, "spread"),
                    Some(f64::MIN_POSITIVE),
                    None,
                )?;
                params.insert("separation".into(), json!(separation));
                params.insert("spread".into(), json!(spread));
            }
        }
        Ok(params)
    }
}
