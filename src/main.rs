use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::{LevelFilter, info};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

use fdr_bayes::core::{Dataset, SplitStrategy};
use fdr_bayes::evaluation::CurveFormat;
use fdr_bayes::tasks::{FeatureRankingReport, HoldoutReport};
use fdr_bayes::ui::cli::drivers::{InquireDriver, PromptDriver};
use fdr_bayes::ui::cli::wizard::{prompt_choice, prompt_path_until_ok};
use fdr_bayes::ui::types::build::{Task, build_task};
use fdr_bayes::ui::types::choices::{
    ClassifyParams, GenerateParams, RankParams, TaskChoice, UIChoice,
};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("FDR_BAYES_LOG", "warn"))
        .init();

    let matches = cli().get_matches();
    let as_json = matches.get_flag("json");
    let driver = InquireDriver;

    let choice = match matches.subcommand() {
        Some(("rank", m)) => TaskChoice::RankFeatures(RankParams {
            path: dataset_path(m, &driver)?,
            normalize_min: bound(m, "min", -1.0),
            normalize_max: bound(m, "max", 1.0),
            split: split_arg(m, SplitStrategy::Even),
        }),
        Some(("classify", m)) => {
            let path = dataset_path(m, &driver)?;
            let feature = match m.get_one::<usize>("feature") {
                Some(f) => *f,
                None => {
                    let n_features = Dataset::from_path(&path)
                        .with_context(|| format!("failed to load {}", path.display()))?
                        .n_features();
                    driver.ask_feature(n_features, 1)?
                }
            };
            TaskChoice::Classify(ClassifyParams {
                path,
                feature,
                normalize_min: bound(m, "min", -1.0),
                normalize_max: bound(m, "max", 1.0),
                split: split_arg(m, SplitStrategy::Proportional),
                distributions_path: m.get_one::<PathBuf>("output").cloned(),
                format: format_arg(m),
                sweep_steps: m.get_one::<usize>("steps").copied().unwrap_or(200),
            })
        }
        Some(("generate", m)) => TaskChoice::Generate(GenerateParams {
            output: m
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("dataset.txt")),
            classes: m.get_one::<usize>("classes").copied().unwrap_or(3),
            features: m.get_one::<usize>("features").copied().unwrap_or(7),
            points_per_class: m.get_one::<usize>("points").copied().unwrap_or(70),
            separation: bound(m, "separation", 2.0),
            spread: bound(m, "spread", 1.0),
            seed: m.get_one::<u64>("seed").copied().unwrap_or(42),
        }),
        Some(("schema", _)) => {
            println!("{}", serde_json::to_string_pretty(&TaskChoice::schema())?);
            return Ok(());
        }
        Some(("run", m)) => {
            let config = m
                .get_one::<PathBuf>("config")
                .context("missing --config")?;
            load_config(config)?
        }
        _ => prompt_choice::<TaskChoice, _>(&driver)?,
    };

    run(choice, as_json)
}

fn cli() -> Command {
    let path_arg = Arg::new("path")
        .help("Path to the dataset file. Prompted for when omitted.")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath);
    let min_arg = Arg::new("min")
        .long("min")
        .help("Lower bound of the normalized range [default: -1]")
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(f64));
    let max_arg = Arg::new("max")
        .long("max")
        .help("Upper bound of the normalized range [default: 1]")
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(f64));
    let split = Arg::new("split")
        .long("split")
        .help("How the training partition is taken")
        .value_parser(["even", "proportional"]);

    Command::new("fdr-bayes")
        .version(clap::crate_version!())
        .about("Fisher Discriminant Ratio feature ranking and single-feature Gaussian Bayes classification")
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .help("Print reports as JSON")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("rank")
                .about("Rank every feature by its Fisher Discriminant Ratio")
                .arg(path_arg.clone())
                .arg(min_arg.clone())
                .arg(max_arg.clone())
                .arg(split.clone().help("How the training partition is taken [default: even]")),
        )
        .subcommand(
            Command::new("classify")
                .about("Train a Gaussian Bayes classifier on one feature and test it")
                .arg(path_arg)
                .arg(
                    Arg::new("feature")
                        .short('f')
                        .long("feature")
                        .help("1-indexed feature to classify with. Prompted for when omitted.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(min_arg)
                .arg(max_arg)
                .arg(split.help("How the training partition is taken [default: proportional]"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Where to write the class density curves")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Density curve format [default: csv]")
                        .value_parser(["csv", "tsv", "json"]),
                )
                .arg(
                    Arg::new("steps")
                        .long("steps")
                        .help("Intervals the normalized range is sampled in [default: 200]")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Write a synthetic dataset of Gaussian blobs")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file [default: dataset.txt]")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("classes")
                        .long("classes")
                        .help("Number of classes [default: 3]")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("features")
                        .long("features")
                        .help("Number of features [default: 7]")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("points")
                        .long("points")
                        .help("Points per class [default: 70]")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("separation")
                        .long("separation")
                        .help("Distance between neighbouring class means [default: 2]")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("spread")
                        .long("spread")
                        .help("Standard deviation of every blob [default: 1]")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("PRNG seed [default: 42]")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(Command::new("schema").about("Print the JSON Schema of a task configuration"))
        .subcommand(
            Command::new("run")
                .about("Run a task described in a JSON configuration file")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .required(true)
                        .help("Path to the task configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn dataset_path<D: PromptDriver>(m: &ArgMatches, driver: &D) -> Result<PathBuf> {
    match m.get_one::<PathBuf>("path") {
        Some(p) => Ok(p.clone()),
        None => prompt_path_until_ok(
            driver,
            "Dataset Path",
            "Please enter full pathname to input data file",
            "",
            true,
        ),
    }
}

fn bound(m: &ArgMatches, id: &str, default: f64) -> f64 {
    m.get_one::<f64>(id).copied().unwrap_or(default)
}

fn split_arg(m: &ArgMatches, default: SplitStrategy) -> SplitStrategy {
    match m.get_one::<String>("split").map(String::as_str) {
        Some("even") => SplitStrategy::Even,
        Some("proportional") => SplitStrategy::Proportional,
        _ => default,
    }
}

fn format_arg(m: &ArgMatches) -> CurveFormat {
    match m.get_one::<String>("format").map(String::as_str) {
        Some("tsv") => CurveFormat::Tsv,
        Some("json") => CurveFormat::Json,
        _ => CurveFormat::Csv,
    }
}

fn load_config(path: &Path) -> Result<TaskChoice> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let dataset =
        Dataset::from_path(path).with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        "loaded {} points, {} features, {} classes from {}",
        dataset.n_points(),
        dataset.n_features(),
        dataset.n_classes(),
        path.display()
    );
    Ok(dataset)
}

fn print_json<T: Serialize>(task: &str, report: &T) -> Result<()> {
    let out = json!({
        "task": task,
        "generated_at": Utc::now().to_rfc3339(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run(choice: TaskChoice, as_json: bool) -> Result<()> {
    match build_task(choice)? {
        Task::RankFeatures { dataset, ranking } => {
            let report = ranking
                .run(load_dataset(&dataset)?)
                .context("feature ranking failed")?;
            if as_json {
                print_json("rank-features", &report)?;
            } else {
                print_ranking(&report);
            }
        }
        Task::Classify {
            dataset,
            evaluator,
            distributions,
            format,
        } => {
            let report = evaluator
                .run(load_dataset(&dataset)?)
                .context("classification failed")?;
            report
                .density_curve
                .export(&distributions, format)
                .with_context(|| format!("failed to write {}", distributions.display()))?;
            info!("density curves written to {}", distributions.display());
            if as_json {
                print_json("classify", &report)?;
            } else {
                print_holdout(&report, &distributions);
            }
        }
        Task::Generate {
            output,
            mut generator,
        } => {
            let dataset = generator.generate()?;
            dataset
                .write_to_path(&output, "\t")
                .with_context(|| format!("failed to write {}", output.display()))?;
            let summary = json!({
                "output": output,
                "n_points": dataset.n_points(),
                "n_features": dataset.n_features(),
                "n_classes": dataset.n_classes(),
            });
            if as_json {
                print_json("generate", &summary)?;
            } else {
                println!(
                    "Wrote {} points ({} features, {} classes) to {}",
                    dataset.n_points(),
                    dataset.n_features(),
                    dataset.n_classes(),
                    output.display()
                );
            }
        }
    }
    Ok(())
}

fn print_ranking(report: &FeatureRankingReport) {
    println!("------------------------------");
    println!("Calculated Feature FDR Values:");
    println!("------------------------------");
    for s in &report.scores {
        println!("Feature ID: {}\tFDR: {:.3}", s.feature, s.fdr);
    }
    if let Some(best) = report.best {
        println!("-------------------------------");
        println!("Best Feature: {}\tFDR: {:.3}", best.feature, best.fdr);
        println!("-------------------------------");
    }
}

fn print_holdout(report: &HoldoutReport, distributions: &Path) {
    println!(
        "Feature {}: trained on {} points, testing {} points",
        report.feature, report.training_points, report.testing_points
    );
    for d in &report.distributions {
        println!(
            "Class {}\tmean: {:.6}\tvariance: {:.6}",
            d.class_id, d.mean, d.variance
        );
    }
    for r in &report.results {
        println!("\nPoint:          {}", r.value);
        println!("Expected:       {}", r.expected);
        println!("Classification: {}", r.predicted);
    }
    println!("-------------------------------------");
    println!("Recognition Rate: {}", report.recognition_rate);
    for m in &report.measurements {
        println!("{m}");
    }
    println!("Confusion matrix (rows expected, columns predicted):");
    let header: Vec<String> = report
        .distributions
        .iter()
        .map(|d| d.class_id.to_string())
        .collect();
    println!("\t{}", header.join("\t"));
    for (d, row) in report.distributions.iter().zip(&report.confusion) {
        let cells: Vec<String> = row.iter().map(u64::to_string).collect();
        println!("{}\t{}", d.class_id, cells.join("\t"));
    }
    println!("Distributions written to {}", distributions.display());
}
