use anyhow::Result;
use log::warn;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use strum::{EnumMessage, IntoEnumIterator};

use crate::ui::cli::drivers::PromptDriver;
use crate::ui::types::choices::UIChoice;

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

struct KindItem<K> {
    kind: K,
    text: String,
}

impl<K> Display for KindItem<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn kind_items<K>() -> Vec<KindItem<K>>
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
{
    K::iter()
        .map(|k| {
            let label = k.get_message().unwrap_or_else(|| k.into());
            let desc = k.get_detailed_message().unwrap_or("");
            let text = if desc.is_empty() {
                label.to_string()
            } else {
                format!("{label}  {DIM_ITALIC}{desc}{RESET}")
            };
            KindItem { kind: k, text }
        })
        .collect()
}

/// Lets the user pick a kind from a menu, then fills in its parameters.
pub fn prompt_choice<C: UIChoice, D: PromptDriver>(driver: &D) -> Result<C> {
    let mut select = inquire::Select::new(C::prompt_label(), kind_items::<C::Kind>());
    if let Some(help) = C::prompt_help() {
        select = select.with_help_message(help);
    }
    let kind = select.prompt()?.kind;
    prompt_params_for::<C, D>(driver, kind)
}

/// Fills in the parameters of an already chosen kind.
pub fn prompt_params_for<C: UIChoice, D: PromptDriver>(driver: &D, kind: C::Kind) -> Result<C> {
    let defaults = match C::default_params(kind) {
        Value::Object(m) => m,
        _ => Default::default(),
    };
    let params = C::prompt_params(driver, kind, defaults)?;
    C::from_parts(kind, Value::Object(params))
}

fn validate_path_str(input: &str, must_exist: bool) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if must_exist && !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if p.exists() && !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    Ok(())
}

/// Re-asks until the answer names a usable file.
pub fn prompt_path_until_ok<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
    default: &str,
    must_exist: bool,
) -> Result<PathBuf> {
    loop {
        let answer = driver.ask_string(title, help, default)?;
        match validate_path_str(&answer, must_exist) {
            Ok(()) => return Ok(PathBuf::from(answer.trim())),
            Err(msg) => {
                warn!("rejected path {answer:?}: {msg}");
                eprintln!("✗ {msg}");
            }
        }
    }
}
