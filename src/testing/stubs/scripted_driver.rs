use crate::ui::cli::drivers::PromptDriver;
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Answers prompts from a fixed script. An exhausted script (or an empty
/// answer) falls back to the prompt's default.
pub struct ScriptedDriver {
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedDriver {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            asked: RefCell::new(vec![]),
        }
    }

    /// Titles of every prompt shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, title: &str) -> Option<String> {
        self.asked.borrow_mut().push(title.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .filter(|a| !a.trim().is_empty())
    }
}

impl PromptDriver for ScriptedDriver {
    fn ask_bool(&self, title: &str, _help: &str, default: bool) -> Result<bool> {
        Ok(match self.next(title).as_deref().map(str::trim) {
            Some("y") | Some("yes") | Some("true") => true,
            Some("n") | Some("no") | Some("false") => false,
            Some(other) => anyhow::bail!("invalid answer for {title}: {other}"),
            None => default,
        })
    }

    fn ask_string(&self, title: &str, _help: &str, default: &str) -> Result<String> {
        Ok(self.next(title).unwrap_or_else(|| default.to_string()))
    }

    fn ask_u64(
        &self,
        title: &str,
        _help: &str,
        default: u64,
        _min: Option<u64>,
        _max: Option<u64>,
    ) -> Result<u64> {
        match self.next(title) {
            Some(a) => a
                .trim()
                .parse()
                .with_context(|| format!("invalid integer for {title}")),
            None => Ok(default),
        }
    }

    fn ask_f64(
        &self,
        title: &str,
        _help: &str,
        default: f64,
        _min: Option<f64>,
        _max: Option<f64>,
    ) -> Result<f64> {
        match self.next(title) {
            Some(a) => a
                .trim()
                .parse()
                .with_context(|| format!("invalid number for {title}")),
            None => Ok(default),
        }
    }
}
