use serde::Serialize;
use std::fmt::{Display, Formatter, Result};

/// Named scalar produced by an evaluator, e.g. `"accuracy"` or `"kappa"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub name: String,
    pub value: f64,
}

impl Measurement {
    #[inline]
    pub fn new<N: Into<String>>(name: N, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {:.6}", self.name, self.value)
    }
}
