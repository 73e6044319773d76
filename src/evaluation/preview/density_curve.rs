use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CurveFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl CurveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            CurveFormat::Csv => "csv",
            CurveFormat::Tsv => "tsv",
            CurveFormat::Json => "json",
        }
    }
}

/// Class densities sampled at one value of the feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityRow {
    pub value: f64,
    pub densities: Vec<f64>,
}

/// Per-class density curves over a swept range, ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    labels: Vec<String>,
    rows: Vec<DensityRow>,
}

impl DensityCurve {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            rows: vec![],
        }
    }

    pub fn push(&mut self, row: DensityRow) {
        self.rows.push(row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[DensityRow] {
        &self.rows
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        match fmt {
            CurveFormat::Csv => self.write_delimited(&mut w, ',')?,
            CurveFormat::Tsv => self.write_delimited(&mut w, '\t')?,
            CurveFormat::Json => {
                serde_json::to_writer_pretty(&mut w, self)?;
                writeln!(w)?;
            }
        }
        w.flush()
    }

    /// Header `value,<label>...`, then one row per sample.
    pub fn write_delimited<W: Write>(&self, w: &mut W, delimiter: char) -> Result<(), Error> {
        write!(w, "value")?;
        for l in &self.labels {
            write!(w, "{delimiter}{l}")?;
        }
        writeln!(w)?;
        for row in &self.rows {
            write!(w, "{:.6}", row.value)?;
            for d in &row.densities {
                write!(w, "{delimiter}{d:.12}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
