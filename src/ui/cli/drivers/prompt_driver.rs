use anyhow::Result;

/// Source of answers for the interactive wizard.
pub trait PromptDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool>;
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String>;
    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64>;
    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64>;

    /// Feature numbers are 1-indexed at the prompt.
    fn ask_feature(&self, n_features: usize, default: usize) -> Result<usize> {
        let n = self.ask_u64(
            "Feature",
            &format!("Feature to classify with (1..={n_features})"),
            default as u64,
            Some(1),
            Some(n_features as u64),
        )?;
        Ok(n as usize)
    }
}
