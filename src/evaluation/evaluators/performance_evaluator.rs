use crate::evaluation::Measurement;

/// Accumulates (true class, class votes) pairs into summary metrics.
pub trait PerformanceEvaluator {
    /// Feeds the true class position of one example and the votes the
    /// classifier gave it (one score per class position). Unusable votes may
    /// be skipped.
    fn add_result(&mut self, true_class: usize, class_votes: &[f64]);

    fn performance(&self) -> Vec<Measurement>;
}
