use crate::utils::math::argmax;

/// A classifier over a single scalar value.
pub trait Classifier {
    /// One score per class, in class position order.
    fn get_votes_for_value(&self, value: f64) -> Vec<f64>;

    fn number_of_classes(&self) -> usize;

    /// Position of the highest vote. Ties and all-invalid votes resolve to the
    /// lowest position.
    fn classify(&self, value: f64) -> usize {
        argmax(&self.get_votes_for_value(value)).unwrap_or(0)
    }
}
