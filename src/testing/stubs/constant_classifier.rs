use crate::classifiers::Classifier;

/// Returns the same votes for every value.
pub struct ConstantClassifier {
    pub votes: Vec<f64>,
}

impl ConstantClassifier {
    pub fn new(votes: Vec<f64>) -> Self {
        Self { votes }
    }
}

impl Classifier for ConstantClassifier {
    fn get_votes_for_value(&self, _value: f64) -> Vec<f64> {
        self.votes.clone()
    }

    fn number_of_classes(&self) -> usize {
        self.votes.len()
    }
}
