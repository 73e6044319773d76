use crate::evaluation::{Estimator, Measurement, PerformanceEvaluator};
use crate::utils::math::argmax;

/// Batch classification evaluator.
///
/// Tracks:
/// - accuracy (the recognition rate, `correct / total`);
/// - marginals of predicted (`row_kappa`) and true (`col_kappa`) classes for Cohen's κ;
/// - per-class precision and recall (macro-averaged when `show_pr_summary`);
/// - a confusion matrix indexed `[true][predicted]`.
///
/// Per-class measurements are named after the class label when labels were
/// given, otherwise after the class position.
pub struct BasicClassificationEvaluator<E: Estimator + Default> {
    weight_correct: E,
    row_kappa: Vec<E>,
    col_kappa: Vec<E>,
    precision: Vec<E>,
    recall: Vec<E>,
    confusion: Vec<Vec<u64>>,
    num_classes: usize,
    labels: Vec<usize>,
    seen: u64,
    show_pr_summary: bool,
    show_per_class: bool,
}

impl<E: Estimator + Default> BasicClassificationEvaluator<E> {
    pub fn new(num_classes: usize, show_pr_summary: bool, show_per_class: bool) -> Self {
        let make_vec = || (0..num_classes).map(|_| E::default()).collect::<Vec<_>>();
        Self {
            weight_correct: E::default(),
            row_kappa: make_vec(),
            col_kappa: make_vec(),
            precision: make_vec(),
            recall: make_vec(),
            confusion: vec![vec![0; num_classes]; num_classes],
            num_classes,
            labels: vec![],
            seen: 0,
            show_pr_summary,
            show_per_class,
        }
    }

    /// Labels of the classes, in position order.
    pub fn with_class_labels(mut self, labels: Vec<usize>) -> Self {
        self.labels = labels;
        self
    }

    fn label(&self, position: usize) -> usize {
        self.labels.get(position).copied().unwrap_or(position)
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn confusion_matrix(&self) -> &[Vec<u64>] {
        &self.confusion
    }

    #[inline]
    fn ensure_classes(&mut self, k: usize) {
        if k <= self.num_classes {
            return;
        }
        let add = k - self.num_classes;
        self.row_kappa.extend((0..add).map(|_| E::default()));
        self.col_kappa.extend((0..add).map(|_| E::default()));
        self.precision.extend((0..add).map(|_| E::default()));
        self.recall.extend((0..add).map(|_| E::default()));
        for row in &mut self.confusion {
            row.resize(k, 0);
        }
        self.confusion.resize(k, vec![0; k]);
        self.num_classes = k;
    }

    fn f1(p: f64, r: f64) -> f64 {
        let s = p + r;
        if p.is_finite() && r.is_finite() && s > f64::EPSILON {
            2.0 * (p * r) / s
        } else {
            f64::NAN
        }
    }
}

impl<E: Estimator + Default> PerformanceEvaluator for BasicClassificationEvaluator<E> {
    fn add_result(&mut self, y: usize, class_votes: &[f64]) {
        let Some(yhat) = argmax(class_votes) else {
            return;
        };
        self.ensure_classes(class_votes.len().max(y + 1));

        self.seen += 1;
        self.confusion[y][yhat] += 1;
        self.weight_correct.add(if yhat == y { 1.0 } else { 0.0 });

        for (c, est) in self.row_kappa.iter_mut().enumerate() {
            est.add(if c == yhat { 1.0 } else { 0.0 });
        }
        for (c, est) in self.col_kappa.iter_mut().enumerate() {
            est.add(if c == y { 1.0 } else { 0.0 });
        }
        for (c, est) in self.precision.iter_mut().enumerate() {
            if c == yhat {
                est.add(if yhat == y { 1.0 } else { 0.0 });
            } else {
                est.add(f64::NAN);
            }
        }
        for (c, est) in self.recall.iter_mut().enumerate() {
            if c == y {
                est.add(if yhat == y { 1.0 } else { 0.0 });
            } else {
                est.add(f64::NAN);
            }
        }
    }

    fn performance(&self) -> Vec<Measurement> {
        let mut m = vec![Measurement::new(
            "accuracy",
            self.weight_correct.estimation(),
        )];

        if self.seen == 0 {
            m.push(Measurement::new("kappa", 0.0));
            return m;
        }

        let p_o = self.weight_correct.estimation();
        let p_e: f64 = self
            .row_kappa
            .iter()
            .zip(&self.col_kappa)
            .map(|(r, c)| (r.estimation(), c.estimation()))
            .filter(|(r, c)| r.is_finite() && c.is_finite())
            .map(|(r, c)| r * c)
            .sum();
        let denom = 1.0 - p_e;
        let kappa = if denom.abs() > f64::EPSILON {
            (p_o - p_e) / denom
        } else {
            f64::NAN
        };
        m.push(Measurement::new("kappa", kappa));

        if self.show_pr_summary {
            let mean_finite = |v: &[E]| {
                let xs: Vec<f64> = v
                    .iter()
                    .map(|e| e.estimation())
                    .filter(|x| x.is_finite())
                    .collect();
                if xs.is_empty() {
                    f64::NAN
                } else {
                    xs.iter().sum::<f64>() / xs.len() as f64
                }
            };
            let macro_precision = mean_finite(&self.precision);
            let macro_recall = mean_finite(&self.recall);
            m.push(Measurement::new("precision", macro_precision));
            m.push(Measurement::new("recall", macro_recall));
            m.push(Measurement::new("f1", Self::f1(macro_precision, macro_recall)));
        }

        if self.show_per_class {
            for c in 0..self.num_classes {
                let p = self.precision[c].estimation();
                let r = self.recall[c].estimation();
                let id = self.label(c);
                m.push(Measurement::new(format!("precision_class_{id}"), p));
                m.push(Measurement::new(format!("recall_class_{id}"), r));
                m.push(Measurement::new(format!("f1_class_{id}"), Self::f1(p, r)));
            }
        }
        m
    }
}
