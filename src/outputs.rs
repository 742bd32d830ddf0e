use fixed_map::Map as FixedMap;

use crate::priority::Priority;
use crate::rules::RuleKey;

/// Everything [`InferenceEngine::evaluate`](crate::InferenceEngine::evaluate)
/// worked out on the way to a [`Priority`].
#[derive(Debug)]
pub struct Inference {
    priority: Priority,
    mean_score: Option<f64>,
    total_weight: f64,
    label_weights: FixedMap<Priority, f64>,
    unscored_weight: f64,
    matched: Vec<RuleKey>,
}

impl Inference {
    pub(crate) fn new() -> Self {
        Self {
            priority: Priority::Low,
            mean_score: None,
            total_weight: 0.,
            label_weights: FixedMap::new(),
            unscored_weight: 0.,
            matched: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, key: RuleKey, label: Option<Priority>, weight: f64) {
        match label {
            Some(label) => {
                let tally = self.label_weights.get(label).copied().unwrap_or(0.) + weight;

                self.label_weights.insert(label, tally);
            },
            None => self.unscored_weight += weight,
        }

        self.total_weight += weight;
        self.matched.push(key);
    }

    pub(crate) fn conclude(&mut self, mean_score: f64) {
        self.mean_score = Some(mean_score);
        self.priority = Priority::from_score(mean_score);
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Weighted mean score, or `None` when no rule matched or every matched
    /// rule had zero weight.
    pub fn mean_score(&self) -> Option<f64> {
        self.mean_score
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Summed weight of matched rules that resolved to `label`.
    pub fn label_weight(&self, label: Priority) -> f64 {
        self.label_weights.get(label).copied().unwrap_or(0.)
    }

    /// Summed weight of matched rules whose result was not a known label.
    /// These count towards the mean with a score of zero.
    pub fn unscored_weight(&self) -> f64 {
        self.unscored_weight
    }

    /// Keys of the rules that matched, in rule order.
    pub fn matched(&self) -> &[RuleKey] {
        &self.matched
    }
}
