use tracing::{debug, trace};

use crate::domain::Domain;
use crate::ops::DefuzzificationOp;
use crate::outputs::Inference;
use crate::priority::Priority;
use crate::rules::{FuzzyRule, Rules};
use crate::set::FuzzySet;

/// Evaluates a fixed collection of rules against input records of type `I`.
///
/// Every call is independent; the engine keeps no state between them.
pub struct InferenceEngine<I> {
    rules: Rules<I>,
}

impl<I> InferenceEngine<I> {
    pub fn new(rules: impl Into<Rules<I>>) -> Self {
        Self { rules: rules.into() }
    }

    pub fn rules(&self) -> &Rules<I> {
        &self.rules
    }

    /// Qualitative answer for `inputs`. Shorthand for
    /// `self.evaluate(inputs).priority()`.
    pub fn infer(&self, inputs: &I) -> Priority {
        self.evaluate(inputs).priority()
    }

    /// Runs every rule against `inputs` and averages the matched results'
    /// scores, weighted by rule weight.
    ///
    /// Results that aren't a known priority label, fixed sets included, score
    /// zero. With no match, or a total matched weight of zero, the answer is
    /// [`Priority::Low`].
    pub fn evaluate(&self, inputs: &I) -> Inference {
        let mut inference = Inference::new();
        let mut weighted_score = 0.;

        for (key, rule) in self.rules.iter() {
            let Some(eval) = rule.evaluate(inputs) else {
                continue;
            };
            let label = eval.result.priority();
            let score = eval.result.score();

            trace!(?key, ?label, score, weight = eval.weight, "rule matched");

            weighted_score += f64::from(score) * eval.weight;
            inference.record(key, label, eval.weight);
        }

        let total_weight = inference.total_weight();

        if inference.matched().is_empty() || total_weight == 0. {
            debug!(
                matched = inference.matched().len(),
                total_weight, "no weighted match, defaulting to low priority"
            );

            return inference;
        }

        let mean_score = weighted_score / total_weight;

        inference.conclude(mean_score);

        debug!(
            matched = inference.matched().len(),
            total_weight,
            mean_score,
            priority = %inference.priority(),
            "inferred priority"
        );

        inference
    }

    /// Consequences that are fixed sets, in rule order. Computed consequences
    /// are skipped without being invoked, whatever they would return.
    pub fn fuzzy_set_consequences(&self) -> Vec<&FuzzySet> {
        self.rules
            .iter()
            .filter_map(|(_, rule)| rule.consequence().fixed_set())
            .collect()
    }

    /// Mamdani aggregate of every fixed set consequence at `x`: the highest
    /// membership degree among them, or zero if there are none.
    pub fn aggregate_membership(&self, x: f64) -> f64 {
        self.rules
            .iter()
            .filter_map(|(_, rule)| rule.consequence().fixed_set())
            .map(|set| set.membership_degree(x))
            .reduce(f64::max)
            .unwrap_or(0.)
    }

    /// Defuzzificates the aggregate of the fixed set consequences over `domain`.
    pub fn defuzzify(&self, op: DefuzzificationOp, domain: &Domain) -> f64 {
        let sets = self.fuzzy_set_consequences();
        let samples = domain.sweep().map(|x| (x, max_membership(&sets, x)));

        op.call(samples, domain.step(), domain.min())
    }

    /// Center of gravity of the aggregate. Zero when it has no mass.
    ///
    /// If the step value is not provided, it defaults to
    /// [`DEFAULT_STEP`](crate::DEFAULT_STEP), as for the other `defuzzify_*` methods.
    pub fn defuzzify_centroid(&self, min: f64, max: f64, step: impl Into<Option<f64>>) -> f64 {
        self.defuzzify(DefuzzificationOp::Centroid, &Domain::unchecked(min, max, step.into()))
    }

    /// Mean of the sampled positions at the aggregate's maximum, found in a
    /// single pass. Zero when nothing is sampled.
    pub fn defuzzify_mom(&self, min: f64, max: f64, step: impl Into<Option<f64>>) -> f64 {
        self.defuzzify(DefuzzificationOp::Mom, &Domain::unchecked(min, max, step.into()))
    }

    /// First sampled position where the accumulated left area reaches half of
    /// the total area. Falls back to `min`.
    pub fn defuzzify_bisector(&self, min: f64, max: f64, step: impl Into<Option<f64>>) -> f64 {
        self.defuzzify(DefuzzificationOp::Bisector, &Domain::unchecked(min, max, step.into()))
    }
}

impl<I> From<Vec<FuzzyRule<I>>> for InferenceEngine<I> {
    fn from(rules: Vec<FuzzyRule<I>>) -> Self {
        Self::new(rules)
    }
}

fn max_membership(sets: &[&FuzzySet], x: f64) -> f64 {
    sets.iter()
        .map(|set| set.membership_degree(x))
        .reduce(f64::max)
        .unwrap_or(0.)
}

#[cfg(test)]
struct Ticket {
    urgency: f64,
    complexity: f64,
}

#[cfg(test)]
fn plateau() -> FuzzySet {
    FuzzySet::new("plateau", |x| if (4. ..=6.).contains(&x) { 1. } else { 0. })
}

#[test]
fn test_engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<FuzzySet>();
    assert_send_sync::<FuzzyRule<Ticket>>();
    assert_send_sync::<InferenceEngine<Ticket>>();

    let engine = InferenceEngine::new(vec![
        FuzzyRule::new(|t: &Ticket| t.urgency > 5., Priority::Urgent, None),
        FuzzyRule::new(|_: &Ticket| false, plateau(), None),
    ]);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let engine = &engine;

                scope.spawn(move || {
                    let ticket = Ticket {
                        urgency: f64::from(i) * 3.,
                        complexity: 0.,
                    };

                    (engine.infer(&ticket), engine.defuzzify_mom(0., 10., 0.1))
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results[0].0, Priority::Low);
        assert_eq!(results[3].0, Priority::Urgent);
        assert!(results.iter().all(|(_, mom)| (mom - 5.).abs() < 0.1));
    });
}

#[test]
fn test_infer_without_matches_is_low() {
    let engine = InferenceEngine::new(vec![
        FuzzyRule::new(|t: &Ticket| t.urgency > 5., Priority::Urgent, None),
        FuzzyRule::new(|t: &Ticket| t.complexity > 5., Priority::High, None),
    ]);
    let ticket = Ticket {
        urgency: 1.,
        complexity: 1.,
    };
    let inference = engine.evaluate(&ticket);

    assert_eq!(engine.infer(&ticket), Priority::Low);
    assert_eq!(inference.mean_score(), None);
    assert!(inference.matched().is_empty());

    let empty = InferenceEngine::<Ticket>::new(Rules::new());

    assert_eq!(empty.infer(&ticket), Priority::Low);
}

#[test]
fn test_infer_zero_weight_is_low() {
    let engine = InferenceEngine::new(vec![
        FuzzyRule::new(|_: &Ticket| true, Priority::Urgent, 0.),
        FuzzyRule::new(|_: &Ticket| true, Priority::High, 0.),
    ]);
    let ticket = Ticket {
        urgency: 9.,
        complexity: 9.,
    };
    let inference = engine.evaluate(&ticket);

    assert_eq!(inference.priority(), Priority::Low);
    assert_eq!(inference.mean_score(), None);
    assert_eq!(inference.matched().len(), 2);
}

#[test]
fn test_infer_weighted_mean() {
    let mut rules = Rules::new();
    let urgent = rules.add(FuzzyRule::new(|t: &Ticket| t.urgency > 7., "Urgent", 2.));
    let medium = rules.add(FuzzyRule::new(|t: &Ticket| t.complexity > 3., "Medium Priority", 1.));
    let skipped = rules.add(FuzzyRule::new(|t: &Ticket| t.urgency < 3., "Low Priority", 1.));
    let set = rules.add(FuzzyRule::new(
        |t: &Ticket| t.urgency > 7. && t.complexity > 7.,
        FuzzySet::triangular("urgent", 5., 10., 15.),
        1.,
    ));
    let engine = InferenceEngine::new(rules);

    // (3 * 2 + 1 * 1) / 3 = 2.33
    let inference = engine.evaluate(&Ticket {
        urgency: 8.,
        complexity: 6.,
    });

    assert_eq!(inference.priority(), Priority::High);
    assert_eq!(inference.mean_score(), Some(7. / 3.));
    assert_eq!(inference.matched(), &[urgent, medium]);
    assert_eq!(inference.label_weight(Priority::Urgent), 2.);
    assert_eq!(inference.label_weight(Priority::Medium), 1.);
    assert_eq!(inference.label_weight(Priority::Low), 0.);

    // The set consequence scores zero but still weighs in: (3 * 2 + 1 * 1 + 0 * 1) / 4 = 1.75
    let inference = engine.evaluate(&Ticket {
        urgency: 8.,
        complexity: 8.,
    });

    assert_eq!(inference.priority(), Priority::High);
    assert_eq!(inference.mean_score(), Some(1.75));
    assert_eq!(inference.unscored_weight(), 1.);
    assert_eq!(inference.total_weight(), 4.);
    assert_eq!(inference.matched(), &[urgent, medium, set]);
    assert!(!inference.matched().contains(&skipped));
}

#[test]
fn test_unknown_labels_score_zero() {
    use crate::rules::{Consequence, Outcome};

    let engine = InferenceEngine::new(vec![
        FuzzyRule::new(|_: &Ticket| true, "Urgent", None),
        FuzzyRule::new(|_: &Ticket| true, "Critical", None),
        FuzzyRule::new(|_: &Ticket| true, Consequence::computed(|_: &Ticket| Outcome::Other), None),
    ]);
    let inference = engine.evaluate(&Ticket {
        urgency: 0.,
        complexity: 0.,
    });

    // 3 / 3 = 1
    assert_eq!(inference.priority(), Priority::Medium);
    assert_eq!(inference.unscored_weight(), 2.);
}

#[test]
fn test_fuzzy_set_consequences_are_static() {
    use crate::rules::Consequence;

    let engine = InferenceEngine::new(vec![
        FuzzyRule::new(|_: &Ticket| false, FuzzySet::new("first", |_| 0.2), None),
        FuzzyRule::new(|_: &Ticket| true, "High Priority", None),
        FuzzyRule::new(
            |_: &Ticket| true,
            Consequence::computed(|_: &Ticket| FuzzySet::new("dynamic", |_| 1.)),
            None,
        ),
        FuzzyRule::new(|_: &Ticket| true, FuzzySet::new("second", |_| 0.7), None),
    ]);

    let names: Vec<_> = engine.fuzzy_set_consequences().into_iter().map(FuzzySet::name).collect();

    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(engine.aggregate_membership(3.), 0.7);
}

#[test]
fn test_defuzzify_plateau() {
    let engine = InferenceEngine::new(vec![FuzzyRule::new(|_: &Ticket| true, plateau(), None)]);

    assert!((engine.defuzzify_mom(0., 10., None) - 5.).abs() < 0.02);
    assert!((engine.defuzzify_bisector(0., 10., None) - 5.).abs() < 0.02);
    assert!((engine.defuzzify_centroid(0., 10., None) - 5.).abs() < 0.02);
}

#[test]
fn test_defuzzify_aggregates_with_max() {
    let engine = InferenceEngine::new(vec![
        FuzzyRule::new(|_: &Ticket| true, FuzzySet::triangular("low", 0., 2., 4.), None),
        FuzzyRule::new(|_: &Ticket| true, FuzzySet::triangular("high", 6., 8., 10.), None),
    ]);

    // Two mirrored triangles balance around 5
    assert!((engine.defuzzify_centroid(0., 10., None) - 5.).abs() < 0.01);
    assert_eq!(engine.aggregate_membership(1.), 0.5);
    assert_eq!(engine.aggregate_membership(5.), 0.);

    let domain = Domain::new(0. ..=10., 0.5).unwrap();

    assert_eq!(engine.defuzzify(DefuzzificationOp::Som, &domain), 2.);
    assert_eq!(engine.defuzzify(DefuzzificationOp::Lom, &domain), 8.);
    assert_eq!(engine.defuzzify(DefuzzificationOp::Mom, &domain), 5.);
}

#[test]
fn test_defuzzify_degenerate_domains() {
    let engine = InferenceEngine::new(vec![FuzzyRule::new(|_: &Ticket| true, plateau(), None)]);

    assert_eq!(engine.defuzzify_mom(10., 0., None), 0.);
    assert_eq!(engine.defuzzify_centroid(10., 0., None), 0.);
    assert_eq!(engine.defuzzify_bisector(10., 0., None), 10.);
    assert_eq!(engine.defuzzify_mom(0., 10., 0.), 0.);
    assert_eq!(engine.defuzzify_bisector(3., 10., -1.), 3.);

    // No fixed sets: the aggregate is flat zero
    let labels = InferenceEngine::new(vec![FuzzyRule::new(|_: &Ticket| true, Priority::High, None)]);

    assert_eq!(labels.defuzzify_centroid(0., 10., None), 0.);
    assert_eq!(labels.defuzzify_bisector(2., 10., None), 2.);
    assert!((labels.defuzzify_mom(0., 10., None) - 5.).abs() < 0.01);
}
