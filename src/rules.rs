use std::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::priority::Priority;
use crate::set::FuzzySet;

new_key_type! {
    /// A rule key
    pub struct RuleKey;
}

type Condition<I> = Box<dyn Fn(&I) -> bool + Send + Sync>;
type Generator<I> = Box<dyn Fn(&I) -> Outcome + Send + Sync>;

/// What a matched rule resolves to.
#[derive(Clone, Debug)]
pub enum Outcome {
    Label(String),
    Set(FuzzySet),
    Other,
}

impl Outcome {
    /// Ordinal score of this outcome. Anything that isn't a known priority
    /// label scores zero.
    pub fn score(&self) -> u8 {
        self.priority().map_or(0, Priority::score)
    }

    pub(crate) fn priority(&self) -> Option<Priority> {
        match self {
            Self::Label(label) => Priority::from_label(label),
            Self::Set(_) | Self::Other => None,
        }
    }
}

impl From<FuzzySet> for Outcome {
    fn from(set: FuzzySet) -> Self {
        Self::Set(set)
    }
}

impl From<Priority> for Outcome {
    fn from(priority: Priority) -> Self {
        Self::Label(priority.as_str().to_owned())
    }
}

impl From<&str> for Outcome {
    fn from(label: &str) -> Self {
        Self::Label(label.to_owned())
    }
}

impl From<String> for Outcome {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

/// The right hand side of a rule: either a fixed set, or something computed
/// from the inputs each time the rule fires.
pub enum Consequence<I> {
    Fixed(FuzzySet),
    Computed(Generator<I>),
}

impl<I> Consequence<I> {
    pub fn computed<O: Into<Outcome>>(f: impl Fn(&I) -> O + Send + Sync + 'static) -> Self {
        Self::Computed(Box::new(move |inputs: &I| -> Outcome { f(inputs).into() }))
    }

    /// A computed consequence that always yields the same label.
    pub fn label(label: impl Into<String>) -> Self {
        let label = label.into();

        Self::Computed(Box::new(move |_: &I| Outcome::Label(label.clone())))
    }

    /// The fixed set, if this consequence is one. Computed consequences are
    /// never invoked here.
    pub fn fixed_set(&self) -> Option<&FuzzySet> {
        match self {
            Self::Fixed(set) => Some(set),
            Self::Computed(_) => None,
        }
    }

    fn resolve(&self, inputs: &I) -> Outcome {
        match self {
            Self::Fixed(set) => Outcome::Set(set.clone()),
            Self::Computed(f) => f(inputs),
        }
    }
}

impl<I> From<FuzzySet> for Consequence<I> {
    fn from(set: FuzzySet) -> Self {
        Self::Fixed(set)
    }
}

impl<I> From<Priority> for Consequence<I> {
    fn from(priority: Priority) -> Self {
        Self::label(priority.as_str())
    }
}

impl<I> From<&str> for Consequence<I> {
    fn from(label: &str) -> Self {
        Self::label(label)
    }
}

impl<I> fmt::Debug for Consequence<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(set) => f.debug_tuple("Fixed").field(set).finish(),
            Self::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// A matched rule's resolved consequence, paired with the rule's weight.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub result: Outcome,
    pub weight: f64,
}

/// A weighted conditional rule over input records of type `I`.
pub struct FuzzyRule<I> {
    condition: Condition<I>,
    consequence: Consequence<I>,
    weight: f64,
}

impl<I> FuzzyRule<I> {
    /// If the weight is not provided, it defaults to 1. Its sign is not checked.
    pub fn new(
        condition: impl Fn(&I) -> bool + Send + Sync + 'static,
        consequence: impl Into<Consequence<I>>,
        weight: impl Into<Option<f64>>,
    ) -> Self {
        FuzzyRule {
            condition: Box::new(condition),
            consequence: consequence.into(),
            weight: weight.into().unwrap_or(1.),
        }
    }

    pub fn consequence(&self) -> &Consequence<I> {
        &self.consequence
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns `None` when the condition does not hold. A panic inside the
    /// condition or consequence unwinds through here.
    pub fn evaluate(&self, inputs: &I) -> Option<Evaluation> {
        if !(self.condition)(inputs) {
            return None;
        }

        Some(Evaluation {
            result: self.consequence.resolve(inputs),
            weight: self.weight,
        })
    }
}

impl<I> fmt::Debug for FuzzyRule<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyRule")
            .field("consequence", &self.consequence)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Rules in insertion order, addressable by the key returned from [`Rules::add`].
pub struct Rules<I> {
    rules: SlotMap<RuleKey, FuzzyRule<I>>,
    order: Vec<RuleKey>,
}

impl<I> Default for Rules<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Rules<I> {
    pub fn new() -> Self {
        Rules {
            rules: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules {
            rules: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, rule: FuzzyRule<I>) -> RuleKey {
        let key = self.rules.insert(rule);

        self.order.push(key);

        key
    }

    pub fn get(&self, key: RuleKey) -> Option<&FuzzyRule<I>> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RuleKey, &FuzzyRule<I>)> {
        self.order.iter().map(move |key| (*key, &self.rules[*key]))
    }
}

impl<I> FromIterator<FuzzyRule<I>> for Rules<I> {
    fn from_iter<T: IntoIterator<Item = FuzzyRule<I>>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut rules = Rules::with_capacity(iter.size_hint().0);

        for rule in iter {
            rules.add(rule);
        }

        rules
    }
}

impl<I> From<Vec<FuzzyRule<I>>> for Rules<I> {
    fn from(rules: Vec<FuzzyRule<I>>) -> Self {
        rules.into_iter().collect()
    }
}

#[cfg(test)]
struct Ticket {
    urgency: f64,
}

#[test]
fn test_evaluate_no_match() {
    let rule = FuzzyRule::new(|t: &Ticket| t.urgency > 5., Priority::Urgent, None);

    assert!(rule.evaluate(&Ticket { urgency: 1. }).is_none());
}

#[test]
fn test_evaluate_fixed_set() {
    let rule = FuzzyRule::new(
        |t: &Ticket| t.urgency > 5.,
        FuzzySet::triangular("urgent", 5., 10., 15.),
        2.5,
    );
    let eval = rule.evaluate(&Ticket { urgency: 8. }).unwrap();

    assert_eq!(eval.weight, 2.5);
    assert!(matches!(&eval.result, Outcome::Set(set) if set.name() == "urgent"));
    assert_eq!(eval.result.score(), 0);
}

#[test]
fn test_evaluate_computed() {
    let rule = FuzzyRule::new(
        |_: &Ticket| true,
        Consequence::computed(|t: &Ticket| if t.urgency > 5. { Priority::High } else { Priority::Medium }),
        None,
    );

    let eval = rule.evaluate(&Ticket { urgency: 8. }).unwrap();

    assert_eq!(eval.weight, 1.);
    assert!(matches!(&eval.result, Outcome::Label(label) if label == "High Priority"));
    assert_eq!(eval.result.score(), 2);

    let eval = rule.evaluate(&Ticket { urgency: 2. }).unwrap();

    assert_eq!(eval.result.score(), 1);
}

#[test]
fn test_outcome_scores() {
    assert_eq!(Outcome::from("Urgent").score(), 3);
    assert_eq!(Outcome::from("High Priority").score(), 2);
    assert_eq!(Outcome::from("Medium Priority").score(), 1);
    assert_eq!(Outcome::from("Low Priority").score(), 0);
    assert_eq!(Outcome::from("Critical").score(), 0);
    assert_eq!(Outcome::Other.score(), 0);
    assert_eq!(Outcome::from(FuzzySet::new("s", |_| 1.)).score(), 0);
}

#[test]
fn test_fixed_set_is_static() {
    let fixed: Consequence<Ticket> = FuzzySet::new("fixed", |_| 1.).into();
    let computed = Consequence::computed(|_: &Ticket| FuzzySet::new("computed", |_| 1.));

    assert_eq!(fixed.fixed_set().map(FuzzySet::name), Some("fixed"));
    assert!(computed.fixed_set().is_none());
}

#[test]
fn test_rules_keep_insertion_order() {
    let mut rules = Rules::new();
    let first = rules.add(FuzzyRule::new(|_: &Ticket| true, "Urgent", 3.));
    let second = rules.add(FuzzyRule::new(|_: &Ticket| true, "Low Priority", None));

    assert_eq!(rules.len(), 2);
    assert_eq!(rules.get(first).map(FuzzyRule::weight), Some(3.));
    assert_eq!(rules.iter().map(|(key, _)| key).collect::<Vec<_>>(), vec![first, second]);

    let rules: Rules<Ticket> = vec![FuzzyRule::new(|_: &Ticket| false, Priority::Low, 0.)].into();

    assert_eq!(rules.len(), 1);
    assert!(!rules.is_empty());
    assert!(Rules::<Ticket>::default().is_empty());
}
