//! Fuzzy sets, weighted rules over arbitrary input records, and an inference
//! engine that turns matched rules into either a [`Priority`] label or a crisp
//! value through defuzzification.
//!
//! ```
//! use fuzzy_rules::{FuzzyRule, FuzzySet, InferenceEngine, Priority};
//!
//! struct Ticket {
//!     urgency: f64,
//! }
//!
//! let engine = InferenceEngine::new(vec![
//!     FuzzyRule::new(|t: &Ticket| t.urgency > 7., Priority::Urgent, None),
//!     FuzzyRule::new(|t: &Ticket| t.urgency > 7., FuzzySet::triangular("urgent", 6., 8., 10.), None),
//! ]);
//!
//! // 3 * 1 + 0 * 1 over a total weight of 2
//! assert_eq!(engine.infer(&Ticket { urgency: 9. }), Priority::High);
//! assert!((engine.defuzzify_centroid(0., 10., None) - 8.).abs() < 0.01);
//! ```

mod domain;
mod error;
mod inference;
mod math;
mod ops;
mod outputs;
mod priority;
mod rules;
mod set;

pub use domain::{Domain, DEFAULT_STEP};
pub use error::DomainError;
pub use inference::InferenceEngine;
pub use ops::DefuzzificationOp;
pub use outputs::Inference;
pub use priority::Priority;
pub use rules::{Consequence, Evaluation, FuzzyRule, Outcome, RuleKey, Rules};
pub use set::FuzzySet;
