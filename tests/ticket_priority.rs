//! Ticket triage: label rules decide the priority, fixed sets give a crisp
//! urgency score.

use fuzzy_rules::{
    Consequence, DefuzzificationOp, Domain, FuzzyRule, FuzzySet, InferenceEngine, Priority, Rules,
};

struct Ticket {
    urgency: f64,
    complexity: f64,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn triage_engine() -> InferenceEngine<Ticket> {
    let mut rules = Rules::new();

    rules.add(FuzzyRule::new(
        |t: &Ticket| t.urgency > 0.7 && t.complexity > 0.7,
        FuzzySet::triangular("Urgent", 6., 9., 12.),
        None,
    ));
    rules.add(FuzzyRule::new(|t: &Ticket| t.urgency > 0.5, "High Priority", None));
    rules.add(FuzzyRule::new(|t: &Ticket| t.complexity > 0.5, "Medium Priority", None));
    rules.add(FuzzyRule::new(|t: &Ticket| t.urgency < 0.3, "Low Priority", None));

    InferenceEngine::new(rules)
}

#[test]
fn test_triage_scenario() {
    init_tracing();

    let engine = triage_engine();
    let ticket = Ticket {
        urgency: 8.,
        complexity: 6.,
    };
    let inference = engine.evaluate(&ticket);

    // Set rule scores 0, high scores 2, medium scores 1, each with weight 1.
    // A mean of 1 is Medium; Urgent is unreachable with weight-1 label rules here
    assert_eq!(inference.matched().len(), 3);
    assert_eq!(inference.mean_score(), Some(1.));
    assert_eq!(engine.infer(&ticket), Priority::Medium);
    assert_eq!(engine.infer(&ticket).as_str(), "Medium Priority");

    let calm = Ticket {
        urgency: 0.1,
        complexity: 0.1,
    };

    assert_eq!(engine.infer(&calm), Priority::Low);
    assert_eq!(engine.evaluate(&calm).mean_score(), Some(0.));
}

#[test]
fn test_weights_tip_the_balance() {
    init_tracing();

    let engine = InferenceEngine::new(vec![
        FuzzyRule::new(|t: &Ticket| t.urgency > 5., Priority::Urgent, 4.),
        FuzzyRule::new(|t: &Ticket| t.complexity > 5., Priority::Medium, 1.),
    ]);

    // (3 * 4 + 1 * 1) / 5 = 2.6
    assert_eq!(
        engine.infer(&Ticket {
            urgency: 8.,
            complexity: 6.
        }),
        Priority::Urgent
    );
    // Only the medium rule
    assert_eq!(
        engine.infer(&Ticket {
            urgency: 2.,
            complexity: 6.
        }),
        Priority::Medium
    );
}

#[test]
fn test_computed_consequences() {
    init_tracing();

    let engine = InferenceEngine::new(vec![FuzzyRule::new(
        |_: &Ticket| true,
        Consequence::computed(|t: &Ticket| {
            if t.urgency * t.complexity > 40. {
                Priority::Urgent
            } else {
                Priority::Low
            }
        }),
        None,
    )]);

    assert_eq!(
        engine.infer(&Ticket {
            urgency: 8.,
            complexity: 6.
        }),
        Priority::Urgent
    );
    assert_eq!(
        engine.infer(&Ticket {
            urgency: 4.,
            complexity: 6.
        }),
        Priority::Low
    );
    assert!(engine.fuzzy_set_consequences().is_empty());
}

#[test]
fn test_crisp_urgency_score() {
    init_tracing();

    let engine = triage_engine();
    let sets = engine.fuzzy_set_consequences();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].name(), "Urgent");

    // The triangle is cut off at 10, past its peak at 9
    let centroid = engine.defuzzify_centroid(0., 10., None);
    let mom = engine.defuzzify_mom(0., 10., None);
    let bisector = engine.defuzzify_bisector(0., 10., None);

    assert!(centroid > 8.4 && centroid < 8.7, "centroid {centroid}");
    assert!((mom - 9.).abs() < 0.01, "mom {mom}");
    assert!(bisector > 8.5 && bisector < 8.8, "bisector {bisector}");

    let domain = Domain::new(0. ..=10., None).unwrap();

    assert_eq!(engine.defuzzify(DefuzzificationOp::Centroid, &domain), centroid);
    assert_eq!(engine.defuzzify(DefuzzificationOp::Mom, &domain), mom);
    assert_eq!(engine.defuzzify(DefuzzificationOp::Bisector, &domain), bisector);
}

#[test]
#[should_panic(expected = "broken condition")]
fn test_panicking_condition_propagates() {
    let engine = InferenceEngine::new(vec![FuzzyRule::new(
        |_: &Ticket| panic!("broken condition"),
        Priority::High,
        None,
    )]);

    engine.infer(&Ticket {
        urgency: 1.,
        complexity: 1.,
    });
}
