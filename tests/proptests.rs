//! Property-based tests for the fuzzy set algebra and defuzzification.

use fuzzy_rules::{FuzzyRule, FuzzySet, InferenceEngine, Priority};
use proptest::prelude::*;

/// Triangular sets with ordered corners inside [-50, 50]
fn arb_triangle() -> impl Strategy<Value = FuzzySet> {
    prop::array::uniform3(-50.0f64..50.0).prop_map(|mut corners| {
        corners.sort_by(f64::total_cmp);

        let [a, b, c] = corners;

        FuzzySet::triangular("tri", a, b, c)
    })
}

/// Sets whose degrees may leave [0, 1], to exercise the unclamped operations
fn arb_scaled() -> impl Strategy<Value = FuzzySet> {
    (arb_triangle(), 0.0f64..3.0)
        .prop_map(|(set, scale)| FuzzySet::new("scaled", move |x| scale * set.membership_degree(x)))
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
        Just(Priority::Urgent),
    ]
}

proptest! {
    #[test]
    fn prop_union_is_pointwise_max(a in arb_scaled(), b in arb_scaled(), x in -60.0f64..60.0) {
        let expected = f64::max(a.membership_degree(x), b.membership_degree(x));

        prop_assert_eq!(a.union(&b).membership_degree(x), expected);
    }

    #[test]
    fn prop_intersection_is_pointwise_min(a in arb_scaled(), b in arb_scaled(), x in -60.0f64..60.0) {
        let expected = f64::min(a.membership_degree(x), b.membership_degree(x));

        prop_assert_eq!(a.intersection(&b).membership_degree(x), expected);
    }

    #[test]
    fn prop_complement_is_one_minus(a in arb_scaled(), x in -60.0f64..60.0) {
        prop_assert_eq!(a.complement().membership_degree(x), 1. - a.membership_degree(x));
    }

    #[test]
    fn prop_normalize_only_caps(a in arb_scaled(), x in -60.0f64..60.0) {
        let mu = a.membership_degree(x);
        let normalized = a.normalize().membership_degree(x);

        prop_assert_eq!(normalized, mu / f64::max(1., mu));

        if mu > 1. {
            prop_assert_eq!(normalized, 1.);
        } else {
            prop_assert_eq!(normalized, mu);
        }
    }

    #[test]
    fn prop_symmetric_triangle_centroid_is_peak(peak in -20.0f64..20.0, half_width in 1.0f64..10.0) {
        let set = FuzzySet::triangular("sym", peak - half_width, peak, peak + half_width);
        let centroid = set.centroid(peak - half_width - 5., peak + half_width + 5., None);

        prop_assert!((centroid - peak).abs() < 0.01, "centroid {} vs peak {}", centroid, peak);
    }

    #[test]
    fn prop_single_label_rule_infers_its_label(priority in arb_priority(), weight in 0.01f64..100.0) {
        let engine = InferenceEngine::new(vec![FuzzyRule::new(|_: &()| true, priority, weight)]);

        prop_assert_eq!(engine.infer(&()), priority);
    }

    #[test]
    fn prop_bisector_stays_in_domain(set in arb_triangle(), min in -60.0f64..0.0, width in 0.5f64..60.0) {
        let engine = InferenceEngine::new(vec![FuzzyRule::new(|_: &()| true, set, None)]);
        let max = min + width;
        let x = engine.defuzzify_bisector(min, max, 0.1);

        prop_assert!(x >= min && x <= max);
    }
}
