use std::fmt;
use std::sync::Arc;

use crate::domain::Domain;
use crate::math::interp;
use crate::ops::DefuzzificationOp;

type Membership = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A named fuzzy set, defined by its membership function.
///
/// The function is expected to map into `[0, 1]` but this is never checked.
/// Sets are immutable; every combinator returns a new set that shares the
/// operands' functions.
#[derive(Clone)]
pub struct FuzzySet {
    name: String,
    membership: Membership,
}

impl FuzzySet {
    pub fn new(name: impl Into<String>, membership: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        FuzzySet {
            name: name.into(),
            membership: Arc::new(membership),
        }
    }

    /// Triangle rising from `a`, peaking at `b` and falling back to zero at `c`.
    pub fn triangular(name: impl Into<String>, a: f64, b: f64, c: f64) -> Self {
        Self::new(name, move |x| {
            if x <= a || x >= c {
                0.
            } else if x <= b {
                (x - a) / (b - a)
            } else {
                (c - x) / (c - b)
            }
        })
    }

    /// Trapezoid rising over `[a, b]`, flat at one over `[b, c]` and falling over `[c, d]`.
    pub fn trapezoidal(name: impl Into<String>, a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::new(name, move |x| {
            if (b..=c).contains(&x) {
                1.
            } else if x <= a || x >= d {
                0.
            } else if x < b {
                (x - a) / (b - a)
            } else {
                (d - x) / (d - c)
            }
        })
    }

    pub fn gaussian(name: impl Into<String>, center: f64, sigma: f64) -> Self {
        Self::new(name, move |x| (-(x - center).powi(2) / (2. * sigma.powi(2))).exp())
    }

    /// Piecewise linear membership through `points`, holding the end values
    /// outside of them. Points must be sorted by x.
    pub fn from_points(name: impl Into<String>, points: impl Into<Vec<(f64, f64)>>) -> Self {
        let points: Vec<_> = points.into();

        Self::new(name, move |x| interp(x, &points))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn membership_degree(&self, x: f64) -> f64 {
        (self.membership)(x)
    }

    /// Pointwise maximum
    pub fn union(&self, other: &FuzzySet) -> FuzzySet {
        let (a, b) = (self.membership.clone(), other.membership.clone());

        FuzzySet::new(format!("{} OR {}", self.name, other.name), move |x| f64::max(a(x), b(x)))
    }

    /// Pointwise minimum
    pub fn intersection(&self, other: &FuzzySet) -> FuzzySet {
        let (a, b) = (self.membership.clone(), other.membership.clone());

        FuzzySet::new(format!("{} AND {}", self.name, other.name), move |x| f64::min(a(x), b(x)))
    }

    /// `1 - mu(x)`, without clamping
    pub fn complement(&self) -> FuzzySet {
        let a = self.membership.clone();

        FuzzySet::new(format!("NOT {}", self.name), move |x| 1. - a(x))
    }

    /// `mu(x) / max(1, mu(x))`. This caps degrees above one at exactly one and
    /// leaves everything else untouched; it does not rescale against the
    /// set's peak.
    pub fn normalize(&self) -> FuzzySet {
        let a = self.membership.clone();

        FuzzySet::new(format!("normalized {}", self.name), move |x| {
            let mu = a(x);

            mu / f64::max(1., mu)
        })
    }

    /// Center of gravity of the set sampled over `[min, max]`.
    ///
    /// If the step value is not provided, it defaults to
    /// [`DEFAULT_STEP`](crate::DEFAULT_STEP). Returns zero when the sampled
    /// membership sums to zero.
    pub fn centroid(&self, min: f64, max: f64, step: impl Into<Option<f64>>) -> f64 {
        self.defuzzify(DefuzzificationOp::Centroid, &Domain::unchecked(min, max, step.into()))
    }

    pub fn defuzzify(&self, op: DefuzzificationOp, domain: &Domain) -> f64 {
        let samples = domain.sweep().map(|x| (x, self.membership_degree(x)));

        op.call(samples, domain.step(), domain.min())
    }
}

impl fmt::Debug for FuzzySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzySet").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg(test)]
const SAMPLES: [f64; 9] = [-1., 0., 1.5, 2.5, 4., 5., 6.3, 9.9, 12.];

#[test]
fn test_set_algebra() {
    let low = FuzzySet::triangular("low", 0., 2., 5.);
    let high = FuzzySet::trapezoidal("high", 3., 6., 8., 10.);

    let either = low.union(&high);
    let both = low.intersection(&high);
    let not_low = low.complement();

    for x in SAMPLES {
        let (a, b) = (low.membership_degree(x), high.membership_degree(x));

        assert_eq!(either.membership_degree(x), a.max(b));
        assert_eq!(both.membership_degree(x), a.min(b));
        assert_eq!(not_low.membership_degree(x), 1. - a);
    }

    assert_eq!(either.name(), "low OR high");
    assert_eq!(both.name(), "low AND high");
    assert_eq!(not_low.name(), "NOT low");
}

#[test]
fn test_normalize_clamps_instead_of_rescaling() {
    let loud = FuzzySet::new("loud", |x| x / 2.);
    let normalized = loud.normalize();

    assert_eq!(normalized.membership_degree(6.), 1.);
    assert_eq!(normalized.membership_degree(2.), 1.);
    assert_eq!(normalized.membership_degree(1.), 0.5);
    assert_eq!(normalized.membership_degree(0.), 0.);

    // A set peaking below one is not stretched up
    let faint = FuzzySet::triangular("faint", 0., 5., 10.).intersection(&FuzzySet::new("cap", |_| 0.4));

    assert_eq!(faint.normalize().membership_degree(5.), 0.4);
}

#[test]
fn test_shapes() {
    let tri = FuzzySet::triangular("tri", 0., 5., 10.);

    assert_eq!(tri.membership_degree(0.), 0.);
    assert_eq!(tri.membership_degree(2.5), 0.5);
    assert_eq!(tri.membership_degree(5.), 1.);
    assert_eq!(tri.membership_degree(7.5), 0.5);
    assert_eq!(tri.membership_degree(11.), 0.);

    let trap = FuzzySet::trapezoidal("trap", 0., 2., 4., 8.);

    assert_eq!(trap.membership_degree(1.), 0.5);
    assert_eq!(trap.membership_degree(3.), 1.);
    assert_eq!(trap.membership_degree(6.), 0.5);
    assert_eq!(trap.membership_degree(8.), 0.);

    let bell = FuzzySet::gaussian("bell", 5., 1.);

    assert_eq!(bell.membership_degree(5.), 1.);
    assert!((bell.membership_degree(6.) - (-0.5f64).exp()).abs() < 1e-12);

    let points = FuzzySet::from_points("points", [(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]);

    assert_eq!(points.membership_degree(1.), 1.);
    assert_eq!(points.membership_degree(3.), 0.7);
    assert_eq!(points.membership_degree(9.), 0.);
}

#[test]
fn test_centroid() {
    let tri = FuzzySet::triangular("mid", 0., 5., 10.);

    assert!((tri.centroid(0., 10., None) - 5.).abs() < 0.01);
    assert!((tri.centroid(0., 10., 0.1) - 5.).abs() < 0.1);

    let right = FuzzySet::triangular("right", 6., 8., 10.);

    assert!((right.centroid(0., 10., None) - 8.).abs() < 0.01);

    let empty = FuzzySet::new("empty", |_| 0.);

    assert_eq!(empty.centroid(0., 10., None), 0.);
    assert_eq!(tri.centroid(0., 10., 0.), 0.);
}

#[test]
fn test_debug_shows_name() {
    let set = FuzzySet::new("warm", |x| x);

    assert_eq!(format!("{set:?}"), "FuzzySet { name: \"warm\", .. }");
}
