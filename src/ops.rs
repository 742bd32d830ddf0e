use num::Float;

/// Method for defuzzificating a sampled membership curve.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DefuzzificationOp {
    /// Center of Gravity
    Centroid,
    /// Bisector of Area
    Bisector,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Reduces `(x, mu)` samples to a crisp value. `step` is the sampling width
    /// used for area terms and `min` the start of the domain, which is what
    /// the bisector falls back to.
    pub fn call<F: Float>(self, samples: impl IntoIterator<Item = (F, F)>, step: F, min: F) -> F {
        match self {
            Self::Centroid => {
                let (num, den) = samples
                    .into_iter()
                    .fold((F::zero(), F::zero()), |(num, den), (x, mu)| (num + x * mu, den + mu));

                if den == F::zero() {
                    F::zero()
                } else {
                    num / den
                }
            },
            Self::Bisector => {
                let samples: Vec<_> = samples.into_iter().collect();
                let total_area = samples.iter().fold(F::zero(), |area, &(_, mu)| area + mu * step);
                let half = total_area / (F::one() + F::one());
                let mut left_area = F::zero();

                for (x, mu) in samples {
                    left_area = left_area + mu * step;

                    if left_area >= half {
                        return x;
                    }
                }

                min
            },
            Self::Mom => {
                let mut max_mu = F::neg_infinity();
                let mut sum = F::zero();
                let mut count = 0usize;

                // Single pass: a strictly greater value restarts the mean, an
                // exactly equal one extends it
                for (x, mu) in samples {
                    if mu > max_mu {
                        max_mu = mu;
                        sum = x;
                        count = 1;
                    } else if mu == max_mu {
                        sum = sum + x;
                        count += 1;
                    }
                }

                match F::from(count) {
                    Some(n) if count > 0 => sum / n,
                    _ => F::zero(),
                }
            },
            Self::Lom => {
                let mut max_mu = F::neg_infinity();
                let mut largest = None;

                for (x, mu) in samples {
                    if mu >= max_mu {
                        max_mu = mu;
                        largest = Some(x);
                    }
                }

                largest.unwrap_or_else(F::zero)
            },
            Self::Som => {
                let mut max_mu = F::neg_infinity();
                let mut smallest = None;

                for (x, mu) in samples {
                    if mu > max_mu {
                        max_mu = mu;
                        smallest = Some(x);
                    }
                }

                smallest.unwrap_or_else(F::zero)
            },
        }
    }
}

#[cfg(test)]
fn plateau(x: f64) -> f64 {
    if (4. ..=6.).contains(&x) {
        1.
    } else {
        0.
    }
}

#[cfg(test)]
fn sampled(f: fn(f64) -> f64, min: f64, max: f64, step: f64) -> Vec<(f64, f64)> {
    crate::math::Sweep::new(min, max, step).map(|x| (x, f(x))).collect()
}

#[test]
fn test_centroid() {
    let tri = |x: f64| f64::max(0., 1. - (x - 5.).abs() / 5.);
    let samples = sampled(tri, 0., 10., 0.01);

    assert!((DefuzzificationOp::Centroid.call(samples, 0.01, 0.) - 5.).abs() < 0.01);
    assert_eq!(DefuzzificationOp::Centroid.call(sampled(|_| 0., 0., 10., 0.1), 0.1, 0.), 0.);
    assert_eq!(DefuzzificationOp::Centroid.call(Vec::<(f64, f64)>::new(), 0.1, 3.), 0.);
}

#[test]
fn test_bisector() {
    let samples = sampled(plateau, 0., 10., 0.01);

    assert!((DefuzzificationOp::Bisector.call(samples, 0.01, 0.) - 5.).abs() < 0.02);

    // Zero area: the very first sample already reaches half of nothing
    assert_eq!(DefuzzificationOp::Bisector.call(sampled(|_| 0., 2., 10., 0.1), 0.1, 2.), 2.);
    assert_eq!(DefuzzificationOp::Bisector.call(Vec::<(f64, f64)>::new(), 0.1, 2.), 2.);
}

#[test]
fn test_bisector_skewed() {
    // Area [0, 1] has mass 1 at every sample, [1, 4] has none, so half the area is reached near 0.5
    let samples = vec![(0., 1.), (0.5, 1.), (1., 1.), (2., 0.), (3., 0.), (4., 0.)];

    assert_eq!(DefuzzificationOp::Bisector.call(samples, 1., 0.), 0.5);
}

#[test]
fn test_mom() {
    let samples = sampled(plateau, 0., 10., 0.01);

    assert!((DefuzzificationOp::Mom.call(samples, 0.01, 0.) - 5.).abs() < 0.02);
    assert_eq!(DefuzzificationOp::Mom.call(Vec::<(f64, f64)>::new(), 0.1, 3.), 0.);

    // A strictly greater value resets the accumulator
    let samples = vec![(0., 0.5), (1., 0.5), (2., 0.9), (3., 0.2), (4., 0.5)];

    assert_eq!(DefuzzificationOp::Mom.call(samples, 1., 0.), 2.);

    // An all-zero curve averages every sample
    let samples = vec![(1., 0.), (2., 0.), (3., 0.)];

    assert_eq!(DefuzzificationOp::Mom.call(samples, 1., 0.), 2.);
}

#[test]
fn test_lom_som() {
    let samples = vec![(0., 0.2), (1., 0.8), (2., 0.8), (3., 0.1), (4., 0.8), (5., 0.3)];

    assert_eq!(DefuzzificationOp::Lom.call(samples.clone(), 1., 0.), 4.);
    assert_eq!(DefuzzificationOp::Som.call(samples, 1., 0.), 1.);
    assert_eq!(DefuzzificationOp::Lom.call(Vec::<(f64, f64)>::new(), 1., 7.), 0.);
    assert_eq!(DefuzzificationOp::Som.call(Vec::<(f64, f64)>::new(), 1., 7.), 0.);
}
