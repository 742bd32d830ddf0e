use num::Float;

/// Similar to numpy.interp, for a single point. Outside the coordinates the
/// end values are held.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let mut iter = coords.iter().copied().enumerate().peekable();

    while let Some((i, (x1, y1))) = iter.next() {
        // Base cases
        if i == 0 && x < x1 {
            return y1;
        }
        if iter.peek().is_none() && x > x1 {
            return y1;
        }

        let Some(&(_, (x2, y2))) = iter.peek() else {
            // Last coordinate reached without a bracketing segment
            return y1;
        };

        // Actual interpolation
        if x1 <= x && x <= x2 {
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // No coordinates
    F::zero()
}

/// Walks a domain from `min` by repeatedly adding `step` while the running
/// value stays `<= max`.
///
/// Positions are accumulated in floating point and drift like a `x += step`
/// loop would, so the last sample is not snapped to `max`. A step that is not strictly
/// positive and finite yields nothing.
pub(crate) struct Sweep<F> {
    next: F,
    max: F,
    step: F,
}

impl<F: Float> Sweep<F> {
    pub(crate) fn new(min: F, max: F, step: F) -> Self {
        let max = if step > F::zero() && step.is_finite() {
            max
        } else {
            // Forces the first comparison to fail
            F::neg_infinity()
        };

        Sweep { next: min, max, step }
    }
}

impl<F: Float> Iterator for Sweep<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        // NaN bounds fail this comparison too
        if self.next <= self.max {
            let x = self.next;
            self.next = self.next + self.step;
            Some(x)
        } else {
            None
        }
    }
}

#[test]
fn test_interp() {
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let coords: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();
    let x = [0., 1., 1.5, 2.72, 3.24];

    assert_eq!(
        x.iter().map(|x| interp(*x, &coords)).collect::<Vec<_>>(),
        vec![3., 3., 2.5, 0.5599999999999996, 0.]
    );

    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let coords: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();
    let x = [2.5, -1., 7.5];

    assert_eq!(x.iter().map(|x| interp(*x, &coords)).collect::<Vec<_>>(), vec![4., 0., 2.]);
}

#[test]
fn test_interp_degenerate_coords() {
    assert_eq!(interp(3.0f64, &[]), 0.);
    assert_eq!(interp(3.0f64, &[(1., 0.4)]), 0.4);
    assert_eq!(interp(1.0f64, &[(1., 0.4)]), 0.4);
    assert_eq!(interp(-3.0f64, &[(1., 0.4)]), 0.4);
}

#[test]
fn test_sweep() {
    let samples: Vec<f64> = Sweep::new(0., 1., 0.25).collect();

    assert_eq!(samples, vec![0., 0.25, 0.5, 0.75, 1.]);

    // 0.1 accumulates past 0.3 after two additions, so 0.3 itself is never sampled
    let samples: Vec<f64> = Sweep::new(0., 0.3, 0.1).collect();

    assert_eq!(samples, vec![0., 0.1, 0.2]);

    assert_eq!(Sweep::new(0., 1., 0.).count(), 0);
    assert_eq!(Sweep::new(0., 1., -0.5).count(), 0);
    assert_eq!(Sweep::new(0., 1., f64::NAN).count(), 0);
    assert_eq!(Sweep::new(1., 0., 0.1).count(), 0);
    assert_eq!(Sweep::new(2., 2., 0.1).collect::<Vec<f64>>(), vec![2.]);
}
