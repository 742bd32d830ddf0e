use std::ops::RangeInclusive;

use tracing::warn;

use crate::error::DomainError;
use crate::math::Sweep;

/// Sampling step used when none is given.
pub const DEFAULT_STEP: f64 = 0.01;

/// A sampled interval of the real line, used by every defuzzification method.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    min: f64,
    max: f64,
    step: f64,
}

impl Domain {
    /// If the step value is not provided, it defaults to [`DEFAULT_STEP`]
    pub fn new(range: RangeInclusive<f64>, step: impl Into<Option<f64>>) -> Result<Self, DomainError> {
        let min = *range.start();
        let max = *range.end();
        let step = step.into().unwrap_or(DEFAULT_STEP);

        if !min.is_finite() || !max.is_finite() {
            return Err(DomainError::NonFiniteBounds { min, max });
        }
        if min > max {
            return Err(DomainError::Inverted { min, max });
        }
        if !(step > 0. && step.is_finite()) {
            return Err(DomainError::InvalidStep(step));
        }
        // The sweep stalls wherever `x + step` rounds back to `x`; the largest
        // magnitudes are at the bounds
        for at in [min, max] {
            if at + step <= at {
                return Err(DomainError::StepVanishes { step, at });
            }
        }

        Ok(Domain { min, max, step })
    }

    /// Builds a domain without validating it. An inverted range or an unusable
    /// step simply produces no samples.
    pub(crate) fn unchecked(min: f64, max: f64, step: Option<f64>) -> Self {
        let step = step.unwrap_or(DEFAULT_STEP);

        if !(step > 0. && step.is_finite()) {
            warn!(min, max, step, "sampling step is not positive and finite; no samples will be taken");
        }

        Domain { min, max, step }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub(crate) fn sweep(&self) -> Sweep<f64> {
        Sweep::new(self.min, self.max, self.step)
    }
}

#[test]
fn test_domain_validation() {
    let domain = Domain::new(0. ..=10., None).unwrap();

    assert_eq!(domain.min(), 0.);
    assert_eq!(domain.max(), 10.);
    assert_eq!(domain.step(), DEFAULT_STEP);
    assert_eq!(Domain::new(0. ..=10., 0.5).unwrap().step(), 0.5);

    assert_eq!(
        Domain::new(0. ..=f64::INFINITY, None),
        Err(DomainError::NonFiniteBounds {
            min: 0.,
            max: f64::INFINITY
        })
    );
    assert_eq!(
        Domain::new(3. ..=1., None),
        Err(DomainError::Inverted { min: 3., max: 1. })
    );
    assert_eq!(Domain::new(0. ..=1., 0.), Err(DomainError::InvalidStep(0.)));
    assert_eq!(Domain::new(0. ..=1., -0.1), Err(DomainError::InvalidStep(-0.1)));
    assert!(matches!(Domain::new(0. ..=1., f64::NAN), Err(DomainError::InvalidStep(_))));
}

#[test]
fn test_domain_rejects_steps_lost_to_rounding() {
    assert_eq!(
        Domain::new(1e17..=1e17 + 64., 0.01),
        Err(DomainError::StepVanishes { step: 0.01, at: 1e17 })
    );
    assert_eq!(
        Domain::new(-1e17..=0., 0.01),
        Err(DomainError::StepVanishes { step: 0.01, at: -1e17 })
    );
    assert_eq!(
        Domain::new(0. ..=1e17, 0.01),
        Err(DomainError::StepVanishes { step: 0.01, at: 1e17 })
    );

    // Large but still representable increments are fine and the sweep ends
    let domain = Domain::new(1e17..=1e17 + 64., 16.).unwrap();

    assert_eq!(domain.sweep().count(), 5);
}

#[test]
fn test_domain_error_messages() {
    assert_eq!(
        DomainError::InvalidStep(0.).to_string(),
        "sampling step must be positive and finite, got 0"
    );
    assert_eq!(
        DomainError::Inverted { min: 3., max: 1. }.to_string(),
        "domain minimum 3 is greater than its maximum 1"
    );
}

#[test]
fn test_unchecked_domain_sweeps_nothing_on_bad_step() {
    assert_eq!(Domain::unchecked(0., 1., Some(0.)).sweep().count(), 0);
    assert_eq!(Domain::unchecked(0., 1., Some(0.25)).sweep().count(), 5);
    assert_eq!(Domain::unchecked(0., 0.05, None).sweep().count(), 6);
}
