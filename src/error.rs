use thiserror::Error;

/// Reasons a sampling [`Domain`](crate::Domain) can be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("domain bounds must be finite, got {min}..={max}")]
    NonFiniteBounds { min: f64, max: f64 },
    #[error("domain minimum {min} is greater than its maximum {max}")]
    Inverted { min: f64, max: f64 },
    #[error("sampling step must be positive and finite, got {0}")]
    InvalidStep(f64),
    #[error("sampling step {step} is lost to rounding at {at}")]
    StepVanishes { step: f64, at: f64 },
}
