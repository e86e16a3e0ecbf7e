use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence score clamped to [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Default threshold a reviewer must meet to certify a unit.
    pub const CERTIFICATION: f64 = 0.8;
    /// Default confidence assigned to generated candidates.
    pub const GENERATED_DEFAULT: f64 = 0.5;
    /// Default ceiling applied whenever generation fallback is used.
    pub const GENERATION_CEILING: f64 = 0.7;

    /// Create a new Confidence, clamping to [0.0, 1.0]. NaN becomes 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this confidence meets the given threshold.
    pub fn meets(self, threshold: f64) -> bool {
        self.0 >= threshold
    }

    /// Cap at the given ceiling.
    pub fn capped(self, ceiling: f64) -> Self {
        Self::new(self.0.min(ceiling))
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(Self::GENERATED_DEFAULT)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}
