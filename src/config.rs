use crate::ops::Implication;

pub const DEFAULT_SAMPLES: usize = 1000;
/// Upper bound on the subdivisions of a sampled domain. Larger counts are clamped to it.
pub const MAX_SAMPLES: usize = 1 << 20;

/// Knobs shared by every evaluation of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InferenceConfig {
    /// How a rule's firing strength shapes its conclusion
    pub implication: Implication,
    /// Subdivisions of an output variable's domain for the sampled defuzzification methods,
    /// clamped to `1..=MAX_SAMPLES` when sampling
    pub samples: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            implication: Implication::Min,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl InferenceConfig {
    pub fn with_implication(mut self, implication: Implication) -> Self {
        self.implication = implication;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }
}
