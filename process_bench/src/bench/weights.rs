use serde::{Deserialize, Serialize};

/// Tolerance for the weight-sum check
pub const WEIGHT_SUM_EPSILON: f64 = 0.001;

///
/// Error encountered while validating a [`ScoreWeights`] configuration
///
#[derive(Debug, Clone, PartialEq)]
pub enum WeightError {
    /// A weight is negative (with its name and value included)
    Negative {
        /// Name of the offending weight
        name: &'static str,
        /// Its value
        value: f64,
    },
    /// The weights do not sum to 1.0 (with the actual sum included)
    SumNotOne(f64),
}

impl std::fmt::Display for WeightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightError::Negative { name, value } => {
                write!(f, "All weights must be non-negative ({} is {})", name, value)
            }
            WeightError::SumNotOne(sum) => {
                write!(f, "Weights must sum to 1.0 (current sum: {:.3})", sum)
            }
        }
    }
}

impl std::error::Error for WeightError {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
///
/// Weight configuration combining the four normalized metrics into one overall score
///
/// All weights must be non-negative and sum to 1.0 (within
/// [`WEIGHT_SUM_EPSILON`]); see [`ScoreWeights::validate`].
///
pub struct ScoreWeights {
    /// Weight of the normalized fitness score
    pub fitness: f64,
    /// Weight of the normalized precision score
    pub precision: f64,
    /// Weight of the normalized execution-time score
    pub time: f64,
    /// Weight of the normalized F-measure score
    pub f_measure: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            fitness: 0.4,
            precision: 0.4,
            time: 0.1,
            f_measure: 0.1,
        }
    }
}

impl ScoreWeights {
    /// Create a new [`ScoreWeights`] configuration (not yet validated)
    pub fn new(fitness: f64, precision: f64, time: f64, f_measure: f64) -> Self {
        Self {
            fitness,
            precision,
            time,
            f_measure,
        }
    }

    /// Sum of all four weights
    pub fn sum(&self) -> f64 {
        self.fitness + self.precision + self.time + self.f_measure
    }

    /// Validate this configuration: all weights non-negative, sum 1.0 ± [`WEIGHT_SUM_EPSILON`]
    pub fn validate(&self) -> Result<(), WeightError> {
        for (name, value) in [
            ("fitness", self.fitness),
            ("precision", self.precision),
            ("time", self.time),
            ("f_measure", self.f_measure),
        ] {
            if value < 0.0 {
                return Err(WeightError::Negative { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(WeightError::SumNotOne(sum));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        assert!(ScoreWeights::default().validate().is_ok());
    }

    #[test]
    fn sum_within_epsilon_accepted() {
        assert!(ScoreWeights::new(0.25, 0.25, 0.25, 0.25).validate().is_ok());
        assert!(ScoreWeights::new(0.4005, 0.4, 0.1, 0.1).validate().is_ok());
        assert!(ScoreWeights::new(1.0, 0.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn sum_off_by_more_than_epsilon_rejected() {
        assert!(matches!(
            ScoreWeights::new(0.5, 0.4, 0.1, 0.1).validate(),
            Err(WeightError::SumNotOne(_))
        ));
        assert!(matches!(
            ScoreWeights::new(0.0, 0.0, 0.0, 0.0).validate(),
            Err(WeightError::SumNotOne(_))
        ));
    }

    #[test]
    fn negative_weight_rejected() {
        assert!(matches!(
            ScoreWeights::new(-0.1, 0.6, 0.3, 0.2).validate(),
            Err(WeightError::Negative {
                name: "fitness",
                ..
            })
        ));
    }
}
