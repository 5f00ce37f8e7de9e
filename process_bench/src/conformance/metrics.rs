use serde::{Deserialize, Serialize};

use crate::conformance::structural_precision::structural_precision;
use crate::conformance::token_based_replay::token_based_replay;
use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::PetriNet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value")]
/// Value of a conformance metric, or `Undefined` when its preconditions fail
///
/// Defined values are in `[0, 1]`. `Undefined` is an explicit state rather
/// than a NaN or negative sentinel, so it cannot silently propagate through
/// arithmetic.
pub enum MetricValue {
    /// The metric could be computed
    Defined(f64),
    /// The metric could not be computed (e.g., missing markings)
    Undefined,
}

impl MetricValue {
    /// The contained value, if defined
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Defined(v) => Some(*v),
            MetricValue::Undefined => None,
        }
    }

    /// Whether this metric value is defined
    pub fn is_defined(&self) -> bool {
        matches!(self, MetricValue::Defined(_))
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => MetricValue::Defined(v),
            None => MetricValue::Undefined,
        }
    }
}

///
/// Provider of fitness and precision metrics for a discovered model
///
/// Implementations return values in `[0, 1]` or [`MetricValue::Undefined`]
/// when the model does not meet the provider's preconditions. Providers never
/// fail a whole benchmark run.
///
pub trait MetricProvider: Send + Sync {
    /// Degree to which the model can reproduce the behavior recorded in the log
    fn fitness(&self, model: &PetriNet, log: &EventLog) -> MetricValue;

    /// Degree to which the model does not allow behavior absent from the log
    fn precision(&self, model: &PetriNet, log: &EventLog) -> MetricValue;
}

#[derive(Debug, Clone, Copy, Default)]
///
/// Default [`MetricProvider`]: token-based replay fitness and structural
/// escaping-edges precision
///
/// Replay preconditions (valid markings, unique labels) that do not hold
/// yield [`MetricValue::Undefined`] instead of an error.
///
pub struct TokenReplayMetrics;

impl TokenReplayMetrics {
    /// Create a new [`TokenReplayMetrics`] provider
    pub fn new() -> Self {
        Self
    }
}

impl MetricProvider for TokenReplayMetrics {
    fn fitness(&self, model: &PetriNet, log: &EventLog) -> MetricValue {
        match token_based_replay(model, log) {
            Ok(result) => MetricValue::Defined(result.compute_fitness()),
            Err(_) => MetricValue::Undefined,
        }
    }

    fn precision(&self, model: &PetriNet, log: &EventLog) -> MetricValue {
        structural_precision(model, log).into()
    }
}
