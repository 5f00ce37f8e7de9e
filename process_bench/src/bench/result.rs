use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bench::weights::ScoreWeights;
use crate::conformance::metrics::MetricValue;
use crate::petri_net::petri_net_struct::PetriNet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value")]
/// Integer metric score in percent (`[0, 100]`), or `Undefined`
///
/// The record-side counterpart of [`MetricValue`]: provider values in `[0, 1]`
/// are scaled to whole percent for reporting, keeping `Undefined` explicit.
pub enum MetricScore {
    /// The metric could be computed (value in `[0, 100]`)
    Defined(u32),
    /// The metric could not be computed
    Undefined,
}

impl MetricScore {
    /// Scale a provider [`MetricValue`] in `[0, 1]` to whole percent
    ///
    /// Values are truncated towards zero and clamped into `[0, 100]`.
    pub fn from_metric_value(value: MetricValue) -> Self {
        match value.value() {
            Some(v) => MetricScore::Defined((v.clamp(0.0, 1.0) * 100.0) as u32),
            None => MetricScore::Undefined,
        }
    }

    /// The contained percent value, if defined
    pub fn value(&self) -> Option<u32> {
        match self {
            MetricScore::Defined(v) => Some(*v),
            MetricScore::Undefined => None,
        }
    }

    /// Whether this score is defined
    pub fn is_defined(&self) -> bool {
        matches!(self, MetricScore::Defined(_))
    }

    /// Harmonic mean of fitness and precision (the F-measure), in percent
    ///
    /// Defined only when both inputs are defined; two defined zeros yield 0.
    pub fn harmonic_mean(fitness: MetricScore, precision: MetricScore) -> MetricScore {
        match (fitness.value(), precision.value()) {
            (Some(f), Some(p)) if f + p > 0 => MetricScore::Defined((2 * f * p) / (f + p)),
            (Some(_), Some(_)) => MetricScore::Defined(0),
            _ => MetricScore::Undefined,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
///
/// Per-algorithm outcome of one benchmark pass
///
/// Created and filled by the orchestrator; after publication only the
/// post-batch aggregation pass writes [`overall_score`](Self::overall_score).
///
pub struct AlgorithmResult {
    /// Name of the algorithm this record belongs to (unique within a run)
    pub algorithm_name: String,
    /// Wall-clock time of discovery plus optional reduction, in milliseconds
    pub execution_time_ms: u64,
    /// Number of places of the (possibly reduced) discovered model
    pub places_count: usize,
    /// Number of transitions of the (possibly reduced) discovered model
    pub transitions_count: usize,
    /// Number of arcs of the (possibly reduced) discovered model
    pub arcs_count: usize,
    /// Fitness of the discovered model, in percent
    pub fitness_score: MetricScore,
    /// Precision of the discovered model, in percent
    pub precision_score: MetricScore,
    /// F-measure (harmonic mean of fitness and precision), in percent
    pub f_measure_score: MetricScore,
    /// Whether the reported model is the reduction output
    pub reduced: bool,
    /// Failure message; when set, this record is invalid and cannot win
    pub error: Option<String>,
    /// Weighted overall score, batch-relative
    ///
    /// `None` until the full batch has been aggregated; negative infinity for
    /// invalid records. Stale if reused across runs with different weights.
    pub overall_score: Option<f64>,
}

impl AlgorithmResult {
    /// Create an empty [`AlgorithmResult`] for the given algorithm name
    pub fn new<S: Into<String>>(algorithm_name: S) -> Self {
        Self {
            algorithm_name: algorithm_name.into(),
            execution_time_ms: 0,
            places_count: 0,
            transitions_count: 0,
            arcs_count: 0,
            fitness_score: MetricScore::Undefined,
            precision_score: MetricScore::Undefined,
            f_measure_score: MetricScore::Undefined,
            reduced: false,
            error: None,
            overall_score: None,
        }
    }

    /// Whether this record is valid (no error recorded)
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Algorithm name with a reduction marker when the model was reduced
    pub fn display_name(&self) -> String {
        if self.reduced {
            format!("{} (Reduced)", self.algorithm_name)
        } else {
            self.algorithm_name.clone()
        }
    }

    /// Record the size counts of the discovered model
    pub fn record_model_size(&mut self, net: &PetriNet) {
        self.places_count = net.place_count();
        self.transitions_count = net.transition_count();
        self.arcs_count = net.arc_count();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
///
/// One complete benchmark pass over a set of algorithms against one log
///
/// Result records are appended in algorithm-completion order (equal to the
/// requested order, since execution is sequential) and never removed. The run
/// is frozen once [`completed`](Self::completed) is set.
///
pub struct ComparisonRun {
    /// Name of the benchmarked event log (if any)
    pub log_name: Option<String>,
    /// Weight configuration used for the overall scores
    pub weights: ScoreWeights,
    /// Whether silent-transition reduction was requested
    pub reduce_silent: bool,
    /// When this run was started
    pub started_at: DateTime<Utc>,
    /// Result records, in completion order
    pub results: Vec<AlgorithmResult>,
    /// Index of the winning record into [`results`](Self::results), if any
    pub winner: Option<usize>,
    /// Whether the run has finished and the batch has been scored
    pub completed: bool,
}

impl ComparisonRun {
    /// Create a new, empty [`ComparisonRun`]
    pub fn new(log_name: Option<String>, weights: ScoreWeights, reduce_silent: bool) -> Self {
        Self {
            log_name,
            weights,
            reduce_silent,
            started_at: Utc::now(),
            results: Vec::new(),
            winner: None,
            completed: false,
        }
    }

    /// The winning record, if a winner was selected
    pub fn winner_result(&self) -> Option<&AlgorithmResult> {
        self.winner.and_then(|idx| self.results.get(idx))
    }

    /// Display name of the winning algorithm, if a winner was selected
    pub fn winner_name(&self) -> Option<String> {
        self.winner_result().map(AlgorithmResult::display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_score_scaling() {
        assert_eq!(
            MetricScore::from_metric_value(MetricValue::Defined(0.825)),
            MetricScore::Defined(82)
        );
        assert_eq!(
            MetricScore::from_metric_value(MetricValue::Defined(1.0)),
            MetricScore::Defined(100)
        );
        assert_eq!(
            MetricScore::from_metric_value(MetricValue::Defined(1.5)),
            MetricScore::Defined(100)
        );
        assert_eq!(
            MetricScore::from_metric_value(MetricValue::Undefined),
            MetricScore::Undefined
        );
    }

    #[test]
    fn harmonic_mean_cases() {
        assert_eq!(
            MetricScore::harmonic_mean(MetricScore::Defined(80), MetricScore::Defined(70)),
            MetricScore::Defined(74)
        );
        assert_eq!(
            MetricScore::harmonic_mean(MetricScore::Defined(0), MetricScore::Defined(0)),
            MetricScore::Defined(0)
        );
        assert_eq!(
            MetricScore::harmonic_mean(MetricScore::Undefined, MetricScore::Defined(50)),
            MetricScore::Undefined
        );
    }

    #[test]
    fn display_name_marks_reduction() {
        let mut result = AlgorithmResult::new("Some Miner");
        assert_eq!(result.display_name(), "Some Miner");
        result.reduced = true;
        assert_eq!(result.display_name(), "Some Miner (Reduced)");
    }

    #[test]
    fn winner_lookup() {
        let mut run = ComparisonRun::new(None, ScoreWeights::default(), false);
        run.results.push(AlgorithmResult::new("A"));
        run.results.push(AlgorithmResult::new("B"));
        assert!(run.winner_name().is_none());
        run.winner = Some(1);
        assert_eq!(run.winner_name().as_deref(), Some("B"));
    }
}
