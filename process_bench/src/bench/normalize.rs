use std::collections::HashMap;

use itertools::{Itertools, MinMaxResult};

use crate::bench::result::{AlgorithmResult, MetricScore};

/// Upper bound of the fixed-range fallback normalization (percent scale)
const FIXED_RANGE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Batch-normalized per-metric scores of one result record, each in `[0, 1]`
pub struct NormalizedScores {
    /// Normalized fitness
    pub fitness: f64,
    /// Normalized precision
    pub precision: f64,
    /// Normalized F-measure
    pub f_measure: f64,
    /// Normalized execution time (percentile rank; faster is higher)
    pub time: f64,
}

///
/// Normalize all metric scores of a batch relative to the batch itself
///
/// Only valid records (no error recorded) participate and receive scores; the
/// returned map is keyed by the record's index in `results`. Fitness,
/// precision and F-measure are min/max normalized over the defined values of
/// the batch; when the range is degenerate (all values equal, or a single
/// valid record) a fixed `[0, 100]` range is used instead, so every record in
/// that case receives the same number. Undefined values are excluded from the
/// range computation but still normalize to exactly 0.
///
/// Execution time is scored by percentile rank: valid records are ordered by
/// ascending time (ties broken by batch order) and the record at 0-based rank
/// `r` of `n` scores `1 - r/n`, independent of the absolute magnitudes.
///
/// The function is pure; normalizing an unchanged batch twice yields
/// identical results.
///
pub fn normalize_batch(results: &[AlgorithmResult]) -> HashMap<usize, NormalizedScores> {
    let valid: Vec<(usize, &AlgorithmResult)> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_valid())
        .collect();

    let fitness_range = metric_range(valid.iter().map(|(_, r)| r.fitness_score));
    let precision_range = metric_range(valid.iter().map(|(_, r)| r.precision_score));
    let f_measure_range = metric_range(valid.iter().map(|(_, r)| r.f_measure_score));
    let time_scores = time_percentile_scores(&valid);

    valid
        .iter()
        .map(|(idx, r)| {
            (
                *idx,
                NormalizedScores {
                    fitness: normalize_metric(r.fitness_score, fitness_range),
                    precision: normalize_metric(r.precision_score, precision_range),
                    f_measure: normalize_metric(r.f_measure_score, f_measure_range),
                    time: time_scores[idx],
                },
            )
        })
        .collect()
}

/// Min and max over the defined values of one metric (None if no value is defined)
fn metric_range(scores: impl Iterator<Item = MetricScore>) -> Option<(u32, u32)> {
    match scores.filter_map(|s| s.value()).minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

fn normalize_metric(score: MetricScore, range: Option<(u32, u32)>) -> f64 {
    let Some(value) = score.value() else {
        return 0.0;
    };
    match range {
        Some((min, max)) if max > min => f64::from(value - min) / f64::from(max - min),
        // Degenerate range: fall back to the fixed percent scale
        _ => f64::from(value) / FIXED_RANGE_MAX,
    }
}

fn time_percentile_scores(valid: &[(usize, &AlgorithmResult)]) -> HashMap<usize, f64> {
    let count = valid.len() as f64;
    let mut by_time: Vec<(usize, u64)> = valid
        .iter()
        .map(|(idx, r)| (*idx, r.execution_time_ms))
        .collect();
    // Stable sort keeps batch order among equal times
    by_time.sort_by_key(|(_, time)| *time);
    by_time
        .into_iter()
        .enumerate()
        .map(|(rank, (idx, _))| (idx, 1.0 - rank as f64 / count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        name: &str,
        fitness: u32,
        precision: u32,
        f_measure: u32,
        time_ms: u64,
    ) -> AlgorithmResult {
        AlgorithmResult {
            fitness_score: MetricScore::Defined(fitness),
            precision_score: MetricScore::Defined(precision),
            f_measure_score: MetricScore::Defined(f_measure),
            execution_time_ms: time_ms,
            ..AlgorithmResult::new(name)
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn min_max_normalization_over_batch() {
        let results = vec![
            record("A", 80, 70, 75, 1000),
            record("B", 90, 60, 72, 2000),
            record("C", 70, 85, 77, 500),
        ];
        let normalized = normalize_batch(&results);
        assert_close(normalized[&0].fitness, 0.5);
        assert_close(normalized[&1].fitness, 1.0);
        assert_close(normalized[&2].fitness, 0.0);
        assert_close(normalized[&0].precision, 0.4);
        assert_close(normalized[&1].precision, 0.0);
        assert_close(normalized[&2].precision, 1.0);
        assert_close(normalized[&0].f_measure, 0.6);
        assert_close(normalized[&1].f_measure, 0.0);
        assert_close(normalized[&2].f_measure, 1.0);
    }

    #[test]
    fn time_follows_percentile_rank() {
        let results = vec![
            record("A", 50, 50, 50, 500),
            record("B", 50, 50, 50, 1000),
            record("C", 50, 50, 50, 2000),
        ];
        let normalized = normalize_batch(&results);
        assert_close(normalized[&0].time, 1.0);
        assert_close(normalized[&1].time, 2.0 / 3.0);
        assert_close(normalized[&2].time, 1.0 / 3.0);

        // Percentile spacing is independent of absolute magnitudes
        let results = vec![
            record("A", 50, 50, 50, 1),
            record("B", 50, 50, 50, 2),
            record("C", 50, 50, 50, 100_000),
        ];
        let normalized = normalize_batch(&results);
        assert_close(normalized[&0].time, 1.0);
        assert_close(normalized[&1].time, 2.0 / 3.0);
        assert_close(normalized[&2].time, 1.0 / 3.0);
    }

    #[test]
    fn time_ties_broken_by_batch_order() {
        let results = vec![
            record("A", 50, 50, 50, 700),
            record("B", 50, 50, 50, 700),
        ];
        let normalized = normalize_batch(&results);
        assert_close(normalized[&0].time, 1.0);
        assert_close(normalized[&1].time, 0.5);
    }

    #[test]
    fn degenerate_range_falls_back_to_fixed_scale() {
        let results = vec![
            record("A", 80, 80, 80, 100),
            record("B", 80, 80, 80, 200),
        ];
        let normalized = normalize_batch(&results);
        assert_close(normalized[&0].fitness, 0.8);
        assert_close(normalized[&1].fitness, 0.8);

        // Single valid record behaves the same way
        let results = vec![record("A", 60, 60, 60, 100)];
        let normalized = normalize_batch(&results);
        assert_close(normalized[&0].fitness, 0.6);
        assert_close(normalized[&0].time, 1.0);
    }

    #[test]
    fn undefined_scores_normalize_to_zero_and_skip_range() {
        let mut results = vec![
            record("A", 80, 70, 75, 100),
            record("B", 90, 60, 72, 200),
            record("C", 70, 85, 77, 300),
        ];
        results[1].fitness_score = MetricScore::Undefined;
        let normalized = normalize_batch(&results);
        // Range over defined values only: {80, 70}
        assert_close(normalized[&0].fitness, 1.0);
        assert_close(normalized[&1].fitness, 0.0);
        assert_close(normalized[&2].fitness, 0.0);
    }

    #[test]
    fn invalid_records_receive_no_scores() {
        let mut results = vec![record("A", 80, 70, 75, 100), record("B", 90, 60, 72, 50)];
        results[1].error = Some("boom".to_string());
        let normalized = normalize_batch(&results);
        assert!(normalized.contains_key(&0));
        assert!(!normalized.contains_key(&1));
        // The invalid record's time does not participate in the ranking
        assert_close(normalized[&0].time, 1.0);
    }

    #[test]
    fn normalization_is_idempotent_and_batch_relative() {
        let results = vec![
            record("A", 80, 70, 75, 1000),
            record("B", 90, 60, 72, 2000),
        ];
        let first = normalize_batch(&results);
        let second = normalize_batch(&results);
        assert_eq!(first, second);

        // Changing one record's raw value shifts other records' scores
        let mut changed = results.clone();
        changed[1].fitness_score = MetricScore::Defined(60);
        let after = normalize_batch(&changed);
        assert_close(first[&0].fitness, 0.0);
        assert_close(after[&0].fitness, 1.0);
    }

    #[test]
    fn empty_batch() {
        assert!(normalize_batch(&[]).is_empty());
    }
}
