use std::collections::HashMap;

use crate::bench::normalize::NormalizedScores;
use crate::bench::result::AlgorithmResult;
use crate::bench::weights::ScoreWeights;

///
/// Combine normalized scores into one weighted overall score per record and
/// select the winner
///
/// Writes [`overall_score`](AlgorithmResult::overall_score) into every record:
/// valid records get the weighted sum of their normalized scores, invalid
/// records get negative infinity so they can never win while still appearing
/// in the batch. The winner is the first record with the strictly highest
/// overall score (a later record only replaces the current best on strict
/// improvement, so ties go to the earliest record). Returns `None` when every
/// record is invalid.
///
/// This is a single pass executed once after the full batch is known; scores
/// from before the batch completed are not authoritative and are overwritten
/// here.
///
pub fn aggregate_scores(
    results: &mut [AlgorithmResult],
    normalized: &HashMap<usize, NormalizedScores>,
    weights: &ScoreWeights,
) -> Option<usize> {
    let mut winner = None;
    let mut best = f64::NEG_INFINITY;
    for (idx, result) in results.iter_mut().enumerate() {
        let Some(scores) = normalized.get(&idx).filter(|_| result.is_valid()) else {
            result.overall_score = Some(f64::NEG_INFINITY);
            continue;
        };
        let overall = weights.fitness * scores.fitness
            + weights.precision * scores.precision
            + weights.f_measure * scores.f_measure
            + weights.time * scores.time;
        result.overall_score = Some(overall);
        if overall > best {
            best = overall;
            winner = Some(idx);
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::normalize::normalize_batch;
    use crate::bench::result::MetricScore;

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
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn worked_scenario() {
        let mut results = vec![
            record("A", 80, 70, 75, 1000),
            record("B", 90, 60, 72, 2000),
            record("C", 70, 85, 77, 500),
        ];
        let weights = ScoreWeights::new(0.4, 0.4, 0.1, 0.1);
        let normalized = normalize_batch(&results);
        let winner = aggregate_scores(&mut results, &normalized, &weights);

        assert_close(results[0].overall_score.unwrap(), 0.4867);
        assert_close(results[1].overall_score.unwrap(), 0.4333);
        assert_close(results[2].overall_score.unwrap(), 0.6);
        assert_eq!(winner, Some(2));
    }

    #[test]
    fn invalid_record_gets_negative_infinity() {
        let mut results = vec![record("A", 80, 70, 75, 1000), record("B", 0, 0, 0, 1)];
        results[1].error = Some("discovery failed".to_string());
        let normalized = normalize_batch(&results);
        let winner = aggregate_scores(&mut results, &normalized, &ScoreWeights::default());
        assert_eq!(results[1].overall_score, Some(f64::NEG_INFINITY));
        assert_eq!(winner, Some(0));
    }

    #[test]
    fn all_invalid_yields_no_winner() {
        let mut results = vec![record("A", 0, 0, 0, 0), record("B", 0, 0, 0, 0)];
        results[0].error = Some("x".to_string());
        results[1].error = Some("y".to_string());
        let normalized = normalize_batch(&results);
        let winner = aggregate_scores(&mut results, &normalized, &ScoreWeights::default());
        assert_eq!(winner, None);
        assert!(results
            .iter()
            .all(|r| r.overall_score == Some(f64::NEG_INFINITY)));
    }

    #[test]
    fn tie_break_picks_first_seen() {
        // Identical raw scores and times: every record aggregates to the same
        // overall score, so the first record in batch order must win
        let mut results = vec![
            record("A", 50, 50, 50, 100),
            record("B", 50, 50, 50, 100),
        ];
        let weights = ScoreWeights::new(0.5, 0.5, 0.0, 0.0);
        let normalized = normalize_batch(&results);
        let winner = aggregate_scores(&mut results, &normalized, &weights);
        assert_eq!(
            results[0].overall_score.unwrap(),
            results[1].overall_score.unwrap()
        );
        assert_eq!(winner, Some(0));
    }

    #[test]
    fn zero_scoring_valid_record_still_wins_over_invalid() {
        let mut results = vec![record("A", 0, 0, 0, 10), record("B", 0, 0, 0, 10)];
        results[1].error = Some("x".to_string());
        let normalized = normalize_batch(&results);
        let winner = aggregate_scores(&mut results, &normalized, &ScoreWeights::default());
        assert_eq!(winner, Some(0));
    }
}
