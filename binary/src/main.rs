use std::sync::Arc;
use std::time::Instant;

use process_bench::bench::orchestrator::{channel_observer, BenchEvent, BenchmarkRunner};
use process_bench::bench::weights::ScoreWeights;
use process_bench::discovery::registry::AlgorithmRegistry;
use process_bench::event_log::event_log_struct::EventLog;
use process_bench::export_run_to_csv_path;

fn repair_shop_log() -> EventLog {
    let mut log = EventLog::from_activity_traces(vec![
        vec![
            "Register",
            "Analyze Defect",
            "Repair (Simple)",
            "Test Repair",
            "Inform User",
            "Archive Repair",
        ],
        vec![
            "Register",
            "Analyze Defect",
            "Repair (Complex)",
            "Test Repair",
            "Inform User",
            "Archive Repair",
        ],
        vec![
            "Register",
            "Analyze Defect",
            "Repair (Simple)",
            "Test Repair",
            "Restart Repair",
            "Repair (Complex)",
            "Test Repair",
            "Inform User",
            "Archive Repair",
        ],
        vec![
            "Register",
            "Analyze Defect",
            "Inform User",
            "Archive Repair",
        ],
    ]);
    log.name = Some("repair-shop".to_string());
    log
}

fn main() {
    let log = repair_shop_log();
    println!(
        "Benchmarking {} traces / {} events",
        log.traces.len(),
        log.total_events()
    );

    let runner = Arc::new(BenchmarkRunner::new(AlgorithmRegistry::with_defaults()));
    let algorithms = runner.available_algorithms();
    let (observer, events) = channel_observer();

    let now = Instant::now();
    let handle = match runner.spawn_comparison(
        log,
        algorithms,
        ScoreWeights::default(),
        true,
        observer,
    ) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Comparison rejected: {}", e);
            return;
        }
    };

    // Drain incremental progress while the worker runs
    for event in events {
        match event {
            BenchEvent::Result(result) => {
                if let Some(message) = &result.error {
                    println!("  {} FAILED: {}", result.display_name(), message);
                } else {
                    println!(
                        "  {} finished in {} ms (fitness {:?}, precision {:?})",
                        result.display_name(),
                        result.execution_time_ms,
                        result.fitness_score,
                        result.precision_score,
                    );
                }
            }
            BenchEvent::Complete(_) => break,
            BenchEvent::Rejected(reason) => {
                eprintln!("Comparison rejected: {}", reason);
                return;
            }
        }
    }

    let run = match handle.join() {
        Ok(run) => run,
        Err(_) => {
            eprintln!("Benchmark worker terminated unexpectedly");
            return;
        }
    };
    println!("Comparison finished in {:#?}", now.elapsed());

    for result in &run.results {
        println!(
            "{:<30} overall score: {}",
            result.display_name(),
            result
                .overall_score
                .filter(|s| s.is_finite())
                .map(|s| format!("{:.4}", s))
                .unwrap_or_else(|| "-".to_string())
        );
    }
    match run.winner_name() {
        Some(winner) => println!("Best: {}", winner),
        None => println!("No winner (all algorithms failed)"),
    }

    if let Err(e) = export_run_to_csv_path(&run, "comparison_results.csv") {
        eprintln!("Could not export results: {}", e);
    } else {
        println!("Results written to comparison_results.csv");
    }
}
