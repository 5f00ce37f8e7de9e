use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use itertools::Itertools;

use crate::bench::aggregate::aggregate_scores;
use crate::bench::normalize::normalize_batch;
use crate::bench::result::{AlgorithmResult, ComparisonRun, MetricScore};
use crate::bench::weights::{ScoreWeights, WeightError};
use crate::conformance::metrics::{MetricProvider, TokenReplayMetrics};
use crate::discovery::registry::AlgorithmRegistry;
use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::PetriNet;
use crate::reduction::silent_reduction::reduce_silent_transitions;

///
/// Reasons a comparison run is rejected before any algorithm executes
///
#[derive(Debug, Clone)]
pub enum RunRejected {
    /// The weight configuration is invalid
    InvalidWeights(WeightError),
    /// The passed event log contains no events
    EmptyLog,
    /// Another run is already in progress on this runner
    RunInProgress,
}

impl std::fmt::Display for RunRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunRejected::InvalidWeights(e) => write!(f, "{}", e),
            RunRejected::EmptyLog => write!(f, "Event log is empty"),
            RunRejected::RunInProgress => write!(f, "A comparison run is already in progress"),
        }
    }
}

impl std::error::Error for RunRejected {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunRejected::InvalidWeights(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WeightError> for RunRejected {
    fn from(e: WeightError) -> Self {
        RunRejected::InvalidWeights(e)
    }
}

///
/// Observer of a comparison run's progress
///
/// Callbacks are invoked on the thread executing the run (the worker thread
/// for [`BenchmarkRunner::spawn_comparison`]); an observer driving a UI must
/// marshal back onto its own event loop, e.g. via [`channel_observer`].
///
pub trait BenchObserver: Send {
    /// One algorithm finished; records arrive in execution order
    ///
    /// The record's overall score is not yet set at this point; authoritative
    /// scores exist only on the completed run.
    fn on_result(&self, _result: &AlgorithmResult) {}

    /// The batch finished and has been scored
    fn on_complete(&self, _run: &ComparisonRun) {}

    /// The run was rejected before starting
    fn on_run_rejected(&self, _reason: &RunRejected) {}
}

/// No-op observer for callers that only need the returned [`ComparisonRun`]
impl BenchObserver for () {}

#[derive(Debug, Clone)]
/// Progress events of a comparison run, as published by a [`ChannelObserver`]
pub enum BenchEvent {
    /// One algorithm finished (overall score not yet set)
    Result(AlgorithmResult),
    /// The run finished; contains the fully scored [`ComparisonRun`]
    Complete(ComparisonRun),
    /// The run was rejected before starting
    Rejected(String),
}

#[derive(Debug)]
/// [`BenchObserver`] forwarding every event into an [`mpsc`](std::sync::mpsc) channel
///
/// Lets a single consumer (e.g. a UI event loop) drain worker progress on its
/// own thread. Events for a vanished receiver are silently dropped.
pub struct ChannelObserver {
    sender: Sender<BenchEvent>,
}

impl BenchObserver for ChannelObserver {
    fn on_result(&self, result: &AlgorithmResult) {
        let _ = self.sender.send(BenchEvent::Result(result.clone()));
    }

    fn on_complete(&self, run: &ComparisonRun) {
        let _ = self.sender.send(BenchEvent::Complete(run.clone()));
    }

    fn on_run_rejected(&self, reason: &RunRejected) {
        let _ = self.sender.send(BenchEvent::Rejected(reason.to_string()));
    }
}

/// Create a [`ChannelObserver`] plus the receiving end of its channel
pub fn channel_observer() -> (ChannelObserver, Receiver<BenchEvent>) {
    let (sender, receiver) = channel();
    (ChannelObserver { sender }, receiver)
}

/// Releases the single-flight flag when the run ends, panics included
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

///
/// Drives one complete comparison run: discovery, optional reduction, timing
/// and metric collection per algorithm, followed by batch-wide scoring
///
/// Algorithms execute strictly sequentially; their handles are stateful and
/// not safe for concurrent invocation. A failing algorithm is recorded on its
/// own [`AlgorithmResult`] and never aborts the run. At most one run may be
/// active per runner at a time; concurrent requests are rejected with
/// [`RunRejected::RunInProgress`] without touching the active run.
///
/// There is no cancellation: once an algorithm has started, the run can only
/// finish it (known limitation).
///
pub struct BenchmarkRunner {
    registry: Mutex<AlgorithmRegistry>,
    metrics: Box<dyn MetricProvider>,
    running: AtomicBool,
}

impl std::fmt::Debug for BenchmarkRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkRunner")
            .field("registry", &self.registry)
            .field("running", &self.running)
            .finish()
    }
}

impl BenchmarkRunner {
    /// Create a [`BenchmarkRunner`] with the default metric provider
    /// ([`TokenReplayMetrics`])
    pub fn new(registry: AlgorithmRegistry) -> Self {
        Self::with_metrics(registry, Box::new(TokenReplayMetrics::new()))
    }

    /// Create a [`BenchmarkRunner`] with a custom metric provider
    pub fn with_metrics(registry: AlgorithmRegistry, metrics: Box<dyn MetricProvider>) -> Self {
        Self {
            registry: Mutex::new(registry),
            metrics,
            running: AtomicBool::new(false),
        }
    }

    /// Names of all registered algorithms, in registration order
    pub fn available_algorithms(&self) -> Vec<String> {
        lock_registry(&self.registry).available()
    }

    /// Run a comparison over all registered algorithms (see [`run_comparison`](Self::run_comparison))
    pub fn run_all(
        &self,
        log: &EventLog,
        weights: ScoreWeights,
        reduce_silent: bool,
        observer: &dyn BenchObserver,
    ) -> Result<ComparisonRun, RunRejected> {
        let names = self.available_algorithms();
        self.run_comparison(log, &names, weights, reduce_silent, observer)
    }

    /// Run a comparison of the named algorithms against the given log, on the
    /// calling thread
    ///
    /// The weight configuration is validated first; an invalid configuration,
    /// an empty log or an already active run rejects synchronously (also
    /// reported via [`BenchObserver::on_run_rejected`]) with no algorithm
    /// executed. Duplicate names are collapsed to their first occurrence, so
    /// the run holds exactly one record per requested algorithm.
    ///
    /// Each completed record is published through the observer before the
    /// next algorithm starts; after the last algorithm, the whole batch is
    /// normalized and aggregated in one pass, the winner is selected and
    /// [`BenchObserver::on_complete`] fires with the frozen run.
    pub fn run_comparison(
        &self,
        log: &EventLog,
        algorithm_names: &[String],
        weights: ScoreWeights,
        reduce_silent: bool,
        observer: &dyn BenchObserver,
    ) -> Result<ComparisonRun, RunRejected> {
        self.check_inputs(log, weights, observer)?;
        self.try_acquire(observer)?;
        let _guard = FlightGuard(&self.running);
        Ok(self.execute(log, algorithm_names, weights, reduce_silent, observer))
    }

    /// Run a comparison on a dedicated worker thread
    ///
    /// Validation and the single-flight check happen synchronously before the
    /// worker starts, so rejections surface to the caller immediately. The
    /// returned handle joins into the finished [`ComparisonRun`]; incremental
    /// progress arrives through the observer on the worker thread.
    pub fn spawn_comparison<O>(
        self: &Arc<Self>,
        log: EventLog,
        algorithm_names: Vec<String>,
        weights: ScoreWeights,
        reduce_silent: bool,
        observer: O,
    ) -> Result<JoinHandle<ComparisonRun>, RunRejected>
    where
        O: BenchObserver + 'static,
    {
        self.check_inputs(&log, weights, &observer)?;
        self.try_acquire(&observer)?;
        let runner = Arc::clone(self);
        Ok(std::thread::spawn(move || {
            let _guard = FlightGuard(&runner.running);
            runner.execute(&log, &algorithm_names, weights, reduce_silent, &observer)
        }))
    }

    fn check_inputs(
        &self,
        log: &EventLog,
        weights: ScoreWeights,
        observer: &dyn BenchObserver,
    ) -> Result<(), RunRejected> {
        if let Err(e) = weights.validate() {
            let rejection = RunRejected::InvalidWeights(e);
            observer.on_run_rejected(&rejection);
            return Err(rejection);
        }
        if log.is_empty() {
            observer.on_run_rejected(&RunRejected::EmptyLog);
            return Err(RunRejected::EmptyLog);
        }
        Ok(())
    }

    fn try_acquire(&self, observer: &dyn BenchObserver) -> Result<(), RunRejected> {
        if self
            .running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            observer.on_run_rejected(&RunRejected::RunInProgress);
            return Err(RunRejected::RunInProgress);
        }
        Ok(())
    }

    /// The run body; assumes validated inputs and the single-flight flag held
    fn execute(
        &self,
        log: &EventLog,
        algorithm_names: &[String],
        weights: ScoreWeights,
        reduce_silent: bool,
        observer: &dyn BenchObserver,
    ) -> ComparisonRun {
        let mut run = ComparisonRun::new(log.name.clone(), weights, reduce_silent);
        for name in algorithm_names.iter().unique() {
            let result = self.run_single(name, log, reduce_silent);
            observer.on_result(&result);
            run.results.push(result);
        }
        let normalized = normalize_batch(&run.results);
        run.winner = aggregate_scores(&mut run.results, &normalized, &run.weights);
        run.completed = true;
        observer.on_complete(&run);
        run
    }

    fn run_single(&self, name: &str, log: &EventLog, reduce_silent: bool) -> AlgorithmResult {
        let mut result = AlgorithmResult::new(name);
        let started = Instant::now();

        let mut model = {
            let mut registry = lock_registry(&self.registry);
            let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<PetriNet, String> {
                let handle = registry.get(name).map_err(|e| e.to_string())?;
                handle.discover(log).map_err(|e| e.to_string())
            }));
            match outcome {
                Ok(Ok(net)) => Some(net),
                Ok(Err(message)) => {
                    result.error = Some(message);
                    None
                }
                Err(panic) => {
                    result.error = Some(panic_message(panic));
                    None
                }
            }
        };

        if reduce_silent {
            if let Some(net) = model.take() {
                match reduce_silent_transitions(&net) {
                    Some(reduced) => {
                        result.reduced = true;
                        model = Some(reduced);
                    }
                    // Reduction failed: continue with the un-reduced model
                    None => model = Some(net),
                }
            }
        }
        result.execution_time_ms = started.elapsed().as_millis() as u64;

        if let Some(net) = &model {
            result.record_model_size(net);
            if net.has_valid_markings() {
                let fitness = self.metrics.fitness(net, log);
                let precision = self.metrics.precision(net, log);
                result.fitness_score = MetricScore::from_metric_value(fitness);
                result.precision_score = MetricScore::from_metric_value(precision);
                result.f_measure_score =
                    MetricScore::harmonic_mean(result.fitness_score, result.precision_score);
            }
            // Without valid markings the providers' precondition fails and
            // all metric scores stay undefined
        }
        if let Some(message) = &result.error {
            eprintln!("Algorithm '{}' failed: {}", name, message);
        }
        result
    }
}

/// Lock the registry, recovering the inner state if a holder panicked
fn lock_registry(registry: &Mutex<AlgorithmRegistry>) -> std::sync::MutexGuard<'_, AlgorithmRegistry> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("Algorithm panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("Algorithm panicked: {}", s)
    } else {
        "Algorithm panicked".to_string()
    }
}
