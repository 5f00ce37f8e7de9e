#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

///
/// Event Logs
///
pub mod event_log {
    /// [`EventLog`] struct and sub-structs
    pub mod event_log_struct;

    pub use event_log_struct::{Event, EventLog, Trace};
}

///
/// Petri nets
///
pub mod petri_net {
    /// [`PetriNet`] struct
    pub mod petri_net_struct;

    #[doc(inline)]
    pub use petri_net_struct::PetriNet;
}

///
/// Process discovery algorithms and their registry
///
pub mod discovery {
    /// [`MiningAlgorithm`] trait shared by all discovery algorithms
    ///
    /// [`MiningAlgorithm`]: algorithm::MiningAlgorithm
    pub mod algorithm;
    /// Directly-follows based Petri net discovery
    pub mod dfg_miner;
    /// Flower model discovery (maximally fitting, minimally precise)
    pub mod flower_miner;
    /// [`AlgorithmRegistry`] with cached, stateful algorithm handles
    ///
    /// [`AlgorithmRegistry`]: registry::AlgorithmRegistry
    pub mod registry;
}

///
/// Structural reduction of discovered models
///
pub mod reduction {
    /// Removal of silent transitions through series fusion
    pub mod silent_reduction;
}

///
/// Conformance metrics (fitness and precision of a model wrt. a log)
///
pub mod conformance {
    /// [`MetricProvider`] trait and [`MetricValue`] result type
    ///
    /// [`MetricProvider`]: metrics::MetricProvider
    /// [`MetricValue`]: metrics::MetricValue
    pub mod metrics;
    /// Structural escaping-edges precision estimate
    pub mod structural_precision;
    /// Token-based replay
    pub mod token_based_replay;
}

///
/// Multi-algorithm benchmark and multi-criteria scoring
///
pub mod bench {
    /// Weighted score aggregation and winner selection
    pub mod aggregate;
    /// CSV / JSON export of finished comparison runs
    pub mod export;
    /// Batch-relative score normalization
    pub mod normalize;
    /// [`BenchmarkRunner`]: drives one comparison run over all algorithms
    ///
    /// [`BenchmarkRunner`]: orchestrator::BenchmarkRunner
    pub mod orchestrator;
    /// [`AlgorithmResult`] and [`ComparisonRun`] structs
    ///
    /// [`AlgorithmResult`]: result::AlgorithmResult
    /// [`ComparisonRun`]: result::ComparisonRun
    pub mod result;
    /// Weight configuration for the overall score
    pub mod weights;
}

#[doc(inline)]
pub use event_log::event_log_struct::EventLog;

#[doc(inline)]
pub use petri_net::petri_net_struct::PetriNet;

#[doc(inline)]
pub use discovery::algorithm::MiningAlgorithm;

#[doc(inline)]
pub use discovery::registry::AlgorithmRegistry;

#[doc(inline)]
pub use conformance::metrics::{MetricProvider, MetricValue};

#[doc(inline)]
pub use bench::orchestrator::{channel_observer, BenchObserver, BenchmarkRunner};

#[doc(inline)]
pub use bench::result::{AlgorithmResult, ComparisonRun, MetricScore};

#[doc(inline)]
pub use bench::weights::ScoreWeights;

#[doc(inline)]
pub use bench::export::{export_run_to_csv_path, export_run_to_json_path};
