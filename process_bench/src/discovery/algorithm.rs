use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::PetriNet;

///
/// Error encountered while running a discovery algorithm
///
#[derive(Debug, Clone)]
pub enum DiscoveryError {
    /// The passed event log contains no events
    EmptyLog,
    /// Algorithm-specific failure (with message)
    Failed(String),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::EmptyLog => write!(f, "Event log contains no events"),
            DiscoveryError::Failed(msg) => write!(f, "Discovery failed: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

///
/// A process discovery algorithm: derives a [`PetriNet`] from an [`EventLog`]
///
/// Implementations may carry mutable state (e.g., tuned parameters or caches)
/// between invocations; handles are therefore not safe for concurrent use and
/// must be invoked one call at a time (see
/// [`AlgorithmRegistry`](super::registry::AlgorithmRegistry)).
///
pub trait MiningAlgorithm: Send {
    /// Display name of this algorithm (unique within a registry)
    fn name(&self) -> &str;

    /// Discover a [`PetriNet`] from the given [`EventLog`]
    fn discover(&mut self, log: &EventLog) -> Result<PetriNet, DiscoveryError>;
}
