use crate::discovery::algorithm::{DiscoveryError, MiningAlgorithm};
use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::{ArcType, Marking, PetriNet};

/// Name under which the flower miner registers itself
pub const FLOWER_MINER_NAME: &str = "Flower Miner";

#[derive(Debug, Clone, Copy, Default)]
///
/// Discovers a flower model: a single place with one looping transition per activity
///
/// The resulting net replays every possible activity sequence, so it fits any
/// log perfectly while allowing maximal extra behavior. It serves as the
/// baseline both ends of the fitness/precision trade-off are measured against.
///
pub struct FlowerMiner;

impl FlowerMiner {
    /// Create a new [`FlowerMiner`]
    pub fn new() -> Self {
        Self
    }
}

impl MiningAlgorithm for FlowerMiner {
    fn name(&self) -> &str {
        FLOWER_MINER_NAME
    }

    fn discover(&mut self, log: &EventLog) -> Result<PetriNet, DiscoveryError> {
        if log.is_empty() {
            return Err(DiscoveryError::EmptyLog);
        }
        let mut net = PetriNet::new();
        let center = net.add_place();
        for activity in log.activities() {
            let t = net.add_transition(Some(activity));
            net.add_arc(ArcType::place_to_transition(center, t), None);
            net.add_arc(ArcType::transition_to_place(t, center), None);
        }
        net.initial_marking = Some(Marking::from([(center, 1)]));
        net.final_markings = Some(vec![Marking::from([(center, 1)])]);
        Ok(net)
    }
}
