use std::collections::HashMap;

use crate::discovery::algorithm::{DiscoveryError, MiningAlgorithm};
use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::{ArcType, Marking, PetriNet, PlaceID, TransitionID};

/// Name under which the directly-follows miner registers itself
pub const DFG_MINER_NAME: &str = "Directly-Follows Miner";

#[derive(Debug, Clone, Copy, Default)]
///
/// Discovers a Petri net from the directly-follows relation of the log
///
/// One visible transition is created per activity. Every activity with at
/// least one predecessor gets a single input place fed by all its predecessor
/// transitions; a source place feeds all start activities and all end
/// activities feed a sink place. The construction over-approximates concurrent
/// behavior (a transition produces one token per successor place), which shows
/// up as remaining tokens during replay.
///
pub struct DfgMiner;

impl DfgMiner {
    /// Create a new [`DfgMiner`]
    pub fn new() -> Self {
        Self
    }
}

impl MiningAlgorithm for DfgMiner {
    fn name(&self) -> &str {
        DFG_MINER_NAME
    }

    fn discover(&mut self, log: &EventLog) -> Result<PetriNet, DiscoveryError> {
        if log.is_empty() {
            return Err(DiscoveryError::EmptyLog);
        }
        let mut net = PetriNet::new();

        let transitions: HashMap<String, TransitionID> = log
            .activities()
            .into_iter()
            .map(|activity| {
                let t = net.add_transition(Some(activity.clone()));
                (activity, t)
            })
            .collect();

        // One shared input place per successor activity
        let mut input_places: HashMap<&str, PlaceID> = HashMap::new();
        let df_pairs = log.directly_follows_pairs();
        for (from, to) in &df_pairs {
            let place = *input_places.entry(to.as_str()).or_insert_with(|| {
                let p = net.add_place();
                net.add_arc(ArcType::place_to_transition(p, transitions[to]), None);
                p
            });
            net.add_arc(ArcType::transition_to_place(transitions[from], place), None);
        }

        let source = net.add_place();
        for start in log.start_activities() {
            net.add_arc(ArcType::place_to_transition(source, transitions[&start]), None);
        }
        let sink = net.add_place();
        for end in log.end_activities() {
            net.add_arc(ArcType::transition_to_place(transitions[&end], sink), None);
        }

        net.initial_marking = Some(Marking::from([(source, 1)]));
        net.final_markings = Some(vec![Marking::from([(sink, 1)])]);
        Ok(net)
    }
}
