use std::collections::HashSet;

use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::{PetriNet, PlaceID};

///
/// Structural escaping-edges style precision estimate
///
/// Collects every directly-follows pair `(a, b)` of visible activities the net
/// structurally allows (some place is produced by `a` and consumed by `b`) and
/// compares it against the pairs actually observed in the log:
/// `|observed ∩ allowed| / |allowed|`. A model allowing little beyond the log
/// scores close to 1, a flower model scores close to 0.
///
/// Returns `None` when the net allows no visible pair at all (precision is
/// undefined in that case).
///
pub fn structural_precision(net: &PetriNet, log: &EventLog) -> Option<f64> {
    let allowed = allowed_pairs(net);
    if allowed.is_empty() {
        return None;
    }
    let observed = log.directly_follows_pairs();
    let covered = allowed
        .iter()
        .filter(|(a, b)| observed.contains(&(a.to_string(), b.to_string())))
        .count();
    Some(covered as f64 / allowed.len() as f64)
}

fn allowed_pairs(net: &PetriNet) -> HashSet<(&str, &str)> {
    let mut pairs = HashSet::new();
    for place in net.places.values() {
        let p = PlaceID::from(place);
        let producers: Vec<&str> = net
            .preset_of_place(p)
            .into_iter()
            .filter_map(|t| net.transitions.get(&t.0))
            .filter_map(|t| t.label.as_deref())
            .collect();
        let consumers: Vec<&str> = net
            .postset_of_place(p)
            .into_iter()
            .filter_map(|t| net.transitions.get(&t.0))
            .filter_map(|t| t.label.as_deref())
            .collect();
        for a in &producers {
            for b in &consumers {
                pairs.insert((*a, *b));
            }
        }
    }
    pairs
}
