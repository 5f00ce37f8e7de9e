use crate::petri_net::petri_net_struct::{ArcType, PetriNet};

///
/// Remove silent transitions from a [`PetriNet`] through series fusion
///
/// Visible transitions are sacred and never touched. A silent transition `t`
/// with exactly one input place `p` and one output place `q` is fused when `p`
/// has no other consumer and does not occur in the initial or a final marking:
/// all arcs producing into `p` are redirected to `q`, then `p` and `t` are
/// deleted. This is repeated until no further fusion applies.
///
/// Silent transitions that do not match the pattern (e.g., with several input
/// or output places) are behaviorally relevant and are kept.
///
/// Returns `None` when the net is malformed (arcs referencing unknown nodes);
/// otherwise the (possibly unchanged) reduced net is returned.
///
pub fn reduce_silent_transitions(net: &PetriNet) -> Option<PetriNet> {
    if !is_well_formed(net) {
        return None;
    }
    let mut reduced = net.clone();
    loop {
        let candidate = reduced.silent_transitions().into_iter().find_map(|t| {
            let preset = reduced.preset_of_transition(t);
            let postset = reduced.postset_of_transition(t);
            if preset.len() != 1 || postset.len() != 1 {
                return None;
            }
            let (p, w_in) = preset[0];
            let (q, w_out) = postset[0];
            if p == q || w_in != 1 || w_out != 1 {
                return None;
            }
            if reduced.postset_of_place(p).len() != 1 {
                return None;
            }
            if reduced.is_in_initial_marking(&p) || reduced.is_in_a_final_marking(&p) {
                return None;
            }
            Some((t, p, q))
        });
        let Some((t, p, q)) = candidate else {
            break;
        };
        // Redirect producers of p to q, then drop p and t
        let producers: Vec<_> = reduced
            .arcs
            .iter()
            .filter_map(|a| match a.from_to {
                ArcType::TransitionPlace(from, to) if to == p.0 && from != t.0 => {
                    Some((from, a.weight))
                }
                _ => None,
            })
            .collect();
        reduced.remove_transition(t);
        reduced.remove_place(p);
        for (from, weight) in producers {
            reduced.add_arc(ArcType::TransitionPlace(from, q.0), Some(weight));
        }
    }
    Some(reduced)
}

fn is_well_formed(net: &PetriNet) -> bool {
    net.arcs.iter().all(|a| match a.from_to {
        ArcType::PlaceTransition(from, to) => {
            net.places.contains_key(&from) && net.transitions.contains_key(&to)
        }
        ArcType::TransitionPlace(from, to) => {
            net.transitions.contains_key(&from) && net.places.contains_key(&to)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::petri_net::petri_net_struct::Marking;

    #[test]
    fn series_silent_transition_is_fused() {
        // a -> p -> tau -> q -> b
        let mut net = PetriNet::new();
        let source = net.add_place();
        let p = net.add_place();
        let q = net.add_place();
        let sink = net.add_place();
        let a = net.add_transition(Some("a".into()));
        let tau = net.add_transition(None);
        let b = net.add_transition(Some("b".into()));
        net.add_arc(ArcType::place_to_transition(source, a), None);
        net.add_arc(ArcType::transition_to_place(a, p), None);
        net.add_arc(ArcType::place_to_transition(p, tau), None);
        net.add_arc(ArcType::transition_to_place(tau, q), None);
        net.add_arc(ArcType::place_to_transition(q, b), None);
        net.add_arc(ArcType::transition_to_place(b, sink), None);
        net.initial_marking = Some(Marking::from([(source, 1)]));
        net.final_markings = Some(vec![Marking::from([(sink, 1)])]);

        let reduced = reduce_silent_transitions(&net).unwrap();
        assert_eq!(reduced.silent_transition_count(), 0);
        assert_eq!(reduced.transition_count(), 2);
        assert_eq!(reduced.place_count(), 3);
        // a now produces directly into b's input place
        let a_id = reduced.transition_by_label("a").unwrap();
        let b_id = reduced.transition_by_label("b").unwrap();
        let (a_out, _) = reduced.postset_of_transition(a_id)[0];
        assert_eq!(reduced.postset_of_place(a_out), vec![b_id]);
    }

    #[test]
    fn branching_silent_transition_is_kept() {
        // tau with two output places cannot be fused away
        let mut net = PetriNet::new();
        let p = net.add_place();
        let q1 = net.add_place();
        let q2 = net.add_place();
        let a = net.add_transition(Some("a".into()));
        let tau = net.add_transition(None);
        net.add_arc(ArcType::transition_to_place(a, p), None);
        net.add_arc(ArcType::place_to_transition(p, tau), None);
        net.add_arc(ArcType::transition_to_place(tau, q1), None);
        net.add_arc(ArcType::transition_to_place(tau, q2), None);

        let reduced = reduce_silent_transitions(&net).unwrap();
        assert_eq!(reduced.silent_transition_count(), 1);
        assert_eq!(reduced.place_count(), 3);
    }

    #[test]
    fn marked_place_is_not_fused() {
        let mut net = PetriNet::new();
        let p = net.add_place();
        let q = net.add_place();
        let tau = net.add_transition(None);
        net.add_arc(ArcType::place_to_transition(p, tau), None);
        net.add_arc(ArcType::transition_to_place(tau, q), None);
        net.initial_marking = Some(Marking::from([(p, 1)]));

        let reduced = reduce_silent_transitions(&net).unwrap();
        assert_eq!(reduced.silent_transition_count(), 1);
    }

    #[test]
    fn malformed_net_fails() {
        let mut net = PetriNet::new();
        let p = net.add_place();
        let t = net.add_transition(None);
        net.add_arc(ArcType::place_to_transition(p, t), None);
        net.remove_place(p);
        net.add_arc(ArcType::PlaceTransition(p.0, t.0), None);
        assert!(reduce_silent_transitions(&net).is_none());
    }

    #[test]
    fn net_without_silent_transitions_is_unchanged() {
        let mut net = PetriNet::new();
        let p = net.add_place();
        let t = net.add_transition(Some("a".into()));
        net.add_arc(ArcType::place_to_transition(p, t), None);
        let reduced = reduce_silent_transitions(&net).unwrap();
        assert_eq!(reduced, net);
    }
}
